use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use assert_matches::assert_matches;
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use uuid::Uuid;

use appointment_cell::models::{
    Booking, BookingError, BookingStatus, Patient, SchedulerSettings, Slot,
};
use appointment_cell::store::{BookingStore, InMemoryBookingStore, StoreError};
use appointment_cell::AvailabilityEngine;
use shared_config::ReadFallbackPolicy;

/// Store stub that is permanently down.
struct UnreachableStore;

#[async_trait]
impl BookingStore for UnreachableStore {
    async fn list_confirmed_slots(&self) -> Result<HashSet<Slot>, StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    async fn insert_booking(&self, _booking: &Booking) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }
}

fn confirmed_booking(slot: Slot) -> Booking {
    let now = Utc::now();
    Booking {
        booking_id: Uuid::new_v4(),
        patient: Patient {
            name: "Jane Doe".to_string(),
            age: 34,
            gender: "Female".to_string(),
            phone: "555-0100".to_string(),
            email: "jane@example.com".to_string(),
        },
        doctor_name: "Dr. John Smith".to_string(),
        doctor_specialization: "General Physician".to_string(),
        slot,
        symptoms: "Persistent cough".to_string(),
        status: BookingStatus::Confirmed,
        created_at: now,
        updated_at: now,
    }
}

fn june_first_morning() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).single().expect("valid time")
}

#[tokio::test]
async fn test_confirmed_slot_is_excluded() {
    let store = Arc::new(InMemoryBookingStore::new());
    let taken: Slot = "2024-06-01 09:00 AM".parse().expect("valid slot");
    store
        .insert_booking(&confirmed_booking(taken))
        .await
        .expect("insert should succeed");

    let engine = AvailabilityEngine::new(store, SchedulerSettings::default());
    let open = engine
        .available_slots(june_first_morning())
        .await
        .expect("availability read should succeed");

    assert_eq!(open.len(), 41, "exactly the booked slot should be excluded");
    assert!(!open.contains(&taken));
    assert!(open.iter().any(|s| s.to_string() == "2024-06-01 10:00 AM"));
}

#[tokio::test]
async fn test_fully_booked_window_is_empty_not_an_error() {
    let store = Arc::new(InMemoryBookingStore::new());
    let settings = SchedulerSettings {
        window_days: 1,
        ..SchedulerSettings::default()
    };

    for time in &settings.daily_templates {
        let slot = Slot::new(june_first_morning().date_naive(), *time);
        store
            .insert_booking(&confirmed_booking(slot))
            .await
            .expect("insert should succeed");
    }

    let engine = AvailabilityEngine::new(store, settings);
    let open = engine
        .available_slots(june_first_morning())
        .await
        .expect("a fully booked window is a valid state");

    assert!(open.is_empty());
}

#[tokio::test]
async fn test_cache_serves_stale_reads_until_invalidated() {
    let store = Arc::new(InMemoryBookingStore::new());
    let engine = AvailabilityEngine::new(store.clone(), SchedulerSettings::default());
    let now = june_first_morning();

    let before = engine.available_slots(now).await.expect("read should succeed");
    assert_eq!(before.len(), 42);

    // A booking written behind the engine's back is invisible within the
    // cache bucket...
    let taken: Slot = "2024-06-01 09:00 AM".parse().expect("valid slot");
    store
        .insert_booking(&confirmed_booking(taken))
        .await
        .expect("insert should succeed");

    let cached = engine.available_slots(now).await.expect("read should succeed");
    assert_eq!(cached.len(), 42, "cache TTL bounds the staleness by design");

    // ...and visible immediately after invalidation.
    engine.invalidate().await;
    let fresh = engine.available_slots(now).await.expect("read should succeed");
    assert_eq!(fresh.len(), 41);
    assert!(!fresh.contains(&taken));
}

#[tokio::test]
async fn test_store_outage_fails_open_by_default() {
    let engine = AvailabilityEngine::new(
        Arc::new(UnreachableStore),
        SchedulerSettings::default(),
    );

    let open = engine
        .available_slots(june_first_morning())
        .await
        .expect("fail-open reads should survive a store outage");

    assert_eq!(open.len(), 42, "the full generated list is shown during an outage");
}

#[tokio::test]
async fn test_store_outage_fails_closed_when_configured() {
    let settings = SchedulerSettings {
        read_fallback: ReadFallbackPolicy::FailClosed,
        ..SchedulerSettings::default()
    };
    let engine = AvailabilityEngine::new(Arc::new(UnreachableStore), settings);

    let result = engine.available_slots(june_first_morning()).await;
    assert_matches!(result, Err(BookingError::StoreUnavailable(_)));
}

/// Store that fails its first read, then recovers to a fixed confirmed set.
struct FlakyStore {
    failed_once: AtomicBool,
    confirmed: HashSet<Slot>,
}

#[async_trait]
impl BookingStore for FlakyStore {
    async fn list_confirmed_slots(&self) -> Result<HashSet<Slot>, StoreError> {
        if !self.failed_once.swap(true, Ordering::SeqCst) {
            return Err(StoreError::Unavailable("timed out".to_string()));
        }
        Ok(self.confirmed.clone())
    }

    async fn insert_booking(&self, _booking: &Booking) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("read-only stub".to_string()))
    }
}

#[tokio::test]
async fn test_fail_open_results_are_not_cached() {
    let taken: Slot = "2024-06-01 09:00 AM".parse().expect("valid slot");
    let store = FlakyStore {
        failed_once: AtomicBool::new(false),
        confirmed: HashSet::from([taken]),
    };
    let engine = AvailabilityEngine::new(Arc::new(store), SchedulerSettings::default());
    let now = june_first_morning();

    let during_outage = engine.available_slots(now).await.expect("fail-open read");
    assert_eq!(during_outage.len(), 42);

    // Same cache bucket, recovered store: the fallback list was not cached,
    // so the booked slot disappears immediately.
    let after_recovery = engine.available_slots(now).await.expect("read should succeed");
    assert_eq!(after_recovery.len(), 41);
    assert!(!after_recovery.contains(&taken));
}
