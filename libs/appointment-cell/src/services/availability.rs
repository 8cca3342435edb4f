// libs/appointment-cell/src/services/availability.rs
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::{debug, warn};

use shared_config::ReadFallbackPolicy;

use crate::models::{BookingError, SchedulerSettings, Slot};
use crate::services::slots::generate_slots;
use crate::store::{BookingStore, StoreError};

struct CachedSlots {
    bucket: i64,
    slots: Vec<Slot>,
}

/// Computes the open slots for the rolling booking window: generated slots
/// minus the store's confirmed set, generator order preserved.
///
/// Results are cached per coarse time bucket (TTL from settings, 5 minutes by
/// default) to bound read load on the store. [`AvailabilityEngine::invalidate`]
/// must be called after every successful insert so a caller who books and
/// re-queries never sees the claimed slot as open.
pub struct AvailabilityEngine {
    store: Arc<dyn BookingStore>,
    settings: SchedulerSettings,
    cache: RwLock<Option<CachedSlots>>,
}

impl AvailabilityEngine {
    pub fn new(store: Arc<dyn BookingStore>, settings: SchedulerSettings) -> Self {
        Self {
            store,
            settings,
            cache: RwLock::new(None),
        }
    }

    /// Open slots for the window starting at `now`. An empty result means a
    /// fully booked window, not an error.
    pub async fn available_slots(&self, now: DateTime<Utc>) -> Result<Vec<Slot>, BookingError> {
        let bucket = now.timestamp() / self.settings.cache_ttl_secs.max(1) as i64;

        if let Some(cached) = self.cache.read().await.as_ref() {
            if cached.bucket == bucket {
                debug!("Serving {} available slots from cache", cached.slots.len());
                return Ok(cached.slots.clone());
            }
        }

        let generated = generate_slots(
            now.date_naive(),
            self.settings.window_days,
            &self.settings.daily_templates,
        );

        match self.store.list_confirmed_slots().await {
            Ok(confirmed) => {
                let open: Vec<Slot> = generated
                    .into_iter()
                    .filter(|slot| !confirmed.contains(slot))
                    .collect();

                *self.cache.write().await = Some(CachedSlots {
                    bucket,
                    slots: open.clone(),
                });

                Ok(open)
            }
            Err(StoreError::Unavailable(reason)) => match self.settings.read_fallback {
                ReadFallbackPolicy::FailOpen => {
                    // Product decision: keep the slot view up during an
                    // outage, at the cost of possibly showing taken slots.
                    // Fallback results are never cached.
                    warn!(
                        "Booking store unavailable ({}), failing open with the full generated slot list",
                        reason
                    );
                    Ok(generated)
                }
                ReadFallbackPolicy::FailClosed => Err(BookingError::StoreUnavailable(reason)),
            },
            Err(StoreError::Conflict) => Err(BookingError::StoreUnavailable(
                "unexpected conflict from a read".to_string(),
            )),
        }
    }

    /// Drop the cached slot list. Called after every successful booking.
    pub async fn invalidate(&self) {
        *self.cache.write().await = None;
    }
}
