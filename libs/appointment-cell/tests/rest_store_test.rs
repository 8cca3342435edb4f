use chrono::Utc;
use uuid::Uuid;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use appointment_cell::models::{Booking, BookingStatus, Patient, Slot};
use appointment_cell::store::{BookingStore, RestBookingStore, StoreError};
use shared_config::{AppConfig, ReadFallbackPolicy};

fn test_config(base_url: &str) -> AppConfig {
    AppConfig {
        store_url: base_url.to_string(),
        store_api_key: "test-api-key".to_string(),
        store_timeout_secs: 2,
        availability_read_fallback: ReadFallbackPolicy::FailOpen,
        slot_cache_ttl_secs: 300,
        booking_window_days: 7,
        gemini_api_key: String::new(),
        gemini_base_url: String::new(),
    }
}

fn sample_booking(slot: &str) -> Booking {
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
        slot: slot.parse().expect("valid slot"),
        symptoms: "Persistent cough".to_string(),
        status: BookingStatus::Confirmed,
        created_at: now,
        updated_at: now,
    }
}

#[tokio::test]
async fn test_list_confirmed_slots_parses_wire_strings() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/bookings"))
        .and(query_param("status", "eq.confirmed"))
        .and(query_param("select", "slot"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "slot": "2024-06-01 09:00 AM" },
            { "slot": "2024-06-02 02:00 PM" },
            { "slot": "not a slot" },
        ])))
        .mount(&server)
        .await;

    let store = RestBookingStore::new(&test_config(&server.uri()));
    let confirmed = store
        .list_confirmed_slots()
        .await
        .expect("read should succeed");

    // Malformed rows are skipped, not fatal.
    assert_eq!(confirmed.len(), 2);
    let expected: Slot = "2024-06-01 09:00 AM".parse().expect("valid slot");
    assert!(confirmed.contains(&expected));
}

#[tokio::test]
async fn test_insert_booking_success() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/bookings"))
        .respond_with(ResponseTemplate::new(201))
        .mount(&server)
        .await;

    let store = RestBookingStore::new(&test_config(&server.uri()));
    let result = store.insert_booking(&sample_booking("2024-06-01 09:00 AM")).await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn test_insert_booking_maps_409_to_conflict() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/bookings"))
        .respond_with(ResponseTemplate::new(409).set_body_json(serde_json::json!({
            "message": "duplicate key value violates unique constraint"
        })))
        .mount(&server)
        .await;

    let store = RestBookingStore::new(&test_config(&server.uri()));
    let result = store.insert_booking(&sample_booking("2024-06-01 09:00 AM")).await;

    assert_eq!(result, Err(StoreError::Conflict));
}

#[tokio::test]
async fn test_unreachable_store_is_unavailable_not_a_panic() {
    // Nothing listens on this port.
    let store = RestBookingStore::new(&test_config("http://127.0.0.1:9"));

    let read = store.list_confirmed_slots().await;
    assert!(matches!(read, Err(StoreError::Unavailable(_))));

    let write = store.insert_booking(&sample_booking("2024-06-01 09:00 AM")).await;
    assert!(matches!(write, Err(StoreError::Unavailable(_))));
}

#[tokio::test]
async fn test_server_error_maps_to_unavailable() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/bookings"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let store = RestBookingStore::new(&test_config(&server.uri()));
    let result = store.list_confirmed_slots().await;

    assert!(matches!(result, Err(StoreError::Unavailable(_))));
}
