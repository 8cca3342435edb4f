// libs/appointment-cell/src/store.rs
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    Client, Method, StatusCode,
};
use serde_json::Value;
use tracing::{debug, error, warn};

use shared_config::AppConfig;

use crate::models::{Booking, BookingStatus, Slot};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// Another confirmed booking already holds the slot.
    #[error("slot already confirmed by another booking")]
    Conflict,

    /// Connection failure or timeout. Recoverable; never crashes the caller.
    #[error("booking store unavailable: {0}")]
    Unavailable(String),
}

/// Persistence boundary for confirmed bookings.
///
/// `insert_booking` must behave as an atomic check-and-insert against the
/// one-confirmed-booking-per-slot invariant: of N concurrent inserts for the
/// same slot, exactly one succeeds and the rest observe [`StoreError::Conflict`].
#[async_trait]
pub trait BookingStore: Send + Sync {
    async fn list_confirmed_slots(&self) -> Result<HashSet<Slot>, StoreError>;

    async fn insert_booking(&self, booking: &Booking) -> Result<(), StoreError>;
}

// ==============================================================================
// REST STORE
// ==============================================================================

/// PostgREST-backed store.
///
/// Uniqueness is enforced server-side by a partial unique index on
/// `(slot) WHERE status = 'confirmed'`; a violated insert surfaces as HTTP
/// 409 and is mapped to [`StoreError::Conflict`]. All requests carry a
/// bounded timeout so an outage degrades to [`StoreError::Unavailable`]
/// instead of hanging the caller.
pub struct RestBookingStore {
    client: Client,
    base_url: String,
    api_key: String,
    timeout: Duration,
}

impl RestBookingStore {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.store_url.clone(),
            api_key: config.store_api_key.clone(),
            timeout: Duration::from_secs(config.store_timeout_secs),
        }
    }

    fn get_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Ok(key) = HeaderValue::from_str(&self.api_key) {
            headers.insert("apikey", key);
        }
        if let Ok(bearer) = HeaderValue::from_str(&format!("Bearer {}", self.api_key)) {
            headers.insert(AUTHORIZATION, bearer);
        }

        headers
    }

    async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<reqwest::Response, StoreError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("Booking store request to {}", url);

        let mut req = self
            .client
            .request(method, &url)
            .headers(self.get_headers())
            .timeout(self.timeout);

        if let Some(body_data) = body {
            req = req.json(&body_data);
        }

        req.send().await.map_err(|e| {
            error!("Booking store request failed: {}", e);
            StoreError::Unavailable(e.to_string())
        })
    }
}

#[async_trait]
impl BookingStore for RestBookingStore {
    async fn list_confirmed_slots(&self) -> Result<HashSet<Slot>, StoreError> {
        let response = self
            .request(
                Method::GET,
                "/rest/v1/bookings?status=eq.confirmed&select=slot",
                None,
            )
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("Booking store read error ({}): {}", status, error_text);
            return Err(StoreError::Unavailable(format!(
                "store read failed with status {}",
                status
            )));
        }

        let rows: Vec<Value> = response
            .json()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        let mut slots = HashSet::with_capacity(rows.len());
        for row in rows {
            match row["slot"].as_str().map(str::parse::<Slot>) {
                Some(Ok(slot)) => {
                    slots.insert(slot);
                }
                _ => warn!("Skipping booking row with malformed slot: {}", row),
            }
        }

        Ok(slots)
    }

    async fn insert_booking(&self, booking: &Booking) -> Result<(), StoreError> {
        let body = serde_json::to_value(booking)
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        let response = self
            .request(Method::POST, "/rest/v1/bookings", Some(body))
            .await?;

        let status = response.status();
        if status == StatusCode::CONFLICT {
            return Err(StoreError::Conflict);
        }
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("Booking store insert error ({}): {}", status, error_text);
            return Err(StoreError::Unavailable(format!(
                "store insert failed with status {}",
                status
            )));
        }

        Ok(())
    }
}

// ==============================================================================
// IN-MEMORY STORE
// ==============================================================================

/// Mutex-guarded store for tests and local runs without persistence.
///
/// The confirmed-slot check and the insert happen under a single lock
/// acquisition, which gives the same exactly-one-wins behavior as the REST
/// store's unique index.
#[derive(Default)]
pub struct InMemoryBookingStore {
    bookings: Mutex<HashMap<Slot, Booking>>,
}

impl InMemoryBookingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every persisted booking, in no particular order.
    pub fn bookings(&self) -> Vec<Booking> {
        self.bookings
            .lock()
            .map(|map| map.values().cloned().collect())
            .unwrap_or_default()
    }
}

#[async_trait]
impl BookingStore for InMemoryBookingStore {
    async fn list_confirmed_slots(&self) -> Result<HashSet<Slot>, StoreError> {
        let bookings = self
            .bookings
            .lock()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        Ok(bookings
            .values()
            .filter(|b| b.status == BookingStatus::Confirmed)
            .map(|b| b.slot)
            .collect())
    }

    async fn insert_booking(&self, booking: &Booking) -> Result<(), StoreError> {
        let mut bookings = self
            .bookings
            .lock()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        if bookings
            .get(&booking.slot)
            .is_some_and(|existing| existing.status == BookingStatus::Confirmed)
        {
            return Err(StoreError::Conflict);
        }

        bookings.insert(booking.slot, booking.clone());
        Ok(())
    }
}
