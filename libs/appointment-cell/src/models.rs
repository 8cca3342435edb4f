// libs/appointment-cell/src/models.rs
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

use shared_config::{AppConfig, ReadFallbackPolicy};
use shared_models::AppError;

// ==============================================================================
// SLOT VALUE OBJECT
// ==============================================================================

/// A bookable (date, time-of-day) pair.
///
/// Slots are value objects: equality and ordering are by (date, time), and
/// the wire/storage form is the string `YYYY-MM-DD HH:MM AM|PM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Slot {
    pub date: NaiveDate,
    pub time: NaiveTime,
}

impl Slot {
    pub fn new(date: NaiveDate, time: NaiveTime) -> Self {
        Self { date, time }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}",
            self.date.format("%Y-%m-%d"),
            self.time.format("%I:%M %p")
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid slot {0:?}, expected YYYY-MM-DD HH:MM AM|PM")]
pub struct SlotParseError(pub String);

impl FromStr for Slot {
    type Err = SlotParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (date_part, time_part) = trimmed
            .split_once(' ')
            .ok_or_else(|| SlotParseError(s.to_string()))?;

        let date = NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
            .map_err(|_| SlotParseError(s.to_string()))?;
        let time = NaiveTime::parse_from_str(time_part.trim(), "%I:%M %p")
            .map_err(|_| SlotParseError(s.to_string()))?;

        Ok(Slot { date, time })
    }
}

impl Serialize for Slot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Slot {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

// ==============================================================================
// BOOKING MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Patient {
    pub name: String,
    pub age: u32,
    pub gender: String,
    pub phone: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Confirmed,
    // Not reachable through any current operation; kept as the extension
    // point for future cancellation support.
    Cancelled,
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookingStatus::Confirmed => write!(f, "confirmed"),
            BookingStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// A durably persisted, slot-claiming appointment record.
///
/// Doctor identity is denormalized at booking time so later catalog changes
/// never rewrite history. At most one confirmed booking may hold a slot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Booking {
    pub booking_id: Uuid,
    #[serde(flatten)]
    pub patient: Patient,
    pub doctor_name: String,
    pub doctor_specialization: String,
    pub slot: Slot,
    pub symptoms: String,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Transient per-session field accumulation for an in-progress booking.
///
/// Drafts hold no reservation: abandoning one has no side effects, and only
/// a successful submit produces a persisted [`Booking`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookingDraft {
    pub name: Option<String>,
    pub age: Option<u32>,
    pub gender: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub doctor: Option<String>,
    pub slot: Option<Slot>,
    pub symptoms: Option<String>,
}

impl BookingDraft {
    /// Merge newly collected fields into the draft, keeping existing answers
    /// unless the update provides a replacement.
    pub fn merge(&mut self, update: BookingDraft) {
        if update.name.is_some() {
            self.name = update.name;
        }
        if update.age.is_some() {
            self.age = update.age;
        }
        if update.gender.is_some() {
            self.gender = update.gender;
        }
        if update.phone.is_some() {
            self.phone = update.phone;
        }
        if update.email.is_some() {
            self.email = update.email;
        }
        if update.doctor.is_some() {
            self.doctor = update.doctor;
        }
        if update.slot.is_some() {
            self.slot = update.slot;
        }
        if update.symptoms.is_some() {
            self.symptoms = update.symptoms;
        }
    }
}

// ==============================================================================
// SCHEDULER SETTINGS
// ==============================================================================

/// Tunables for slot generation and availability reads.
#[derive(Debug, Clone)]
pub struct SchedulerSettings {
    pub window_days: u32,
    pub daily_templates: Vec<NaiveTime>,
    pub cache_ttl_secs: u64,
    pub read_fallback: ReadFallbackPolicy,
}

impl SchedulerSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            window_days: config.booking_window_days,
            daily_templates: crate::services::slots::daily_templates(),
            cache_ttl_secs: config.slot_cache_ttl_secs,
            read_fallback: config.availability_read_fallback,
        }
    }
}

impl Default for SchedulerSettings {
    fn default() -> Self {
        Self {
            window_days: 7,
            daily_templates: crate::services::slots::daily_templates(),
            cache_ttl_secs: 300,
            read_fallback: ReadFallbackPolicy::FailOpen,
        }
    }
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BookingError {
    /// One or more required fields are missing or out of range. The list
    /// names every violation found in a single pass.
    #[error("missing or invalid fields: {0:?}")]
    Validation(Vec<String>),

    /// The slot was confirmed by a concurrent booking. Retryable: the caller
    /// should re-query availability and pick another slot.
    #[error("appointment slot no longer available")]
    SlotConflict,

    /// The booking store could not be reached. Reads may fall open to the
    /// generated slot list; writes always fail closed with this error.
    #[error("booking store unavailable: {0}")]
    StoreUnavailable(String),
}

impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        match err {
            BookingError::Validation(fields) => AppError::Validation { fields },
            BookingError::SlotConflict => {
                AppError::Conflict("Appointment slot no longer available".to_string())
            }
            BookingError::StoreUnavailable(reason) => AppError::Unavailable(reason),
        }
    }
}
