// libs/appointment-cell/src/services/booking.rs
use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use doctor_cell::DoctorCatalog;

use crate::models::{Booking, BookingDraft, BookingError, BookingStatus, Patient, Slot};
use crate::services::availability::AvailabilityEngine;
use crate::store::{BookingStore, StoreError};

const MAX_PATIENT_AGE: u32 = 120;

/// Gender values the form treats as "not answered yet".
const UNSET_GENDERS: [&str; 2] = ["select", "unset"];

struct ValidatedDraft {
    patient: Patient,
    doctor_name: String,
    doctor_specialization: String,
    slot: Slot,
    symptoms: String,
}

/// The booking workflow: validate a draft in one pass, normalize its fields,
/// claim the slot through the store's atomic check-and-insert, and invalidate
/// the availability cache on success.
pub struct BookingService {
    store: Arc<dyn BookingStore>,
    availability: Arc<AvailabilityEngine>,
    catalog: Arc<DoctorCatalog>,
}

impl BookingService {
    pub fn new(
        store: Arc<dyn BookingStore>,
        availability: Arc<AvailabilityEngine>,
        catalog: Arc<DoctorCatalog>,
    ) -> Self {
        Self {
            store,
            availability,
            catalog,
        }
    }

    /// Confirm a draft as a durable booking.
    ///
    /// Validation failures report the complete list of violations and perform
    /// zero writes. A lost race for the slot surfaces as
    /// [`BookingError::SlotConflict`] so the caller can re-query availability;
    /// the existing booking is never overwritten. Writes fail closed when the
    /// store is down.
    pub async fn submit(&self, draft: &BookingDraft) -> Result<Booking, BookingError> {
        let validated = self.validate(draft)?;

        let now = Utc::now();
        let booking = Booking {
            booking_id: Uuid::new_v4(),
            patient: validated.patient,
            doctor_name: validated.doctor_name,
            doctor_specialization: validated.doctor_specialization,
            slot: validated.slot,
            symptoms: validated.symptoms,
            status: BookingStatus::Confirmed,
            created_at: now,
            updated_at: now,
        };

        match self.store.insert_booking(&booking).await {
            Ok(()) => {}
            Err(StoreError::Conflict) => {
                warn!(
                    "Slot {} was claimed by a concurrent booking, rejecting",
                    booking.slot
                );
                return Err(BookingError::SlotConflict);
            }
            Err(StoreError::Unavailable(reason)) => {
                return Err(BookingError::StoreUnavailable(reason));
            }
        }

        // Invalidate before returning so a book-then-requery in this process
        // never observes the claimed slot as open.
        self.availability.invalidate().await;

        info!(
            "Booking {} confirmed: {} with {} at {}",
            booking.booking_id, booking.patient.name, booking.doctor_name, booking.slot
        );

        Ok(booking)
    }

    /// Single-pass validation: every missing or out-of-range field is
    /// collected so the user can fix the whole form at once.
    fn validate(&self, draft: &BookingDraft) -> Result<ValidatedDraft, BookingError> {
        let mut missing = Vec::new();

        let name = required_text(&draft.name, "name", &mut missing);
        let phone = required_text(&draft.phone, "phone", &mut missing);
        let symptoms = required_text(&draft.symptoms, "symptoms", &mut missing);

        let email = required_text(&draft.email, "email", &mut missing).to_lowercase();

        let gender = required_text(&draft.gender, "gender", &mut missing);
        if UNSET_GENDERS
            .iter()
            .any(|unset| gender.eq_ignore_ascii_case(unset))
        {
            missing.push("gender".to_string());
        }

        let age = match draft.age {
            Some(age) if (1..=MAX_PATIENT_AGE).contains(&age) => age,
            _ => {
                missing.push("age".to_string());
                0
            }
        };

        let doctor = match draft.doctor.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => match self.catalog.find(name) {
                Some(doctor) => Some(doctor.clone()),
                None => {
                    missing.push("doctor".to_string());
                    None
                }
            },
            _ => {
                missing.push("doctor".to_string());
                None
            }
        };

        let slot = draft.slot;
        if slot.is_none() {
            missing.push("slot".to_string());
        }

        if !missing.is_empty() {
            return Err(BookingError::Validation(missing));
        }

        // All fields present past this point.
        let doctor = doctor.ok_or_else(|| BookingError::Validation(vec!["doctor".to_string()]))?;
        let slot = slot.ok_or_else(|| BookingError::Validation(vec!["slot".to_string()]))?;

        Ok(ValidatedDraft {
            patient: Patient {
                name,
                age,
                gender,
                phone,
                email,
            },
            doctor_name: doctor.name,
            doctor_specialization: doctor.specialization,
            slot,
            symptoms,
        })
    }
}

/// Trimmed field value; records the field as missing when absent or empty.
fn required_text(value: &Option<String>, field: &str, missing: &mut Vec<String>) -> String {
    match value.as_deref().map(str::trim) {
        Some(text) if !text.is_empty() => text.to_string(),
        _ => {
            missing.push(field.to_string());
            String::new()
        }
    }
}
