// libs/appointment-cell/src/handlers.rs
use std::sync::Arc;

use axum::{extract::State, Json};
use chrono::Utc;
use serde_json::{json, Value};
use tracing::debug;

use shared_models::AppError;

use crate::models::BookingDraft;
use crate::services::availability::AvailabilityEngine;
use crate::services::booking::BookingService;

/// Shared state for the appointment routes.
pub struct AppointmentState {
    pub booking: Arc<BookingService>,
    pub availability: Arc<AvailabilityEngine>,
}

/// Open slots for the rolling window, in calendar order.
pub async fn get_available_slots(
    State(state): State<Arc<AppointmentState>>,
) -> Result<Json<Value>, AppError> {
    let slots = state.availability.available_slots(Utc::now()).await?;
    debug!("Returning {} available slots", slots.len());

    Ok(Json(json!({
        "available_slots": slots,
    })))
}

/// Submit a completed booking draft.
pub async fn book_appointment(
    State(state): State<Arc<AppointmentState>>,
    Json(draft): Json<BookingDraft>,
) -> Result<Json<Value>, AppError> {
    let booking = state.booking.submit(&draft).await?;

    Ok(Json(json!({
        "success": true,
        "booking_id": booking.booking_id,
        "booking": booking,
        "message": format!(
            "Appointment booked successfully! A confirmation email has been sent to {}",
            booking.patient.email
        ),
    })))
}
