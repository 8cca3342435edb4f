// libs/assistant-cell/src/handlers.rs
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use appointment_cell::models::BookingDraft;
use shared_models::AppError;

use crate::services::session::SessionController;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

/// Open a fresh conversation.
pub async fn create_session(
    State(controller): State<Arc<SessionController>>,
) -> Result<Json<Value>, AppError> {
    let session_id = controller.create_session().await;

    Ok(Json(json!({
        "session_id": session_id,
    })))
}

/// Full session state: transcript, stage and the draft so far.
pub async fn get_session(
    State(controller): State<Arc<SessionController>>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let session = controller.snapshot(session_id).await?;

    Ok(Json(json!({ "session": session })))
}

/// Route one patient message and return the bot's reply.
pub async fn send_message(
    State(controller): State<Arc<SessionController>>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<Value>, AppError> {
    let reply = controller.route_message(session_id, &request.message).await?;

    Ok(Json(json!({
        "reply": reply,
    })))
}

/// Explicitly enter the booking flow without going through the classifier.
pub async fn start_booking(
    State(controller): State<Arc<SessionController>>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let stage = controller.start_booking(session_id).await?;

    Ok(Json(json!({ "stage": stage })))
}

/// Abandon the in-progress booking.
pub async fn cancel_booking(
    State(controller): State<Arc<SessionController>>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    controller.cancel_booking(session_id).await?;

    Ok(Json(json!({ "cancelled": true })))
}

/// Merge newly collected form fields into the session's draft.
pub async fn update_booking(
    State(controller): State<Arc<SessionController>>,
    Path(session_id): Path<Uuid>,
    Json(update): Json<BookingDraft>,
) -> Result<Json<Value>, AppError> {
    let draft = controller.update_draft(session_id, update).await?;

    Ok(Json(json!({ "draft": draft })))
}

/// Submit the collected draft through the booking workflow.
pub async fn submit_booking(
    State(controller): State<Arc<SessionController>>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let booking = controller.submit(session_id).await?;

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
