// libs/assistant-cell/src/models.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use appointment_cell::models::{BookingDraft, BookingError};
use shared_models::AppError;

// ==============================================================================
// CHAT MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Bot,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
    pub sent_at: DateTime<Utc>,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            sent_at: Utc::now(),
        }
    }

    pub fn bot(content: impl Into<String>) -> Self {
        Self {
            role: Role::Bot,
            content: content.into(),
            sent_at: Utc::now(),
        }
    }
}

/// Per-draft state machine: idle, collecting form fields, or just confirmed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BookingStage {
    Idle,
    Collecting,
    Confirmed,
}

/// One patient conversation: transcript plus in-progress booking state.
#[derive(Debug, Clone, Serialize)]
pub struct ChatSession {
    pub id: Uuid,
    pub stage: BookingStage,
    pub draft: BookingDraft,
    pub transcript: Vec<ChatMessage>,
}

impl ChatSession {
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            stage: BookingStage::Idle,
            draft: BookingDraft::default(),
            transcript: Vec::new(),
        }
    }
}

/// Where a free-text message should go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    StartBooking,
    FreeText,
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

/// Assistant failures are non-fatal: callers degrade to a canned apology.
#[derive(Debug, Clone, thiserror::Error)]
pub enum AssistantError {
    #[error("assistant unavailable: {0}")]
    Unavailable(String),

    #[error("assistant returned a malformed response")]
    MalformedResponse,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum SessionError {
    #[error("session not found")]
    NotFound,

    #[error("no booking in progress for this session")]
    NotCollecting,

    #[error(transparent)]
    Booking(#[from] BookingError),
}

impl From<SessionError> for AppError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::NotFound => AppError::NotFound("Session not found".to_string()),
            SessionError::NotCollecting => {
                AppError::BadRequest("No booking in progress for this session".to_string())
            }
            SessionError::Booking(e) => e.into(),
        }
    }
}
