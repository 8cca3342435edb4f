// libs/assistant-cell/src/services/session.rs
use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use uuid::Uuid;

use appointment_cell::models::{Booking, BookingDraft};
use appointment_cell::BookingService;

use crate::models::{BookingStage, ChatMessage, ChatSession, Route, SessionError};
use crate::services::gemini::Assistant;

/// Reply used whenever the assistant collaborator fails. Degraded service,
/// never a crash.
pub const APOLOGY: &str = "I apologize, but I'm having trouble processing your \
request. Please try asking your question again or contact our support team \
for assistance.";

const BOOKING_INTRO: &str =
    "I'll help you book an appointment. Let me guide you through the process.";

const BOOKING_IN_PROGRESS: &str = "We're in the middle of booking your \
appointment. Please complete the form, or cancel the booking to ask me \
something else.";

/// Decides whether a message starts a booking or is free text for the
/// assistant.
pub trait MessageClassifier: Send + Sync {
    fn classify(&self, text: &str) -> Route;
}

/// Deliberately crude keyword trigger carried over from the product design:
/// any mention of "appointment" or "book" starts the booking flow. Swap the
/// classifier to change this without touching the workflow.
pub struct KeywordClassifier;

impl MessageClassifier for KeywordClassifier {
    fn classify(&self, text: &str) -> Route {
        let lowered = text.to_lowercase();
        if lowered.contains("appointment") || lowered.contains("book") {
            Route::StartBooking
        } else {
            Route::FreeText
        }
    }
}

/// Holds every live conversation and orchestrates the multi-step booking
/// collection on top of the booking workflow.
///
/// Draft state is private per session; the only cross-session contention is
/// the sessions map itself.
pub struct SessionController {
    sessions: RwLock<HashMap<Uuid, ChatSession>>,
    booking: Arc<BookingService>,
    assistant: Arc<dyn Assistant>,
    classifier: Box<dyn MessageClassifier>,
}

impl SessionController {
    pub fn new(booking: Arc<BookingService>, assistant: Arc<dyn Assistant>) -> Self {
        Self::with_classifier(booking, assistant, Box::new(KeywordClassifier))
    }

    pub fn with_classifier(
        booking: Arc<BookingService>,
        assistant: Arc<dyn Assistant>,
        classifier: Box<dyn MessageClassifier>,
    ) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            booking,
            assistant,
            classifier,
        }
    }

    pub async fn create_session(&self) -> Uuid {
        let id = Uuid::new_v4();
        self.sessions.write().await.insert(id, ChatSession::new(id));
        debug!("Created chat session {}", id);
        id
    }

    pub async fn snapshot(&self, session_id: Uuid) -> Result<ChatSession, SessionError> {
        self.sessions
            .read()
            .await
            .get(&session_id)
            .cloned()
            .ok_or(SessionError::NotFound)
    }

    /// Begin collecting booking fields. Idempotent: an already collecting
    /// session keeps its draft.
    pub async fn start_booking(&self, session_id: Uuid) -> Result<BookingStage, SessionError> {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(&session_id).ok_or(SessionError::NotFound)?;

        if session.stage != BookingStage::Collecting {
            session.stage = BookingStage::Collecting;
            session.draft = BookingDraft::default();
        }

        Ok(session.stage)
    }

    /// Discard the draft and return to idle. Drafts hold no reservation, so
    /// there is nothing else to clean up.
    pub async fn cancel_booking(&self, session_id: Uuid) -> Result<(), SessionError> {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(&session_id).ok_or(SessionError::NotFound)?;

        session.stage = BookingStage::Idle;
        session.draft = BookingDraft::default();

        Ok(())
    }

    /// Merge newly collected fields into the session's draft.
    pub async fn update_draft(
        &self,
        session_id: Uuid,
        update: BookingDraft,
    ) -> Result<BookingDraft, SessionError> {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(&session_id).ok_or(SessionError::NotFound)?;

        if session.stage != BookingStage::Collecting {
            return Err(SessionError::NotCollecting);
        }

        session.draft.merge(update);
        Ok(session.draft.clone())
    }

    /// Submit the session's draft through the booking workflow.
    ///
    /// On success the confirmation is recorded in the transcript and the
    /// session returns to idle, ready for the next booking. On failure the
    /// draft is kept so the patient can correct it or pick another slot.
    pub async fn submit(&self, session_id: Uuid) -> Result<Booking, SessionError> {
        let draft = {
            let sessions = self.sessions.read().await;
            let session = sessions.get(&session_id).ok_or(SessionError::NotFound)?;
            if session.stage != BookingStage::Collecting {
                return Err(SessionError::NotCollecting);
            }
            session.draft.clone()
        };

        let booking = self.booking.submit(&draft).await?;

        let mut sessions = self.sessions.write().await;
        if let Some(session) = sessions.get_mut(&session_id) {
            session.transcript.push(ChatMessage::bot(format!(
                "Your appointment has been booked successfully! Booking ID: {}. \
                 {} will see you at {}.",
                booking.booking_id, booking.doctor_name, booking.slot
            )));
            session.stage = BookingStage::Idle;
            session.draft = BookingDraft::default();
        }

        info!(
            "Session {} confirmed booking {}",
            session_id, booking.booking_id
        );

        Ok(booking)
    }

    /// Route one free-text message: an active booking flow takes precedence,
    /// then the classifier picks between starting a booking and forwarding to
    /// the assistant. Returns the bot's reply.
    pub async fn route_message(
        &self,
        session_id: Uuid,
        text: &str,
    ) -> Result<String, SessionError> {
        let stage = {
            let mut sessions = self.sessions.write().await;
            let session = sessions.get_mut(&session_id).ok_or(SessionError::NotFound)?;
            session.transcript.push(ChatMessage::user(text));
            session.stage
        };

        let reply = if stage == BookingStage::Collecting {
            BOOKING_IN_PROGRESS.to_string()
        } else {
            match self.classifier.classify(text) {
                Route::StartBooking => {
                    self.start_booking(session_id).await?;
                    BOOKING_INTRO.to_string()
                }
                Route::FreeText => match self.assistant.ask(text).await {
                    Ok(answer) => answer,
                    Err(e) => {
                        warn!("Assistant failed, degrading to apology: {}", e);
                        APOLOGY.to_string()
                    }
                },
            }
        };

        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(&session_id).ok_or(SessionError::NotFound)?;
        session.transcript.push(ChatMessage::bot(reply.clone()));

        Ok(reply)
    }
}
