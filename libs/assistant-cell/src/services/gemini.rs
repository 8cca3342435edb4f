// libs/assistant-cell/src/services/gemini.rs
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::{debug, error};

use shared_config::AppConfig;

use crate::models::AssistantError;

const GEMINI_MODEL: &str = "gemini-2.0-flash";
const REQUEST_TIMEOUT_SECS: u64 = 15;

/// Context prepended to every patient question.
const SYSTEM_CONTEXT: &str = "You are a helpful medical assistant for a \
Telemedicine Appointment Scheduling system. Your main responsibilities include \
helping patients schedule appointments with doctors, providing information \
about available doctors and their specializations, answering questions about \
telemedicine services, explaining medical terms in simple language, and \
directing patients to appropriate specialists.

Available Doctors and their specializations:
- Dr. John Smith (General Physician) - 15+ years experience
- Dr. Sarah Johnson (Cardiologist) - 12+ years experience
- Dr. Michael Chen (Pediatrician) - 10+ years experience
- Dr. Emily Williams (Dermatologist) - 8+ years experience

Services offered: virtual consultations, follow-up appointments, prescription \
renewals, basic health assessments, and emergency care coordination.

Remember to be professional and empathetic, provide accurate medical \
information, direct emergency cases to immediate medical attention, and \
maintain patient privacy and confidentiality.";

/// External conversational collaborator.
///
/// Failures are always recoverable: the session controller converts them to
/// a canned apology rather than surfacing an error to the patient.
#[async_trait]
pub trait Assistant: Send + Sync {
    async fn ask(&self, question: &str) -> Result<String, AssistantError>;
}

pub struct GeminiAssistant {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GeminiAssistant {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            api_key: config.gemini_api_key.clone(),
            base_url: config.gemini_base_url.clone(),
        }
    }
}

#[async_trait]
impl Assistant for GeminiAssistant {
    async fn ask(&self, question: &str) -> Result<String, AssistantError> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, GEMINI_MODEL, self.api_key
        );
        debug!("Forwarding patient question to the assistant");

        let prompt = format!(
            "{}\n\nPatient's Question: {}\n\nResponse:",
            SYSTEM_CONTEXT, question
        );
        let body = json!({
            "contents": [
                { "role": "user", "parts": [{ "text": prompt }] }
            ]
        });

        let response = self
            .client
            .post(&url)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!("Assistant request failed: {}", e);
                AssistantError::Unavailable(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("Assistant API error ({}): {}", status, error_text);
            return Err(AssistantError::Unavailable(format!(
                "assistant API returned status {}",
                status
            )));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| AssistantError::Unavailable(e.to_string()))?;

        payload["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .ok_or(AssistantError::MalformedResponse)
    }
}
