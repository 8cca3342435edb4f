use std::env;
use tracing::warn;

/// How availability reads behave when the booking store is unreachable.
///
/// The product default is fail-open: show the full generated slot list rather
/// than an error page. Writes always fail closed regardless of this setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadFallbackPolicy {
    FailOpen,
    FailClosed,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub store_url: String,
    pub store_api_key: String,
    pub store_timeout_secs: u64,
    pub availability_read_fallback: ReadFallbackPolicy,
    pub slot_cache_ttl_secs: u64,
    pub booking_window_days: u32,
    pub gemini_api_key: String,
    pub gemini_base_url: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            store_url: env::var("BOOKING_STORE_URL").unwrap_or_else(|_| {
                warn!("BOOKING_STORE_URL not set, using empty value");
                String::new()
            }),
            store_api_key: env::var("BOOKING_STORE_API_KEY").unwrap_or_else(|_| {
                warn!("BOOKING_STORE_API_KEY not set, using empty value");
                String::new()
            }),
            store_timeout_secs: env::var("BOOKING_STORE_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5),
            availability_read_fallback: match env::var("AVAILABILITY_READ_FALLBACK").as_deref() {
                Ok("fail_closed") => ReadFallbackPolicy::FailClosed,
                _ => ReadFallbackPolicy::FailOpen,
            },
            slot_cache_ttl_secs: env::var("SLOT_CACHE_TTL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(300),
            booking_window_days: env::var("BOOKING_WINDOW_DAYS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(7),
            gemini_api_key: env::var("GEMINI_API_KEY").unwrap_or_else(|_| {
                warn!("GEMINI_API_KEY not set, assistant replies will degrade");
                String::new()
            }),
            gemini_base_url: env::var("GEMINI_BASE_URL").unwrap_or_else(|_| {
                "https://generativelanguage.googleapis.com/v1beta".to_string()
            }),
        };

        if !config.is_store_configured() {
            warn!("Booking store not configured - bookings cannot be persisted");
        }

        config
    }

    pub fn is_store_configured(&self) -> bool {
        !self.store_url.is_empty() && !self.store_api_key.is_empty()
    }

    pub fn is_assistant_configured(&self) -> bool {
        !self.gemini_api_key.is_empty() && !self.gemini_base_url.is_empty()
    }
}
