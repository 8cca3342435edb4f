use serde::{Deserialize, Serialize};

/// Static reference data for one of the clinic's specialists.
///
/// The catalog is read-only: bookings copy the doctor's identity at booking
/// time, so later catalog edits never rewrite history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Doctor {
    pub name: String,
    pub specialization: String,
    pub experience: String,
    pub fee: String,
    pub availability: String,
    pub education: String,
    pub glyph: String,
}
