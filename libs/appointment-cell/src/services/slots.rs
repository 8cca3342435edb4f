// libs/appointment-cell/src/services/slots.rs
use chrono::{Duration, NaiveDate, NaiveTime};

use crate::models::Slot;

/// The clinic's fixed consultation times: three morning and three afternoon
/// slots per day.
pub fn daily_templates() -> Vec<NaiveTime> {
    [(9, 0), (10, 0), (11, 0), (14, 0), (15, 0), (16, 0)]
        .into_iter()
        .map(|(h, m)| NaiveTime::from_hms_opt(h, m, 0).unwrap())
        .collect()
}

/// Generate the canonical bookable slots for a rolling window starting at
/// `from`, day-major then time-minor.
///
/// Pure and deterministic: `days * templates.len()` slots, no error
/// conditions.
pub fn generate_slots(from: NaiveDate, days: u32, templates: &[NaiveTime]) -> Vec<Slot> {
    let mut slots = Vec::with_capacity(days as usize * templates.len());

    for offset in 0..days {
        let date = from + Duration::days(offset as i64);
        for &time in templates {
            slots.push(Slot::new(date, time));
        }
    }

    slots
}
