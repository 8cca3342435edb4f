// libs/appointment-cell/src/router.rs
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::{self, AppointmentState};

pub fn appointment_routes(state: Arc<AppointmentState>) -> Router {
    Router::new()
        .route("/slots", get(handlers::get_available_slots))
        .route("/bookings", post(handlers::book_appointment))
        .with_state(state)
}
