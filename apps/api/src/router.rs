use std::sync::Arc;

use axum::{routing::get, Json, Router};
use serde_json::json;

use appointment_cell::handlers::AppointmentState;
use appointment_cell::router::appointment_routes;
use assistant_cell::router::chat_routes;
use assistant_cell::SessionController;
use doctor_cell::router::doctor_routes;
use doctor_cell::DoctorCatalog;

pub fn create_router(
    catalog: Arc<DoctorCatalog>,
    appointments: Arc<AppointmentState>,
    sessions: Arc<SessionController>,
) -> Router {
    Router::new()
        .route(
            "/health",
            get(|| async { Json(json!({ "status": "ok" })) }),
        )
        .nest("/api/doctors", doctor_routes(catalog))
        .nest("/api/appointments", appointment_routes(appointments))
        .nest("/api/chat", chat_routes(sessions))
}
