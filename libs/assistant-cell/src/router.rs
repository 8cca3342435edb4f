// libs/assistant-cell/src/router.rs
use std::sync::Arc;

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::handlers;
use crate::services::session::SessionController;

pub fn chat_routes(controller: Arc<SessionController>) -> Router {
    Router::new()
        .route("/sessions", post(handlers::create_session))
        .route("/sessions/{id}", get(handlers::get_session))
        .route("/sessions/{id}/messages", post(handlers::send_message))
        .route("/sessions/{id}/booking/start", post(handlers::start_booking))
        .route(
            "/sessions/{id}/booking/cancel",
            post(handlers::cancel_booking),
        )
        .route("/sessions/{id}/booking", patch(handlers::update_booking))
        .route(
            "/sessions/{id}/booking/submit",
            post(handlers::submit_booking),
        )
        .with_state(controller)
}
