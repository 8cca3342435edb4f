use std::sync::Arc;

use axum::{routing::get, Router};

use crate::handlers;
use crate::services::catalog::DoctorCatalog;

pub fn doctor_routes(catalog: Arc<DoctorCatalog>) -> Router {
    Router::new()
        .route("/", get(handlers::list_doctors))
        .with_state(catalog)
}
