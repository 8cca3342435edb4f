use std::sync::Arc;

use axum::{extract::State, Json};
use serde_json::{json, Value};
use tracing::debug;

use shared_models::AppError;

use crate::services::catalog::DoctorCatalog;

pub async fn list_doctors(
    State(catalog): State<Arc<DoctorCatalog>>,
) -> Result<Json<Value>, AppError> {
    debug!("Listing doctor catalog");

    Ok(Json(json!({
        "doctors": catalog.doctors(),
    })))
}
