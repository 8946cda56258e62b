// Handlers module
// HTTP handlers for the REST API

pub mod data;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::Local;
use serde_json::json;
use tracing::info;

use crate::{error::ApiError, store::SharedStore};

/// Layout of the timestamp in the welcome banner.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// Welcome banner
/// GET /
pub async fn index() -> impl IntoResponse {
    let now = Local::now().format(TIMESTAMP_FORMAT);
    (
        StatusCode::OK,
        format!("Welcome to the Data API! The current time is: {}", now),
    )
}

/// Health check handler
/// Pings the document store; 503 when it cannot be reached.
pub async fn health_check(
    State(store): State<SharedStore>,
) -> Result<impl IntoResponse, ApiError> {
    store.health_check().await?;

    info!("Health check passed");
    Ok((StatusCode::OK, Json(json!({ "status": "ok" }))))
}
