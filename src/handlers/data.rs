// Data handlers
// Passthrough insert / list over the document collection

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::{json, Value};
use tracing::info;

use crate::{error::ApiError, models::document, store::SharedStore};

/// Insert an arbitrary JSON object
/// POST /data
pub async fn insert_data(
    State(store): State<SharedStore>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(body) = payload?;
    let document = document::from_json(body)?;

    info!("Inserting document with {} top-level fields", document.len());

    store.insert_document(document).await?;

    Ok((StatusCode::CREATED, Json(json!({ "status": "Data inserted" }))))
}

/// List every stored document
/// GET /data
pub async fn list_data(
    State(store): State<SharedStore>,
) -> Result<impl IntoResponse, ApiError> {
    info!("Fetching all documents");

    // Full collection on every call; there is no paging
    let documents = store.find_all_documents().await?;

    info!("Retrieved {} documents", documents.len());
    Ok((StatusCode::OK, Json(documents)))
}
