//! Datastore API endpoints.

use axum::{extract::State, response::Response};

use super::{file_response, success, ApiResult};
use crate::errors::AppError;
use crate::models::Document;
use crate::AppState;

/// GET /api/datastore - Get every record and the batch counters.
pub async fn get_datastore(State(state): State<AppState>) -> ApiResult<Document> {
    success(state.repo.get_document().await)
}

/// GET /api/datastore/export - Download the persisted document as stored on disk.
pub async fn export_datastore(State(state): State<AppState>) -> Result<Response, AppError> {
    let bytes = state.repo.export_document().await?;
    let filename = state
        .repo
        .document_path()
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "alumni_data.json".to_string());

    Ok(file_response(
        bytes,
        "application/json",
        format!("attachment; filename=\"{}\"", filename),
    ))
}
