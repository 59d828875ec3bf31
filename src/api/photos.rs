//! Photo API endpoints.

use axum::{
    body::Bytes,
    extract::{Path, State},
    response::Response,
};
use serde::Serialize;

use super::{file_response, success, ApiResult};
use crate::errors::AppError;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct StoredPhoto {
    pub filename: String,
}

/// POST|PUT /api/alumni/:id/photo - Upload or replace a record's photo (raw body).
pub async fn upload_photo(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> ApiResult<StoredPhoto> {
    let filename = state.repo.store_photo(&id, &body).await?;
    success(StoredPhoto { filename })
}

/// GET /api/alumni/:id/photo - Fetch a record's photo.
pub async fn get_photo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let (filename, bytes) = state.repo.read_photo(&id).await?;
    Ok(file_response(
        bytes,
        "image/jpeg",
        format!("inline; filename=\"{}\"", filename),
    ))
}

/// GET /api/photos/export - Download every photo as a ZIP archive.
pub async fn export_photos(State(state): State<AppState>) -> Result<Response, AppError> {
    let bytes = state.repo.export_photos().await?;
    Ok(file_response(
        bytes,
        "application/zip",
        "attachment; filename=\"all_photos.zip\"".to_string(),
    ))
}
