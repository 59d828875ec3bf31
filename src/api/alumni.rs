//! Alumni API endpoints.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use super::{success, ApiResult};
use crate::errors::AppError;
use crate::models::{Alumni, AlumniInput, ListQuery};
use crate::AppState;

/// Filtered, optionally sorted list of alumni.
#[derive(Debug, Serialize)]
pub struct AlumniList {
    pub total: usize,
    pub results: Vec<Alumni>,
}

#[derive(Debug, Serialize)]
pub struct CreatedAlumni {
    pub id: String,
}

/// Request body for moving a record to another batch.
#[derive(Debug, Deserialize)]
pub struct ReassignBatchRequest {
    pub new_batch: String,
}

#[derive(Debug, Serialize)]
pub struct ReassignedAlumni {
    pub old_id: String,
    pub new_id: String,
}

/// GET /api/alumni - List alumni, filtered by batch/gender and optionally sorted.
pub async fn list_alumni(
    State(state): State<AppState>,
    Query(params): Query<ListQuery>,
) -> ApiResult<AlumniList> {
    let sort = params.sort()?;
    let results = state.repo.list_alumni(&params.filter(), sort).await;

    success(AlumniList {
        total: results.len(),
        results,
    })
}

/// GET /api/alumni/:id - Get a single record.
pub async fn get_alumni(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Alumni> {
    match state.repo.get_alumni(&id).await {
        Some(alumni) => success(alumni),
        None => Err(AppError::alumni_not_found(&id)),
    }
}

/// POST /api/alumni - Create a record; the identifier is minted from the batch.
pub async fn create_alumni(
    State(state): State<AppState>,
    Json(request): Json<AlumniInput>,
) -> ApiResult<CreatedAlumni> {
    let id = state.repo.create_alumni(request).await?;
    success(CreatedAlumni { id })
}

/// PUT /api/alumni/:id - Replace a record's fields, keeping its identifier and batch.
pub async fn update_alumni(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<AlumniInput>,
) -> ApiResult<Alumni> {
    let alumni = state.repo.update_alumni(&id, request).await?;
    success(alumni)
}

/// DELETE /api/alumni/:id - Delete a record and its photo.
pub async fn delete_alumni(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<()> {
    state.repo.delete_alumni(&id).await?;
    success(())
}

/// PUT /api/alumni/:id/batch - Move a record to another batch under a new identifier.
pub async fn reassign_batch(
    State(state): State<AppState>,
    Path(old_id): Path<String>,
    Json(request): Json<ReassignBatchRequest>,
) -> ApiResult<ReassignedAlumni> {
    let new_id = state.repo.reassign_batch(&old_id, &request.new_batch).await?;
    success(ReassignedAlumni { old_id, new_id })
}
