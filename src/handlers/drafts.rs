use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use uuid::Uuid;

use super::service_error;
use crate::models::{Draft, DraftCompareParams, DraftCreateRequest, DraftDiffResponse, ErrorResponse};
use crate::AppState;

/// Create the next draft version for a room
pub async fn create_draft(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Path(room_id): Path<Uuid>,
    Json(request): Json<DraftCreateRequest>,
) -> Result<(StatusCode, Json<Draft>), (StatusCode, Json<ErrorResponse>)> {
    let draft = state
        .draft_manager
        .create_draft(room_id, request, user_id)
        .await
        .map_err(service_error)?;
    Ok((StatusCode::CREATED, Json(draft)))
}

/// List a room's drafts in version order
pub async fn list_drafts(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<Uuid>,
) -> Result<Json<Vec<Draft>>, (StatusCode, Json<ErrorResponse>)> {
    let drafts = state
        .draft_manager
        .list_drafts(room_id)
        .await
        .map_err(service_error)?;
    Ok(Json(drafts))
}

/// Get a single draft by id
pub async fn get_draft(
    State(state): State<Arc<AppState>>,
    Path(draft_id): Path<Uuid>,
) -> Result<Json<Draft>, (StatusCode, Json<ErrorResponse>)> {
    let draft = state
        .draft_manager
        .get_draft(draft_id)
        .await
        .map_err(service_error)?;
    match draft {
        Some(draft) => Ok(Json(draft)),
        None => Err(ErrorResponse::with_status(
            StatusCode::NOT_FOUND,
            format!("Draft '{}' not found", draft_id),
        )),
    }
}

/// Compute the unified diff between two draft versions
pub async fn compare_drafts(
    State(state): State<Arc<AppState>>,
    Query(params): Query<DraftCompareParams>,
) -> Result<Json<DraftDiffResponse>, (StatusCode, Json<ErrorResponse>)> {
    let diff = state
        .draft_manager
        .compare_versions(params.base_id, params.target_id)
        .await
        .map_err(service_error)?;
    Ok(Json(DraftDiffResponse {
        base_id: params.base_id,
        target_id: params.target_id,
        diff,
    }))
}
