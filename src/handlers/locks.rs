use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use tracing::info;
use uuid::Uuid;

use crate::models::{ErrorResponse, LockStatusResponse};
use crate::registry::LockRegistry;
use crate::store::StoreError;
use crate::AppState;

fn store_error(e: StoreError) -> (StatusCode, Json<ErrorResponse>) {
    ErrorResponse::with_status(StatusCode::SERVICE_UNAVAILABLE, e.to_string())
}

/// Try to acquire the edit lock on a field
pub async fn acquire_lock(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Path((room_id, field)): Path<(Uuid, String)>,
) -> Result<(StatusCode, Json<LockStatusResponse>), (StatusCode, Json<ErrorResponse>)> {
    let acquired = state
        .locks
        .acquire(room_id, &field, user_id, state.config.lock_ttl())
        .await
        .map_err(store_error)?;

    if !acquired {
        return Err(ErrorResponse::with_status(
            StatusCode::CONFLICT,
            format!("Field '{}' is already locked", field),
        ));
    }

    info!("User {} locked field '{}' in room {}", user_id, field, room_id);
    Ok((
        StatusCode::OK,
        Json(LockStatusResponse {
            field,
            owner: Some(user_id),
        }),
    ))
}

/// Release the edit lock on a field
pub async fn release_lock(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Path((room_id, field)): Path<(Uuid, String)>,
) -> Result<(StatusCode, Json<LockStatusResponse>), (StatusCode, Json<ErrorResponse>)> {
    let released = state
        .locks
        .release(room_id, &field, user_id)
        .await
        .map_err(store_error)?;

    if !released {
        return Err(ErrorResponse::with_status(
            StatusCode::CONFLICT,
            format!("Field '{}' is not held by the caller", field),
        ));
    }

    info!(
        "User {} released field '{}' in room {}",
        user_id, field, room_id
    );
    Ok((StatusCode::OK, Json(LockStatusResponse { field, owner: None })))
}

/// Report the current holder of a field lock, if any
pub async fn get_lock(
    State(state): State<Arc<AppState>>,
    Path((room_id, field)): Path<(Uuid, String)>,
) -> Result<Json<LockStatusResponse>, (StatusCode, Json<ErrorResponse>)> {
    let owner = state
        .locks
        .get_owner(room_id, &field)
        .await
        .map_err(store_error)?;
    Ok(Json(LockStatusResponse { field, owner }))
}
