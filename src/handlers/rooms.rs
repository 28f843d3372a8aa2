use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use uuid::Uuid;

use super::service_error;
use crate::models::{ErrorResponse, Room, RoomCreateRequest};
use crate::AppState;

/// Create a new room
pub async fn create_room(
    State(state): State<Arc<AppState>>,
    Extension(_user_id): Extension<Uuid>,
    Json(request): Json<RoomCreateRequest>,
) -> Result<(StatusCode, Json<Room>), (StatusCode, Json<ErrorResponse>)> {
    if request.name.trim().is_empty() {
        return Err(ErrorResponse::with_status(
            StatusCode::BAD_REQUEST,
            "Room name cannot be empty",
        ));
    }

    let room = state
        .room_manager
        .create_room(request.name.trim())
        .await
        .map_err(service_error)?;
    Ok((StatusCode::CREATED, Json(room)))
}

/// List all rooms
pub async fn list_rooms(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Room>>, (StatusCode, Json<ErrorResponse>)> {
    let rooms = state.room_manager.list_rooms().await.map_err(service_error)?;
    Ok(Json(rooms))
}

/// Get a room by id
pub async fn get_room(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<Uuid>,
) -> Result<Json<Room>, (StatusCode, Json<ErrorResponse>)> {
    let room = state
        .room_manager
        .get_room(room_id)
        .await
        .map_err(service_error)?;
    match room {
        Some(room) => Ok(Json(room)),
        None => Err(ErrorResponse::with_status(
            StatusCode::NOT_FOUND,
            format!("Room '{}' not found", room_id),
        )),
    }
}
