use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::models::{ErrorResponse, PresenceResponse};
use crate::registry::PresenceRegistry;
use crate::AppState;

/// List the users currently present in a room
pub async fn get_presence(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<Uuid>,
) -> Result<Json<PresenceResponse>, (StatusCode, Json<ErrorResponse>)> {
    let users = state
        .presence
        .get_present_users(room_id)
        .await
        .map_err(|e| ErrorResponse::with_status(StatusCode::SERVICE_UNAVAILABLE, e.to_string()))?;
    Ok(Json(PresenceResponse { room_id, users }))
}
