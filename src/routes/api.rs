use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::handlers::{
    acquire_lock, compare_drafts, create_draft, create_room, diagnostics, get_draft, get_lock,
    get_presence, get_room, health_check, list_drafts, list_rooms, ready_check, release_lock,
};
use crate::routes::auth_middleware::auth_middleware;
use crate::AppState;

/// Create API routes
pub fn create_api_routes(state: Arc<AppState>) -> Router {
    Router::<Arc<AppState>>::new()
        .route("/v1/rooms", post(create_room).get(list_rooms))
        .route("/v1/rooms/:room_id", get(get_room))
        .route("/v1/rooms/:room_id/drafts", post(create_draft).get(list_drafts))
        .route("/v1/rooms/:room_id/presence", get(get_presence))
        .route(
            "/v1/rooms/:room_id/fields/:field/lock",
            post(acquire_lock).delete(release_lock).get(get_lock),
        )
        .route("/v1/drafts/compare", get(compare_drafts))
        .route("/v1/drafts/:draft_id", get(get_draft))
        .route("/v1/diagnostics", get(diagnostics))
        .route_layer(middleware::from_fn(auth_middleware)) // Applies to all routes added above
        .route("/health", get(health_check))
        .route("/ready", get(ready_check))
        .with_state(state)
}
