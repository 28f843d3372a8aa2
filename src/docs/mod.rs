use utoipa::OpenApi;

use crate::models::*;

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    )
)]
#[allow(dead_code)]
pub async fn health_check_doc() {}

/// Create a new room
#[utoipa::path(
    post,
    path = "/api/v1/rooms",
    request_body = RoomCreateRequest,
    responses(
        (status = 201, description = "Room created successfully", body = Room),
        (status = 401, description = "Missing caller identity", body = ErrorResponse)
    )
)]
#[allow(dead_code)]
pub async fn create_room_doc() {}

/// List all rooms
#[utoipa::path(
    get,
    path = "/api/v1/rooms",
    responses(
        (status = 200, description = "All rooms", body = [Room])
    )
)]
#[allow(dead_code)]
pub async fn list_rooms_doc() {}

/// Create the next draft version in a room
#[utoipa::path(
    post,
    path = "/api/v1/rooms/{room_id}/drafts",
    request_body = DraftCreateRequest,
    params(
        ("room_id" = uuid::Uuid, Path, description = "Room id")
    ),
    responses(
        (status = 201, description = "Draft created successfully", body = Draft),
        (status = 404, description = "Room not found", body = ErrorResponse)
    )
)]
#[allow(dead_code)]
pub async fn create_draft_doc() {}

/// Compare two draft versions
#[utoipa::path(
    get,
    path = "/api/v1/drafts/compare",
    params(
        ("base_id" = uuid::Uuid, Query, description = "Base draft id"),
        ("target_id" = uuid::Uuid, Query, description = "Target draft id")
    ),
    responses(
        (status = 200, description = "Unified diff of the two drafts", body = DraftDiffResponse),
        (status = 400, description = "Unknown draft id", body = ErrorResponse)
    )
)]
#[allow(dead_code)]
pub async fn compare_drafts_doc() {}

/// Acquire a field lock
#[utoipa::path(
    post,
    path = "/api/v1/rooms/{room_id}/fields/{field}/lock",
    params(
        ("room_id" = uuid::Uuid, Path, description = "Room id"),
        ("field" = String, Path, description = "Field name")
    ),
    responses(
        (status = 200, description = "Lock acquired", body = LockStatusResponse),
        (status = 409, description = "Field already locked", body = ErrorResponse)
    )
)]
#[allow(dead_code)]
pub async fn acquire_lock_doc() {}

/// Release a field lock
#[utoipa::path(
    delete,
    path = "/api/v1/rooms/{room_id}/fields/{field}/lock",
    params(
        ("room_id" = uuid::Uuid, Path, description = "Room id"),
        ("field" = String, Path, description = "Field name")
    ),
    responses(
        (status = 200, description = "Lock released", body = LockStatusResponse),
        (status = 409, description = "Caller does not hold the lock", body = ErrorResponse)
    )
)]
#[allow(dead_code)]
pub async fn release_lock_doc() {}

/// List users present in a room
#[utoipa::path(
    get,
    path = "/api/v1/rooms/{room_id}/presence",
    params(
        ("room_id" = uuid::Uuid, Path, description = "Room id")
    ),
    responses(
        (status = 200, description = "Present users", body = PresenceResponse)
    )
)]
#[allow(dead_code)]
pub async fn presence_doc() {}

#[derive(OpenApi)]
#[openapi(
    paths(
        health_check_doc,
        create_room_doc,
        list_rooms_doc,
        create_draft_doc,
        compare_drafts_doc,
        acquire_lock_doc,
        release_lock_doc,
        presence_doc,
    ),
    components(
        schemas(
            HealthResponse,
            ReadyResponse,
            DiagnosticsResponse,
            Room,
            RoomCreateRequest,
            Draft,
            DraftCreateRequest,
            DraftDiffResponse,
            LockStatusResponse,
            PresenceResponse,
            ErrorResponse
        )
    ),
    tags(
        (name = "api", description = "API endpoints")
    )
)]
pub struct ApiDoc;
