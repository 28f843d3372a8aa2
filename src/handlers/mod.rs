pub mod diagnostics;
pub mod drafts;
pub mod health;
pub mod locks;
pub mod presence;
pub mod rooms;

pub use diagnostics::*;
pub use drafts::*;
pub use health::*;
pub use locks::*;
pub use presence::*;
pub use rooms::*;

use axum::{http::StatusCode, Json};

use crate::models::ErrorResponse;
use crate::services::ServiceError;

/// Map a service failure onto the API error shape
pub(crate) fn service_error(e: ServiceError) -> (StatusCode, Json<ErrorResponse>) {
    match &e {
        ServiceError::RoomNotFound => ErrorResponse::with_status(StatusCode::NOT_FOUND, "Room not found"),
        ServiceError::DraftNotFound(id) => ErrorResponse::with_status(
            StatusCode::BAD_REQUEST,
            format!("Draft '{}' not found", id),
        ),
        ServiceError::Repo(repo) if matches!(repo, crate::repo::RepoError::Conflict(_)) => {
            ErrorResponse::with_status(StatusCode::CONFLICT, e.to_string())
        }
        ServiceError::Repo(_) => {
            ErrorResponse::with_status(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}
