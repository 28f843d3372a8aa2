pub mod auth_service;
pub mod draft_service;
pub mod room_service;

use thiserror::Error;
use uuid::Uuid;

use crate::repo::RepoError;

pub use draft_service::DraftManager;
pub use room_service::RoomManager;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("room not found")]
    RoomNotFound,
    #[error("draft not found: {0}")]
    DraftNotFound(Uuid),
    #[error(transparent)]
    Repo(#[from] RepoError),
}
