//! Room and draft storage, specified at its interface boundary.
//!
//! The realtime core never touches these; they back the plain REST
//! endpoints. In-memory implementations serve single-instance deployments
//! and tests; Postgres implementations live in `crate::db`.

pub mod memory;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Draft, Room};

pub use memory::{InMemoryDraftRepository, InMemoryRoomRepository};

#[derive(Debug, Error)]
pub enum RepoError {
    /// Unique constraint violation (duplicate id, duplicate room version)
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("storage error: {0}")]
    Storage(String),
}

#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// Adds a new room; a duplicate id is a conflict.
    async fn add(&self, room: Room) -> Result<Room, RepoError>;
    /// Updates an existing room; unknown ids are a conflict.
    async fn update(&self, room: Room) -> Result<Room, RepoError>;
    async fn get(&self, room_id: Uuid) -> Result<Option<Room>, RepoError>;
    async fn list_all(&self) -> Result<Vec<Room>, RepoError>;
}

#[async_trait]
pub trait DraftRepository: Send + Sync {
    /// Adds a new draft; `(room_id, version_number)` must be unique.
    async fn add(&self, draft: Draft) -> Result<Draft, RepoError>;
    async fn get(&self, draft_id: Uuid) -> Result<Option<Draft>, RepoError>;
    /// Lists a room's drafts ordered by version number.
    async fn list_by_room(&self, room_id: Uuid) -> Result<Vec<Draft>, RepoError>;
    /// Highest version number stored for the room, if any.
    async fn latest_version(&self, room_id: Uuid) -> Result<Option<i32>, RepoError>;
}
