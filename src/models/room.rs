use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// A workspace container scoping drafts, presence, and field locks.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Room {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    /// The draft currently considered "head" for this room
    pub current_draft_id: Option<Uuid>,
}

impl Room {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            created_at: Utc::now(),
            current_draft_id: None,
        }
    }
}

/// Request body for creating a room
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct RoomCreateRequest {
    pub name: String,
}
