use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Response listing the users currently present in a room
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PresenceResponse {
    pub room_id: Uuid,
    pub users: Vec<Uuid>,
}
