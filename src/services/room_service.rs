use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use super::ServiceError;
use crate::models::Room;
use crate::repo::RoomRepository;

/// Manages the lifecycle of rooms (workspaces).
pub struct RoomManager {
    repository: Arc<dyn RoomRepository>,
}

impl RoomManager {
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self { repository }
    }

    /// Creates a new room container
    pub async fn create_room(&self, name: &str) -> Result<Room, ServiceError> {
        let room = self.repository.add(Room::new(name)).await?;
        info!("Created room: {} ({})", room.name, room.id);
        Ok(room)
    }

    pub async fn get_room(&self, room_id: Uuid) -> Result<Option<Room>, ServiceError> {
        Ok(self.repository.get(room_id).await?)
    }

    pub async fn list_rooms(&self) -> Result<Vec<Room>, ServiceError> {
        Ok(self.repository.list_all().await?)
    }
}
