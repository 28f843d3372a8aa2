use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use uuid::Uuid;

use super::{DraftRepository, RepoError, RoomRepository};
use crate::models::{Draft, Room};

/// In-memory implementation of RoomRepository.
///
/// Values are cloned on the way in and out to mimic database isolation.
#[derive(Default)]
pub struct InMemoryRoomRepository {
    rooms: Mutex<HashMap<Uuid, Room>>,
}

impl InMemoryRoomRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RoomRepository for InMemoryRoomRepository {
    async fn add(&self, room: Room) -> Result<Room, RepoError> {
        let mut rooms = self.rooms.lock().unwrap_or_else(PoisonError::into_inner);
        if rooms.contains_key(&room.id) {
            return Err(RepoError::Conflict(format!(
                "room {} already exists",
                room.id
            )));
        }
        rooms.insert(room.id, room.clone());
        Ok(room)
    }

    async fn update(&self, room: Room) -> Result<Room, RepoError> {
        let mut rooms = self.rooms.lock().unwrap_or_else(PoisonError::into_inner);
        if !rooms.contains_key(&room.id) {
            return Err(RepoError::Conflict(format!("room {} not found", room.id)));
        }
        rooms.insert(room.id, room.clone());
        Ok(room)
    }

    async fn get(&self, room_id: Uuid) -> Result<Option<Room>, RepoError> {
        let rooms = self.rooms.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(rooms.get(&room_id).cloned())
    }

    async fn list_all(&self) -> Result<Vec<Room>, RepoError> {
        let rooms = self.rooms.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(rooms.values().cloned().collect())
    }
}

/// In-memory implementation of DraftRepository.
#[derive(Default)]
pub struct InMemoryDraftRepository {
    drafts: Mutex<HashMap<Uuid, Draft>>,
}

impl InMemoryDraftRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DraftRepository for InMemoryDraftRepository {
    async fn add(&self, draft: Draft) -> Result<Draft, RepoError> {
        let mut drafts = self.drafts.lock().unwrap_or_else(PoisonError::into_inner);
        if drafts.contains_key(&draft.id) {
            return Err(RepoError::Conflict(format!(
                "draft {} already exists",
                draft.id
            )));
        }
        // Mimic the (room_id, version_number) unique constraint
        let duplicate_version = drafts.values().any(|existing| {
            existing.room_id == draft.room_id && existing.version_number == draft.version_number
        });
        if duplicate_version {
            return Err(RepoError::Conflict(format!(
                "version {} already exists for room {}",
                draft.version_number, draft.room_id
            )));
        }
        drafts.insert(draft.id, draft.clone());
        Ok(draft)
    }

    async fn get(&self, draft_id: Uuid) -> Result<Option<Draft>, RepoError> {
        let drafts = self.drafts.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(drafts.get(&draft_id).cloned())
    }

    async fn list_by_room(&self, room_id: Uuid) -> Result<Vec<Draft>, RepoError> {
        let drafts = self.drafts.lock().unwrap_or_else(PoisonError::into_inner);
        let mut result: Vec<Draft> = drafts
            .values()
            .filter(|draft| draft.room_id == room_id)
            .cloned()
            .collect();
        result.sort_by_key(|draft| draft.version_number);
        Ok(result)
    }

    async fn latest_version(&self, room_id: Uuid) -> Result<Option<i32>, RepoError> {
        let drafts = self.drafts.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(drafts
            .values()
            .filter(|draft| draft.room_id == room_id)
            .map(|draft| draft.version_number)
            .max())
    }
}
