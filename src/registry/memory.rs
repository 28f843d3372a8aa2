use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::{LockRegistry, PresenceRegistry};
use crate::store::StoreError;

struct LockEntry {
    holder: Uuid,
    expires_at: Instant,
}

impl LockEntry {
    fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

#[derive(Default)]
struct LockTables {
    // (room, field) -> holder; authoritative
    locks: HashMap<(Uuid, String), LockEntry>,
    // (room, user) -> held fields; advisory cleanup index
    index: HashMap<(Uuid, Uuid), HashSet<String>>,
}

/// In-process implementation of the LockRegistry.
///
/// Same semantics as the Redis registry, including passive TTL expiry and
/// the zombie-release guard, but scoped to a single service instance. One
/// mutex covers both tables, so every operation is atomic the way a Redis
/// script is.
#[derive(Default)]
pub struct InMemoryLockRegistry {
    tables: Mutex<LockTables>,
}

impl InMemoryLockRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LockRegistry for InMemoryLockRegistry {
    async fn acquire(
        &self,
        room_id: Uuid,
        field: &str,
        user_id: Uuid,
        ttl: Duration,
    ) -> Result<bool, StoreError> {
        let mut tables = self.tables.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(entry) = tables.locks.get(&(room_id, field.to_string())) {
            if !entry.is_expired() {
                debug!(
                    "Lock denied: room {} field '{}' requested by {}",
                    room_id, field, user_id
                );
                return Ok(false);
            }
        }

        tables.locks.insert(
            (room_id, field.to_string()),
            LockEntry {
                holder: user_id,
                expires_at: Instant::now() + ttl,
            },
        );
        tables
            .index
            .entry((room_id, user_id))
            .or_default()
            .insert(field.to_string());

        info!("Lock acquired: room {} field '{}' by {}", room_id, field, user_id);
        Ok(true)
    }

    async fn release(
        &self,
        room_id: Uuid,
        field: &str,
        user_id: Uuid,
    ) -> Result<bool, StoreError> {
        let mut tables = self.tables.lock().unwrap_or_else(PoisonError::into_inner);

        let owned = matches!(
            tables.locks.get(&(room_id, field.to_string())),
            Some(entry) if entry.holder == user_id && !entry.is_expired()
        );
        if !owned {
            warn!(
                "Lock release failed: room {} field '{}' by {} (not owner or expired)",
                room_id, field, user_id
            );
            return Ok(false);
        }

        tables.locks.remove(&(room_id, field.to_string()));
        if let Some(fields) = tables.index.get_mut(&(room_id, user_id)) {
            fields.remove(field);
        }
        info!("Lock released: room {} field '{}' by {}", room_id, field, user_id);
        Ok(true)
    }

    async fn get_owner(&self, room_id: Uuid, field: &str) -> Result<Option<Uuid>, StoreError> {
        let tables = self.tables.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(tables
            .locks
            .get(&(room_id, field.to_string()))
            .filter(|entry| !entry.is_expired())
            .map(|entry| entry.holder))
    }

    async fn release_all_for_user(
        &self,
        room_id: Uuid,
        user_id: Uuid,
    ) -> Result<usize, StoreError> {
        let mut tables = self.tables.lock().unwrap_or_else(PoisonError::into_inner);

        // Take the index entry unconditionally; it must be empty afterwards
        // no matter how many of the listed locks were still live.
        let fields = tables.index.remove(&(room_id, user_id)).unwrap_or_default();

        let mut released = 0;
        for field in &fields {
            let owned = matches!(
                tables.locks.get(&(room_id, field.clone())),
                Some(entry) if entry.holder == user_id && !entry.is_expired()
            );
            if owned {
                tables.locks.remove(&(room_id, field.clone()));
                released += 1;
            }
        }

        info!(
            "Released {} of {} indexed locks for user {} in room {}",
            released,
            fields.len(),
            user_id,
            room_id
        );
        Ok(released)
    }
}

/// In-process implementation of the PresenceRegistry.
#[derive(Default)]
pub struct InMemoryPresenceRegistry {
    rooms: Mutex<HashMap<Uuid, HashSet<Uuid>>>,
}

impl InMemoryPresenceRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PresenceRegistry for InMemoryPresenceRegistry {
    async fn add_user(&self, room_id: Uuid, user_id: Uuid) -> Result<(), StoreError> {
        let mut rooms = self.rooms.lock().unwrap_or_else(PoisonError::into_inner);
        rooms.entry(room_id).or_default().insert(user_id);
        debug!("User {} added to presence set for room {}", user_id, room_id);
        Ok(())
    }

    async fn remove_user(&self, room_id: Uuid, user_id: Uuid) -> Result<(), StoreError> {
        let mut rooms = self.rooms.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(users) = rooms.get_mut(&room_id) {
            users.remove(&user_id);
            if users.is_empty() {
                rooms.remove(&room_id);
            }
        }
        debug!(
            "User {} removed from presence set for room {}",
            user_id, room_id
        );
        Ok(())
    }

    async fn get_present_users(&self, room_id: Uuid) -> Result<Vec<Uuid>, StoreError> {
        let rooms = self.rooms.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(rooms
            .get(&room_id)
            .map(|users| users.iter().copied().collect())
            .unwrap_or_default())
    }
}
