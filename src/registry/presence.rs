use async_trait::async_trait;
use redis::AsyncCommands;
use tracing::{debug, warn};
use uuid::Uuid;

use super::PresenceRegistry;
use crate::store::{Store, StoreError};

/// Redis implementation of the PresenceRegistry.
///
/// Presence per room is a plain set of user id strings; SADD/SREM give the
/// idempotence the registry contract requires.
pub struct RedisPresenceRegistry {
    store: Store,
}

impl RedisPresenceRegistry {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    fn presence_key(room_id: Uuid) -> String {
        format!("presence:room:{}", room_id)
    }
}

#[async_trait]
impl PresenceRegistry for RedisPresenceRegistry {
    async fn add_user(&self, room_id: Uuid, user_id: Uuid) -> Result<(), StoreError> {
        let key = Self::presence_key(room_id);
        let mut conn = self.store.conn().await?;
        let _: () = conn.sadd(&key, user_id.to_string()).await?;
        debug!("User {} added to presence set for room {}", user_id, room_id);
        Ok(())
    }

    async fn remove_user(&self, room_id: Uuid, user_id: Uuid) -> Result<(), StoreError> {
        let key = Self::presence_key(room_id);
        let mut conn = self.store.conn().await?;
        let _: () = conn.srem(&key, user_id.to_string()).await?;
        debug!(
            "User {} removed from presence set for room {}",
            user_id, room_id
        );
        Ok(())
    }

    async fn get_present_users(&self, room_id: Uuid) -> Result<Vec<Uuid>, StoreError> {
        let key = Self::presence_key(room_id);
        let mut conn = self.store.conn().await?;
        let members: Vec<String> = conn.smembers(&key).await?;

        let mut users = Vec::with_capacity(members.len());
        for member in members {
            match Uuid::parse_str(&member) {
                Ok(user_id) => users.push(user_id),
                Err(_) => {
                    // Corrupted member: skip it rather than failing the read
                    warn!("Malformed presence member in {}: {:?}", key, member);
                }
            }
        }
        Ok(users)
    }
}
