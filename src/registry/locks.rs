use std::time::Duration;

use async_trait::async_trait;
use redis::{AsyncCommands, Script};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::LockRegistry;
use crate::store::{Store, StoreError};

/// Creates the lock record only if absent, with the given expiry, and adds
/// the field to the holder's index in the same atomic step. The index can
/// therefore never reference a lock that was not actually created.
const ACQUIRE_SCRIPT: &str = r#"
if redis.call("SET", KEYS[1], ARGV[1], "NX", "PX", ARGV[2]) then
    redis.call("SADD", KEYS[2], ARGV[3])
    return 1
end
return 0
"#;

/// Deletes the lock record only if the caller is the current holder, and
/// drops the field from the holder's index in the same atomic step. A plain
/// get-check-delete would open a window in which an expired lock could be
/// reassigned between the check and the delete.
const RELEASE_SCRIPT: &str = r#"
if redis.call("GET", KEYS[1]) == ARGV[1] then
    redis.call("DEL", KEYS[1])
    redis.call("SREM", KEYS[2], ARGV[2])
    return 1
end
return 0
"#;

/// Redis implementation of the LockRegistry.
///
/// Lock state is authoritative in the store; the per-user index is an
/// advisory cache used only for bulk cleanup on disconnect.
pub struct RedisLockRegistry {
    store: Store,
    acquire_script: Script,
    release_script: Script,
}

impl RedisLockRegistry {
    pub fn new(store: Store) -> Self {
        Self {
            store,
            acquire_script: Script::new(ACQUIRE_SCRIPT),
            release_script: Script::new(RELEASE_SCRIPT),
        }
    }

    fn lock_key(room_id: Uuid, field: &str) -> String {
        format!("lock:room:{}:field:{}", room_id, field)
    }

    fn index_key(user_id: Uuid, room_id: Uuid) -> String {
        format!("lock:user:{}:room:{}", user_id, room_id)
    }
}

#[async_trait]
impl LockRegistry for RedisLockRegistry {
    async fn acquire(
        &self,
        room_id: Uuid,
        field: &str,
        user_id: Uuid,
        ttl: Duration,
    ) -> Result<bool, StoreError> {
        let lock_key = Self::lock_key(room_id, field);
        let index_key = Self::index_key(user_id, room_id);
        let ttl_ms = ttl.as_millis().max(1) as u64;

        let mut conn = self.store.conn().await?;
        let granted: i64 = self
            .acquire_script
            .key(&lock_key)
            .key(&index_key)
            .arg(user_id.to_string())
            .arg(ttl_ms)
            .arg(field)
            .invoke_async(&mut conn)
            .await?;

        if granted == 1 {
            info!("Lock acquired: {} by {}", lock_key, user_id);
            Ok(true)
        } else {
            debug!("Lock denied: {} requested by {}", lock_key, user_id);
            Ok(false)
        }
    }

    async fn release(
        &self,
        room_id: Uuid,
        field: &str,
        user_id: Uuid,
    ) -> Result<bool, StoreError> {
        let lock_key = Self::lock_key(room_id, field);
        let index_key = Self::index_key(user_id, room_id);

        let mut conn = self.store.conn().await?;
        let released: i64 = self
            .release_script
            .key(&lock_key)
            .key(&index_key)
            .arg(user_id.to_string())
            .arg(field)
            .invoke_async(&mut conn)
            .await?;

        if released == 1 {
            info!("Lock released: {} by {}", lock_key, user_id);
            Ok(true)
        } else {
            warn!(
                "Lock release failed: {} by {} (not owner or expired)",
                lock_key, user_id
            );
            Ok(false)
        }
    }

    async fn get_owner(&self, room_id: Uuid, field: &str) -> Result<Option<Uuid>, StoreError> {
        let lock_key = Self::lock_key(room_id, field);

        let mut conn = self.store.conn().await?;
        let value: Option<String> = conn.get(&lock_key).await?;

        match value {
            Some(raw) => match Uuid::parse_str(&raw) {
                Ok(owner) => Ok(Some(owner)),
                Err(_) => {
                    // Corrupted record: report unlocked rather than failing the caller
                    warn!("Malformed lock record at {}: {:?}", lock_key, raw);
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    async fn release_all_for_user(
        &self,
        room_id: Uuid,
        user_id: Uuid,
    ) -> Result<usize, StoreError> {
        let index_key = Self::index_key(user_id, room_id);

        let mut conn = self.store.conn().await?;
        let fields: Vec<String> = conn.smembers(&index_key).await?;

        let mut released = 0;
        for field in &fields {
            // Expired entries come back false and count as zero; a failure
            // on one field must not abort the rest of the batch.
            match self.release(room_id, field, user_id).await {
                Ok(true) => released += 1,
                Ok(false) => {}
                Err(e) => {
                    warn!(
                        "Failed to release lock on field '{}' for user {} in room {}: {}",
                        field, user_id, room_id, e
                    );
                }
            }
        }

        // The index is advisory and must never accumulate stale entries
        let _: () = conn.del(&index_key).await?;

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
