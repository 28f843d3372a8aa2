//! Distributed coordination registries: field locks and room presence.
//!
//! Each registry has a Redis-backed implementation (authoritative across
//! service instances) and an in-memory implementation with the same
//! semantics, used when no Redis URL is configured and as a test double.

pub mod locks;
pub mod memory;
pub mod presence;

use std::time::Duration;

use async_trait::async_trait;
use uuid::Uuid;

use crate::store::StoreError;

pub use locks::RedisLockRegistry;
pub use memory::{InMemoryLockRegistry, InMemoryPresenceRegistry};
pub use presence::RedisPresenceRegistry;

/// Exclusive, time-limited editing rights over single document fields.
#[async_trait]
pub trait LockRegistry: Send + Sync {
    /// Acquires a lock on a specific field of a room.
    ///
    /// Returns `Ok(false)` when the field is already locked, including by
    /// the requesting user — there is no reentrancy and no renewal; a lock
    /// lives until released or expired.
    async fn acquire(
        &self,
        room_id: Uuid,
        field: &str,
        user_id: Uuid,
        ttl: Duration,
    ) -> Result<bool, StoreError>;

    /// Releases a lock if and only if it is currently held by `user_id`.
    ///
    /// The holder check and the delete are a single atomic step, so a stale
    /// holder whose lock expired and was reassigned can never delete the
    /// new holder's lock.
    async fn release(&self, room_id: Uuid, field: &str, user_id: Uuid)
        -> Result<bool, StoreError>;

    /// Returns the current lock owner, or `None` if the field is unlocked.
    async fn get_owner(&self, room_id: Uuid, field: &str) -> Result<Option<Uuid>, StoreError>;

    /// Releases every lock the user holds in the room, returning the number
    /// actually released. Index entries for already-expired locks count as
    /// zero; the per-user index is cleared afterwards regardless.
    async fn release_all_for_user(&self, room_id: Uuid, user_id: Uuid)
        -> Result<usize, StoreError>;
}

/// Tracks which users are currently present in a room.
#[async_trait]
pub trait PresenceRegistry: Send + Sync {
    /// Marks a user as present. Idempotent.
    async fn add_user(&self, room_id: Uuid, user_id: Uuid) -> Result<(), StoreError>;

    /// Removes a user from the room's presence set. Removing an absent
    /// user is a no-op, not an error.
    async fn remove_user(&self, room_id: Uuid, user_id: Uuid) -> Result<(), StoreError>;

    /// Returns the users currently present in the room.
    async fn get_present_users(&self, room_id: Uuid) -> Result<Vec<Uuid>, StoreError>;
}
