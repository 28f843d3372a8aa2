use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::models::RoomEvent;
use crate::registry::{LockRegistry, PresenceRegistry};
use crate::store::StoreError;

/// Failure to deliver an event on one socket. Isolated per socket; the
/// broken socket's own session is responsible for deregistering it.
#[derive(Debug, Error)]
#[error("socket send failed: {0}")]
pub struct SocketSendError(pub String);

/// A live connection registered in a room.
///
/// The trait is the seam between the fan-out logic and the transport, so
/// tests can register recording or deliberately failing sockets.
#[async_trait]
pub trait RoomSocket: Send + Sync {
    fn id(&self) -> Uuid;
    async fn send(&self, event: &RoomEvent) -> Result<(), SocketSendError>;
}

struct ConnEntry {
    user_id: Uuid,
    socket: Arc<dyn RoomSocket>,
}

/// Manages active socket connections grouped by room.
///
/// Holds the process-local room -> sockets registry, performs fan-out
/// broadcast, and orchestrates the presence and lock side effects of
/// joining and leaving a room. Lock and presence state themselves live in
/// the shared coordination store, not here.
pub struct ConnectionManager {
    rooms: RwLock<HashMap<Uuid, Vec<ConnEntry>>>,
    presence: Arc<dyn PresenceRegistry>,
    locks: Arc<dyn LockRegistry>,
}

impl ConnectionManager {
    pub fn new(presence: Arc<dyn PresenceRegistry>, locks: Arc<dyn LockRegistry>) -> Self {
        Self {
            rooms: RwLock::new(HashMap::new()),
            presence,
            locks,
        }
    }

    /// Registers the socket, marks the user present, and announces the join
    /// to the whole room (including the new socket itself).
    ///
    /// A presence failure propagates — the session drains and cleans up. A
    /// broadcast failure does not: the connection stays established.
    pub async fn connect(
        &self,
        socket: Arc<dyn RoomSocket>,
        room_id: Uuid,
        user_id: Uuid,
    ) -> Result<(), StoreError> {
        {
            let mut rooms = self.rooms.write().await;
            rooms
                .entry(room_id)
                .or_default()
                .push(ConnEntry { user_id, socket });
        }
        debug!("Socket connected to room {} for user {}", room_id, user_id);

        self.presence.add_user(room_id, user_id).await?;
        self.broadcast(room_id, &RoomEvent::UserJoined { user_id }).await;
        Ok(())
    }

    /// Removes the socket and, when it was the user's last socket in the
    /// room, clears presence, announces the leave, and releases every lock
    /// the user still holds there.
    ///
    /// Cleanup is best-effort by design: each step runs even if an earlier
    /// one failed, and no failure propagates to the caller.
    pub async fn disconnect(&self, socket_id: Uuid, room_id: Uuid, user_id: Uuid) {
        let last_socket_for_user = {
            let mut rooms = self.rooms.write().await;
            match rooms.get_mut(&room_id) {
                Some(entries) => {
                    entries.retain(|entry| entry.socket.id() != socket_id);
                    let remaining = entries
                        .iter()
                        .filter(|entry| entry.user_id == user_id)
                        .count();
                    if entries.is_empty() {
                        rooms.remove(&room_id);
                    }
                    remaining == 0
                }
                // Unknown room: treat as already removed
                None => true,
            }
        };
        debug!("Socket disconnected from room {} for user {}", room_id, user_id);

        if !last_socket_for_user {
            // The user still has another live socket in this room; presence
            // and locks stay untouched until the last one goes.
            debug!(
                "User {} still has sockets in room {}, skipping leave cleanup",
                user_id, room_id
            );
            return;
        }

        if let Err(e) = self.presence.remove_user(room_id, user_id).await {
            warn!(
                "Failed to clear presence for user {} in room {}: {}",
                user_id, room_id, e
            );
        }

        self.broadcast(room_id, &RoomEvent::UserLeft { user_id }).await;

        match self.locks.release_all_for_user(room_id, user_id).await {
            Ok(count) => {
                if count > 0 {
                    info!(
                        "Released {} locks for disconnected user {} in room {}",
                        count, user_id, room_id
                    );
                }
            }
            Err(e) => {
                warn!(
                    "Failed to release locks for user {} in room {}: {}",
                    user_id, room_id, e
                );
            }
        }
    }

    /// Sends an event to every live socket currently registered in a room.
    ///
    /// Iterates over a snapshot so sockets closing mid-broadcast cannot
    /// corrupt the walk; a send failure on one socket is logged and does
    /// not stop delivery to the rest.
    pub async fn broadcast(&self, room_id: Uuid, event: &RoomEvent) {
        let snapshot: Vec<Arc<dyn RoomSocket>> = {
            let rooms = self.rooms.read().await;
            match rooms.get(&room_id) {
                Some(entries) => entries.iter().map(|entry| entry.socket.clone()).collect(),
                None => return,
            }
        };

        for socket in snapshot {
            if let Err(e) = socket.send(event).await {
                warn!(
                    "Failed to send event to socket {} in room {}: {}",
                    socket.id(),
                    room_id,
                    e
                );
            }
        }
    }

    /// Live socket count across all rooms
    pub async fn connection_count(&self) -> usize {
        let rooms = self.rooms.read().await;
        rooms.values().map(Vec::len).sum()
    }

    /// Rooms with at least one live socket
    pub async fn room_count(&self) -> usize {
        let rooms = self.rooms.read().await;
        rooms.len()
    }
}
