use std::borrow::Cow;
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::{
        ws::{close_code, CloseFrame, Message, WebSocket},
        Path, Query, State, WebSocketUpgrade,
    },
    response::Response,
};
use futures_util::{
    stream::{SplitSink, StreamExt},
    SinkExt,
};
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::{debug, warn};
use uuid::Uuid;

use super::connection::{RoomSocket, SocketSendError};
use crate::models::RoomEvent;
use crate::services::auth_service;
use crate::utils::scope_guard::ScopeGuard;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct SessionParams {
    pub user_id: Option<String>,
}

/// WebSocket endpoint for real-time collaboration on a room.
///
/// The acting user is identified by the `user_id` query parameter; a
/// missing or malformed id is rejected with a policy-violation close before
/// any state is touched.
pub async fn room_ws(
    Path(room_id): Path<Uuid>,
    Query(params): Query<SessionParams>,
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> Response {
    ws.on_upgrade(move |socket| run_session(socket, room_id, params.user_id, state))
}

/// Sender half of an accepted WebSocket, registered with the
/// ConnectionManager for fan-out.
struct WsRoomSocket {
    id: Uuid,
    sender: Mutex<SplitSink<WebSocket, Message>>,
}

#[async_trait]
impl RoomSocket for WsRoomSocket {
    fn id(&self) -> Uuid {
        self.id
    }

    async fn send(&self, event: &RoomEvent) -> Result<(), SocketSendError> {
        let payload =
            serde_json::to_string(event).map_err(|e| SocketSendError(e.to_string()))?;
        self.sender
            .lock()
            .await
            .send(Message::Text(payload))
            .await
            .map_err(|e| SocketSendError(e.to_string()))
    }
}

/// Drives one connection through its lifecycle:
/// Connecting -> Authenticated -> Joined -> Draining -> Closed.
async fn run_session(
    mut socket: WebSocket,
    room_id: Uuid,
    user_id: Option<String>,
    state: Arc<AppState>,
) {
    // 1. Authenticate
    let user_id = match auth_service::authenticate_user_id(user_id.as_deref()) {
        Ok(user_id) => user_id,
        Err(e) => {
            warn!("Rejecting socket for room {}: {}", room_id, e);
            let _ = socket
                .send(Message::Close(Some(CloseFrame {
                    code: close_code::POLICY,
                    reason: Cow::Owned(e.to_string()),
                })))
                .await;
            return;
        }
    };

    let (sender, mut receiver) = socket.split();
    let socket: Arc<WsRoomSocket> = Arc::new(WsRoomSocket {
        id: Uuid::new_v4(),
        sender: Mutex::new(sender),
    });
    let socket_id = socket.id();
    let manager = state.connections.clone();

    // Disconnect must run exactly once on every exit path, including task
    // cancellation, so it hangs off a drop guard rather than error handling.
    let _cleanup = {
        let manager = manager.clone();
        ScopeGuard::new(move || {
            tokio::spawn(async move {
                manager.disconnect(socket_id, room_id, user_id).await;
            });
        })
    };

    // 2. Join the room
    match manager.connect(socket, room_id, user_id).await {
        Ok(()) => {
            // 3. Liveness loop. Inbound messages are not interpreted in the
            // current protocol; the loop only detects close and errors.
            while let Some(message) = receiver.next().await {
                match message {
                    Ok(Message::Close(_)) => break,
                    Ok(_) => {}
                    Err(e) => {
                        debug!(
                            "Socket error for user {} in room {}: {}",
                            user_id, room_id, e
                        );
                        break;
                    }
                }
            }
        }
        Err(e) => {
            warn!(
                "Failed to join user {} to room {}: {}",
                user_id, room_id, e
            );
        }
    }
    // 4. Drain: the guard schedules the disconnect
}
