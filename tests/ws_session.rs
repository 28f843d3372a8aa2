//! Integration tests for the realtime session endpoint, using real
//! WebSocket clients against a server bound to an ephemeral port.

use std::sync::Arc;
use std::time::Duration;

use draftroom::config::Config;
use draftroom::models::RoomEvent;
use draftroom::registry::{LockRegistry, PresenceRegistry};
use draftroom::AppState;
use futures_util::{SinkExt, StreamExt};
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use uuid::Uuid;

type WsClient = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

/// Binds the app to an ephemeral port. Returns the socket address and the
/// shared state so tests can inspect registries directly.
async fn spawn_app() -> (String, Arc<AppState>) {
    let state = Arc::new(AppState::in_memory(Config::default()));
    let app = draftroom::app(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("should bind");
    let addr = listener.local_addr().expect("listener has an address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("server runs");
    });
    (addr.to_string(), state)
}

async fn connect(addr: &str, room_id: Uuid, user_id: &str) -> WsClient {
    let url = format!("ws://{addr}/ws/rooms/{room_id}?user_id={user_id}");
    let (ws, _) = tokio_tungstenite::connect_async(&url)
        .await
        .expect("client should connect");
    ws
}

/// Waits for the next room event, skipping control frames.
async fn next_event(ws: &mut WsClient) -> RoomEvent {
    loop {
        let message = tokio::time::timeout(Duration::from_secs(5), ws.next())
            .await
            .expect("event before timeout")
            .expect("stream open")
            .expect("no transport error");
        if let Message::Text(text) = message {
            return serde_json::from_str(&text).expect("valid room event");
        }
    }
}

#[tokio::test]
async fn joining_announces_the_user_to_the_room() {
    let (addr, _state) = spawn_app().await;
    let room_id = Uuid::new_v4();
    let first_user = Uuid::new_v4();
    let second_user = Uuid::new_v4();

    let mut first = connect(&addr, room_id, &first_user.to_string()).await;
    assert_eq!(
        next_event(&mut first).await,
        RoomEvent::UserJoined { user_id: first_user }
    );

    let mut second = connect(&addr, room_id, &second_user.to_string()).await;
    assert_eq!(
        next_event(&mut second).await,
        RoomEvent::UserJoined { user_id: second_user }
    );
    // The earlier client sees the later join too.
    assert_eq!(
        next_event(&mut first).await,
        RoomEvent::UserJoined { user_id: second_user }
    );
}

#[tokio::test]
async fn leaving_announces_and_releases_the_users_locks() {
    let (addr, state) = spawn_app().await;
    let room_id = Uuid::new_v4();
    let staying = Uuid::new_v4();
    let leaving = Uuid::new_v4();

    let mut observer = connect(&addr, room_id, &staying.to_string()).await;
    let _ = next_event(&mut observer).await;

    let mut departing = connect(&addr, room_id, &leaving.to_string()).await;
    let _ = next_event(&mut departing).await;
    let _ = next_event(&mut observer).await;

    assert!(state
        .locks
        .acquire(room_id, "prompt_text", leaving, Duration::from_secs(60))
        .await
        .unwrap());

    departing.close(None).await.unwrap();

    assert_eq!(
        next_event(&mut observer).await,
        RoomEvent::UserLeft { user_id: leaving }
    );

    // The leave is broadcast before locks are swept, so give the cleanup
    // task a moment to finish.
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(
        state.locks.get_owner(room_id, "prompt_text").await.unwrap(),
        None
    );
    assert_eq!(
        state.presence.get_present_users(room_id).await.unwrap(),
        vec![staying]
    );
}

#[tokio::test]
async fn missing_user_id_is_rejected_with_policy_close() {
    let (addr, _state) = spawn_app().await;
    let room_id = Uuid::new_v4();

    let url = format!("ws://{addr}/ws/rooms/{room_id}");
    let (mut ws, _) = tokio_tungstenite::connect_async(&url)
        .await
        .expect("upgrade succeeds before the policy check");

    let message = tokio::time::timeout(Duration::from_secs(5), ws.next())
        .await
        .expect("close before timeout")
        .expect("stream open")
        .expect("no transport error");
    match message {
        Message::Close(Some(frame)) => assert_eq!(frame.code, CloseCode::Policy),
        other => panic!("expected close frame, got {other:?}"),
    }
}

#[tokio::test]
async fn malformed_user_id_is_rejected_with_policy_close() {
    let (addr, state) = spawn_app().await;
    let room_id = Uuid::new_v4();

    let mut ws = connect(&addr, room_id, "not-a-uuid").await;

    let message = tokio::time::timeout(Duration::from_secs(5), ws.next())
        .await
        .expect("close before timeout")
        .expect("stream open")
        .expect("no transport error");
    assert!(matches!(
        message,
        Message::Close(Some(frame)) if frame.code == CloseCode::Policy
    ));

    // Rejected before any state was touched.
    assert!(state.presence.get_present_users(room_id).await.unwrap().is_empty());
}

#[tokio::test]
async fn same_user_with_two_tabs_stays_present_until_the_last_closes() {
    let (addr, state) = spawn_app().await;
    let room_id = Uuid::new_v4();
    let user_id = Uuid::new_v4();

    let mut tab_one = connect(&addr, room_id, &user_id.to_string()).await;
    let _ = next_event(&mut tab_one).await;
    let mut tab_two = connect(&addr, room_id, &user_id.to_string()).await;
    let _ = next_event(&mut tab_two).await;

    tab_two.close(None).await.unwrap();

    // Allow the server-side cleanup task to run.
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(
        state.presence.get_present_users(room_id).await.unwrap(),
        vec![user_id]
    );

    tab_one.close(None).await.unwrap();
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(state.presence.get_present_users(room_id).await.unwrap().is_empty());
}

#[tokio::test]
async fn non_event_client_messages_are_ignored() {
    let (addr, state) = spawn_app().await;
    let room_id = Uuid::new_v4();
    let user_id = Uuid::new_v4();

    let mut ws = connect(&addr, room_id, &user_id.to_string()).await;
    let _ = next_event(&mut ws).await;

    ws.send(Message::Text("free-form chatter".to_string()))
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;

    // The connection is still up and the user still present.
    assert_eq!(
        state.presence.get_present_users(room_id).await.unwrap(),
        vec![user_id]
    );
}
