//! Integration tests for the REST API, driven through a real HTTP server
//! with in-memory registries and repositories behind it.

use std::sync::Arc;

use draftroom::config::Config;
use draftroom::AppState;
use reqwest::StatusCode;
use serde_json::{json, Value};
use uuid::Uuid;

/// Binds the app to an ephemeral port and returns its base URL.
async fn spawn_app() -> String {
    let state = Arc::new(AppState::in_memory(Config::default()));
    let app = draftroom::app(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("should bind");
    let addr = listener.local_addr().expect("listener has an address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("server runs");
    });
    format!("http://{}", addr)
}

fn client() -> reqwest::Client {
    reqwest::Client::new()
}

async fn create_room(base: &str, user_id: Uuid, name: &str) -> Value {
    let response = client()
        .post(format!("{base}/api/v1/rooms"))
        .header("x-user-id", user_id.to_string())
        .json(&json!({ "name": name }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    response.json().await.unwrap()
}

async fn create_draft(base: &str, user_id: Uuid, room_id: &str, prompt: &str) -> Value {
    let response = client()
        .post(format!("{base}/api/v1/rooms/{room_id}/drafts"))
        .header("x-user-id", user_id.to_string())
        .json(&json!({
            "prompt_text": prompt,
            "model_configuration": { "temperature": 0.7 },
            "tools": ["search"],
            "scratchpad": null,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    response.json().await.unwrap()
}

#[tokio::test]
async fn health_and_ready_are_open() {
    let base = spawn_app().await;

    let response = client().get(format!("{base}/api/health")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "ok");

    let response = client().get(format!("{base}/api/ready")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn api_requires_a_caller_identity() {
    let base = spawn_app().await;

    let response = client().get(format!("{base}/api/v1/rooms")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = client()
        .get(format!("{base}/api/v1/rooms"))
        .header("x-user-id", "not-a-uuid")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn room_lifecycle() {
    let base = spawn_app().await;
    let user_id = Uuid::new_v4();

    let room = create_room(&base, user_id, "Launch prompt").await;
    assert_eq!(room["name"], "Launch prompt");
    assert!(room["current_draft_id"].is_null());
    let room_id = room["id"].as_str().unwrap();

    let fetched: Value = client()
        .get(format!("{base}/api/v1/rooms/{room_id}"))
        .header("x-user-id", user_id.to_string())
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(fetched["id"], room["id"]);

    let listed: Vec<Value> = client()
        .get(format!("{base}/api/v1/rooms"))
        .header("x-user-id", user_id.to_string())
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(listed.len(), 1);

    let response = client()
        .get(format!("{base}/api/v1/rooms/{}", Uuid::new_v4()))
        .header("x-user-id", user_id.to_string())
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn blank_room_name_is_rejected() {
    let base = spawn_app().await;

    let response = client()
        .post(format!("{base}/api/v1/rooms"))
        .header("x-user-id", Uuid::new_v4().to_string())
        .json(&json!({ "name": "   " }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn drafts_version_monotonically_and_move_the_room_head() {
    let base = spawn_app().await;
    let user_id = Uuid::new_v4();

    let room = create_room(&base, user_id, "Iterating").await;
    let room_id = room["id"].as_str().unwrap();

    let first = create_draft(&base, user_id, room_id, "Draft one").await;
    assert_eq!(first["version_number"], 1);
    assert_eq!(first["author_id"], user_id.to_string());
    assert!(!first["integrity_hash"].as_str().unwrap().is_empty());

    let second = create_draft(&base, user_id, room_id, "Draft two").await;
    assert_eq!(second["version_number"], 2);

    // The room head follows the newest draft.
    let fetched: Value = client()
        .get(format!("{base}/api/v1/rooms/{room_id}"))
        .header("x-user-id", user_id.to_string())
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(fetched["current_draft_id"], second["id"]);

    let drafts: Vec<Value> = client()
        .get(format!("{base}/api/v1/rooms/{room_id}/drafts"))
        .header("x-user-id", user_id.to_string())
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(drafts.len(), 2);
    assert_eq!(drafts[0]["version_number"], 1);
    assert_eq!(drafts[1]["version_number"], 2);
}

#[tokio::test]
async fn draft_in_unknown_room_is_rejected() {
    let base = spawn_app().await;

    let response = client()
        .post(format!("{base}/api/v1/rooms/{}/drafts", Uuid::new_v4()))
        .header("x-user-id", Uuid::new_v4().to_string())
        .json(&json!({
            "prompt_text": "orphan",
            "model_configuration": {},
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn compare_returns_a_unified_diff() {
    let base = spawn_app().await;
    let user_id = Uuid::new_v4();

    let room = create_room(&base, user_id, "Diffing").await;
    let room_id = room["id"].as_str().unwrap();

    let first = create_draft(&base, user_id, room_id, "shared line\nold line\n").await;
    let second = create_draft(&base, user_id, room_id, "shared line\nnew line\n").await;

    let response = client()
        .get(format!(
            "{base}/api/v1/drafts/compare?base_id={}&target_id={}",
            first["id"].as_str().unwrap(),
            second["id"].as_str().unwrap()
        ))
        .header("x-user-id", user_id.to_string())
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.unwrap();
    let diff = body["diff"].as_str().unwrap();
    assert!(diff.contains("--- v1"));
    assert!(diff.contains("+++ v2"));
    assert!(diff.contains("-old line"));
    assert!(diff.contains("+new line"));
}

#[tokio::test]
async fn compare_with_unknown_draft_is_a_bad_request() {
    let base = spawn_app().await;

    let response = client()
        .get(format!(
            "{base}/api/v1/drafts/compare?base_id={}&target_id={}",
            Uuid::new_v4(),
            Uuid::new_v4()
        ))
        .header("x-user-id", Uuid::new_v4().to_string())
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn lock_endpoints_enforce_exclusivity() {
    let base = spawn_app().await;
    let holder = Uuid::new_v4();
    let intruder = Uuid::new_v4();
    let room_id = Uuid::new_v4();
    let lock_url = format!("{base}/api/v1/rooms/{room_id}/fields/prompt_text/lock");

    let response = client()
        .post(&lock_url)
        .header("x-user-id", holder.to_string())
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["owner"], holder.to_string());

    // Second caller is refused while the lock is held.
    let response = client()
        .post(&lock_url)
        .header("x-user-id", intruder.to_string())
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let status: Value = client()
        .get(&lock_url)
        .header("x-user-id", intruder.to_string())
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(status["owner"], holder.to_string());

    // Only the holder can release.
    let response = client()
        .delete(&lock_url)
        .header("x-user-id", intruder.to_string())
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = client()
        .delete(&lock_url)
        .header("x-user-id", holder.to_string())
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert!(body["owner"].is_null());
}

#[tokio::test]
async fn presence_is_empty_without_connections() {
    let base = spawn_app().await;
    let room_id = Uuid::new_v4();

    let body: Value = client()
        .get(format!("{base}/api/v1/rooms/{room_id}/presence"))
        .header("x-user-id", Uuid::new_v4().to_string())
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["room_id"], room_id.to_string());
    assert_eq!(body["users"].as_array().unwrap().len(), 0);
}
