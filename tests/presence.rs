//! Integration tests for the room presence registry.

use draftroom::registry::{InMemoryPresenceRegistry, PresenceRegistry};
use uuid::Uuid;

#[tokio::test]
async fn add_user_is_idempotent() {
    let registry = InMemoryPresenceRegistry::new();
    let room_id = Uuid::new_v4();
    let user_id = Uuid::new_v4();

    registry.add_user(room_id, user_id).await.unwrap();
    registry.add_user(room_id, user_id).await.unwrap();

    let users = registry.get_present_users(room_id).await.unwrap();
    assert_eq!(users, vec![user_id]);
}

#[tokio::test]
async fn removing_an_absent_user_is_a_noop() {
    let registry = InMemoryPresenceRegistry::new();
    let room_id = Uuid::new_v4();

    registry.remove_user(room_id, Uuid::new_v4()).await.unwrap();
    assert!(registry.get_present_users(room_id).await.unwrap().is_empty());
}

#[tokio::test]
async fn remove_only_affects_the_given_user() {
    let registry = InMemoryPresenceRegistry::new();
    let room_id = Uuid::new_v4();
    let staying = Uuid::new_v4();
    let leaving = Uuid::new_v4();

    registry.add_user(room_id, staying).await.unwrap();
    registry.add_user(room_id, leaving).await.unwrap();
    registry.remove_user(room_id, leaving).await.unwrap();

    let users = registry.get_present_users(room_id).await.unwrap();
    assert_eq!(users, vec![staying]);
}

#[tokio::test]
async fn rooms_are_isolated() {
    let registry = InMemoryPresenceRegistry::new();
    let room_a = Uuid::new_v4();
    let room_b = Uuid::new_v4();
    let user_id = Uuid::new_v4();

    registry.add_user(room_a, user_id).await.unwrap();

    assert_eq!(registry.get_present_users(room_a).await.unwrap(), vec![user_id]);
    assert!(registry.get_present_users(room_b).await.unwrap().is_empty());
}
