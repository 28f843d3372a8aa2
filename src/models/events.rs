use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Membership events fanned out to every live socket in a room.
///
/// Wire shape:
/// `{ "type": "USER_JOINED", "payload": { "user_id": "<uuid>" } }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum RoomEvent {
    #[serde(rename = "USER_JOINED")]
    UserJoined { user_id: Uuid },
    #[serde(rename = "USER_LEFT")]
    UserLeft { user_id: Uuid },
}

impl RoomEvent {
    pub fn user_id(&self) -> Uuid {
        match self {
            RoomEvent::UserJoined { user_id } | RoomEvent::UserLeft { user_id } => *user_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_to_typed_envelope() {
        let user_id = Uuid::new_v4();
        let json = serde_json::to_value(RoomEvent::UserJoined { user_id }).unwrap();
        assert_eq!(json["type"], "USER_JOINED");
        assert_eq!(json["payload"]["user_id"], user_id.to_string());
    }

    #[test]
    fn round_trips_user_left() {
        let event = RoomEvent::UserLeft {
            user_id: Uuid::new_v4(),
        };
        let text = serde_json::to_string(&event).unwrap();
        let parsed: RoomEvent = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, event);
    }
}
