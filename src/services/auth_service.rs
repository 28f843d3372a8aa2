use axum::http::HeaderMap;
use thiserror::Error;
use uuid::Uuid;

pub const USER_ID_HEADER: &str = "x-user-id";

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("missing user identifier")]
    Missing,
    #[error("invalid user identifier (must be a UUID)")]
    Invalid,
}

/// Validates a raw user identifier from a connection parameter.
///
/// This is the whole authentication boundary: the caller presents an id,
/// we validate its shape. Token validation would slot in here.
pub fn authenticate_user_id(raw: Option<&str>) -> Result<Uuid, AuthError> {
    let raw = raw.ok_or(AuthError::Missing)?;
    Uuid::parse_str(raw.trim()).map_err(|_| AuthError::Invalid)
}

/// Extracts and validates the acting user from the `X-User-Id` header.
pub fn user_id_from_headers(headers: &HeaderMap) -> Result<Uuid, AuthError> {
    let raw = headers
        .get(USER_ID_HEADER)
        .and_then(|value| value.to_str().ok());
    authenticate_user_id(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_valid_uuid() {
        let id = Uuid::new_v4();
        assert_eq!(
            authenticate_user_id(Some(&id.to_string())).unwrap(),
            id
        );
    }

    #[test]
    fn rejects_missing_id() {
        assert!(matches!(authenticate_user_id(None), Err(AuthError::Missing)));
    }

    #[test]
    fn rejects_malformed_id() {
        assert!(matches!(
            authenticate_user_id(Some("not-a-uuid")),
            Err(AuthError::Invalid)
        ));
    }
}
