use axum::{extract::Request, http::StatusCode, middleware::Next, response::Response, Json};
use tracing::warn;

use crate::models::ErrorResponse;
use crate::services::auth_service::{self, AuthError};

/// Resolves the caller identity from the `X-User-Id` header and stores it
/// in the request extensions for downstream handlers.
pub async fn auth_middleware(
    mut req: Request,
    next: Next,
) -> Result<Response, (StatusCode, Json<ErrorResponse>)> {
    // 1. Extract and validate the caller identity
    let user_id = match auth_service::user_id_from_headers(req.headers()) {
        Ok(user_id) => user_id,
        Err(AuthError::Missing) => {
            return Err(ErrorResponse::with_status(
                StatusCode::UNAUTHORIZED,
                "Missing X-User-Id header",
            ));
        }
        Err(AuthError::Invalid) => {
            warn!("Rejected request with malformed X-User-Id header");
            return Err(ErrorResponse::with_status(
                StatusCode::BAD_REQUEST,
                "X-User-Id header is not a valid UUID",
            ));
        }
    };

    // 2. Set the identity into request extensions for downstream handlers
    req.extensions_mut().insert(user_id);

    Ok(next.run(req).await)
}
