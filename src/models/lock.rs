use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Response describing the lock state of a single document field
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LockStatusResponse {
    pub field: String,
    /// Current holder, if the field is locked
    pub owner: Option<Uuid>,
}
