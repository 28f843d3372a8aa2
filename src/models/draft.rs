use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// An immutable version of a room's document.
///
/// Drafts are never edited in place; each save produces a new version
/// with a monotonically increasing `version_number` per room.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Draft {
    pub id: Uuid,
    pub room_id: Uuid,
    pub version_number: i32,
    pub prompt_text: String,
    /// Configuration parameters for the model
    #[schema(value_type = Object)]
    pub model_configuration: serde_json::Value,
    /// List of tool URIs
    pub tools: Vec<String>,
    /// Engineering notes, not part of the published document
    pub scratchpad: Option<String>,
    pub author_id: Uuid,
    /// SHA-256 over the canonical JSON of the draft content
    pub integrity_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Request body for creating a draft version
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct DraftCreateRequest {
    pub prompt_text: String,
    #[schema(value_type = Object)]
    pub model_configuration: serde_json::Value,
    #[serde(default)]
    pub tools: Vec<String>,
    pub scratchpad: Option<String>,
}

/// Response for a draft comparison
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DraftDiffResponse {
    pub base_id: Uuid,
    pub target_id: Uuid,
    /// Unified diff of the two drafts' prompt text
    pub diff: String,
}

/// Query parameters for draft comparison
#[derive(Debug, Deserialize)]
pub struct DraftCompareParams {
    pub base_id: Uuid,
    pub target_id: Uuid,
}
