use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use similar::TextDiff;
use tracing::{info, warn};
use uuid::Uuid;

use super::ServiceError;
use crate::models::{Draft, DraftCreateRequest};
use crate::repo::{DraftRepository, RoomRepository};
use crate::utils::hashing::compute_content_hash;

/// Manages immutable draft versions within a room.
pub struct DraftManager {
    rooms: Arc<dyn RoomRepository>,
    drafts: Arc<dyn DraftRepository>,
}

impl DraftManager {
    pub fn new(rooms: Arc<dyn RoomRepository>, drafts: Arc<dyn DraftRepository>) -> Self {
        Self { rooms, drafts }
    }

    /// Creates the next draft version for a room and points the room's
    /// `current_draft_id` at it.
    pub async fn create_draft(
        &self,
        room_id: Uuid,
        request: DraftCreateRequest,
        author_id: Uuid,
    ) -> Result<Draft, ServiceError> {
        let mut room = self
            .rooms
            .get(room_id)
            .await?
            .ok_or(ServiceError::RoomNotFound)?;

        let version_number = self.drafts.latest_version(room_id).await?.unwrap_or(0) + 1;

        let content = json!({
            "prompt_text": request.prompt_text,
            "model_configuration": request.model_configuration,
            "tools": request.tools,
            "scratchpad": request.scratchpad,
        });
        let draft = Draft {
            id: Uuid::new_v4(),
            room_id,
            version_number,
            prompt_text: request.prompt_text,
            model_configuration: request.model_configuration,
            tools: request.tools,
            scratchpad: request.scratchpad,
            author_id,
            integrity_hash: compute_content_hash(&content),
            created_at: Utc::now(),
        };

        let draft = self.drafts.add(draft).await?;

        room.current_draft_id = Some(draft.id);
        if let Err(e) = self.rooms.update(room).await {
            // The draft itself is committed; a stale head pointer is
            // recoverable, so log instead of failing the create.
            warn!(
                "Failed to update current draft pointer for room {}: {}",
                room_id, e
            );
        }

        info!(
            "Created draft v{} ({}) for room {}",
            draft.version_number, draft.id, room_id
        );
        Ok(draft)
    }

    pub async fn get_draft(&self, draft_id: Uuid) -> Result<Option<Draft>, ServiceError> {
        Ok(self.drafts.get(draft_id).await?)
    }

    pub async fn list_drafts(&self, room_id: Uuid) -> Result<Vec<Draft>, ServiceError> {
        Ok(self.drafts.list_by_room(room_id).await?)
    }

    /// Returns the unified diff of the two drafts' prompt text.
    pub async fn compare_versions(
        &self,
        base_id: Uuid,
        target_id: Uuid,
    ) -> Result<String, ServiceError> {
        let base = self
            .drafts
            .get(base_id)
            .await?
            .ok_or(ServiceError::DraftNotFound(base_id))?;
        let target = self
            .drafts
            .get(target_id)
            .await?
            .ok_or(ServiceError::DraftNotFound(target_id))?;

        let diff = TextDiff::from_lines(&base.prompt_text, &target.prompt_text)
            .unified_diff()
            .context_radius(3)
            .header(
                &format!("v{}", base.version_number),
                &format!("v{}", target.version_number),
            )
            .to_string();
        Ok(diff)
    }
}
