use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::types::Json;
use sqlx::Row;
use tracing::info;
use uuid::Uuid;

use crate::models::{Draft, Room};
use crate::repo::{DraftRepository, RepoError, RoomRepository};

/// Create the shared connection pool
pub async fn connect_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    info!("Connecting to database...");

    let pool = PgPoolOptions::new()
        .max_connections(20)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(30))
        .idle_timeout(Duration::from_secs(600))
        .max_lifetime(Duration::from_secs(1800))
        .connect(database_url)
        .await?;

    info!("Database connection pool created successfully");
    Ok(pool)
}

fn map_sqlx_error(e: sqlx::Error) -> RepoError {
    match &e {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            RepoError::Conflict(db_err.message().to_string())
        }
        _ => RepoError::Storage(e.to_string()),
    }
}

#[derive(sqlx::FromRow)]
struct RoomRow {
    id: Uuid,
    name: String,
    created_at: DateTime<Utc>,
    current_draft_id: Option<Uuid>,
}

impl From<RoomRow> for Room {
    fn from(row: RoomRow) -> Self {
        Room {
            id: row.id,
            name: row.name,
            created_at: row.created_at,
            current_draft_id: row.current_draft_id,
        }
    }
}

#[derive(sqlx::FromRow)]
struct DraftRow {
    id: Uuid,
    room_id: Uuid,
    version_number: i32,
    prompt_text: String,
    model_configuration: Json<serde_json::Value>,
    tools: Json<Vec<String>>,
    scratchpad: Option<String>,
    author_id: Uuid,
    integrity_hash: String,
    created_at: DateTime<Utc>,
}

impl From<DraftRow> for Draft {
    fn from(row: DraftRow) -> Self {
        Draft {
            id: row.id,
            room_id: row.room_id,
            version_number: row.version_number,
            prompt_text: row.prompt_text,
            model_configuration: row.model_configuration.0,
            tools: row.tools.0,
            scratchpad: row.scratchpad,
            author_id: row.author_id,
            integrity_hash: row.integrity_hash,
            created_at: row.created_at,
        }
    }
}

/// Postgres implementation of RoomRepository
pub struct PgRoomRepository {
    pool: PgPool,
}

impl PgRoomRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RoomRepository for PgRoomRepository {
    async fn add(&self, room: Room) -> Result<Room, RepoError> {
        sqlx::query(
            "INSERT INTO rooms (id, name, created_at, current_draft_id) VALUES ($1, $2, $3, $4)",
        )
        .bind(room.id)
        .bind(&room.name)
        .bind(room.created_at)
        .bind(room.current_draft_id)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;
        Ok(room)
    }

    async fn update(&self, room: Room) -> Result<Room, RepoError> {
        let result = sqlx::query(
            "UPDATE rooms SET name = $2, current_draft_id = $3 WHERE id = $1",
        )
        .bind(room.id)
        .bind(&room.name)
        .bind(room.current_draft_id)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(RepoError::Conflict(format!("room {} not found", room.id)));
        }
        Ok(room)
    }

    async fn get(&self, room_id: Uuid) -> Result<Option<Room>, RepoError> {
        let row = sqlx::query_as::<_, RoomRow>(
            "SELECT id, name, created_at, current_draft_id FROM rooms WHERE id = $1",
        )
        .bind(room_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;
        Ok(row.map(Room::from))
    }

    async fn list_all(&self) -> Result<Vec<Room>, RepoError> {
        let rows = sqlx::query_as::<_, RoomRow>(
            "SELECT id, name, created_at, current_draft_id FROM rooms ORDER BY created_at",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;
        Ok(rows.into_iter().map(Room::from).collect())
    }
}

/// Postgres implementation of DraftRepository
pub struct PgDraftRepository {
    pool: PgPool,
}

impl PgDraftRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DraftRepository for PgDraftRepository {
    async fn add(&self, draft: Draft) -> Result<Draft, RepoError> {
        sqlx::query(
            "INSERT INTO drafts (id, room_id, version_number, prompt_text, model_configuration, \
             tools, scratchpad, author_id, integrity_hash, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
        )
        .bind(draft.id)
        .bind(draft.room_id)
        .bind(draft.version_number)
        .bind(&draft.prompt_text)
        .bind(Json(&draft.model_configuration))
        .bind(Json(&draft.tools))
        .bind(&draft.scratchpad)
        .bind(draft.author_id)
        .bind(&draft.integrity_hash)
        .bind(draft.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;
        Ok(draft)
    }

    async fn get(&self, draft_id: Uuid) -> Result<Option<Draft>, RepoError> {
        let row = sqlx::query_as::<_, DraftRow>(
            "SELECT id, room_id, version_number, prompt_text, model_configuration, tools, \
             scratchpad, author_id, integrity_hash, created_at FROM drafts WHERE id = $1",
        )
        .bind(draft_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;
        Ok(row.map(Draft::from))
    }

    async fn list_by_room(&self, room_id: Uuid) -> Result<Vec<Draft>, RepoError> {
        let rows = sqlx::query_as::<_, DraftRow>(
            "SELECT id, room_id, version_number, prompt_text, model_configuration, tools, \
             scratchpad, author_id, integrity_hash, created_at FROM drafts \
             WHERE room_id = $1 ORDER BY version_number",
        )
        .bind(room_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;
        Ok(rows.into_iter().map(Draft::from).collect())
    }

    async fn latest_version(&self, room_id: Uuid) -> Result<Option<i32>, RepoError> {
        let row = sqlx::query("SELECT MAX(version_number) AS latest FROM drafts WHERE room_id = $1")
            .bind(room_id)
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        let latest: Option<i32> = row.try_get("latest").map_err(map_sqlx_error)?;
        Ok(latest)
    }
}
