//! Postgres-backed room and draft repositories, selected when `DB_URL`
//! is configured. Schema lives in `migrations/`.

pub mod pg;

pub use pg::{connect_pool, PgDraftRepository, PgRoomRepository};
