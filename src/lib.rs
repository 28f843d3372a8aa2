pub mod config;
pub mod db;
pub mod docs;
pub mod handlers;
pub mod models;
pub mod realtime;
pub mod registry;
pub mod repo;
pub mod routes;
pub mod services;
pub mod store;
pub mod utils;

use std::sync::Arc;

use axum::{http::HeaderValue, routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use config::Config;
use docs::ApiDoc;
use realtime::connection::ConnectionManager;
use realtime::session::room_ws;
use registry::{
    InMemoryLockRegistry, InMemoryPresenceRegistry, LockRegistry, PresenceRegistry,
};
use repo::{DraftRepository, InMemoryDraftRepository, InMemoryRoomRepository, RoomRepository};
use routes::api::create_api_routes;
use services::{DraftManager, RoomManager};

/// Shared application state handed to every handler and socket session.
pub struct AppState {
    pub config: Config,
    pub connections: Arc<ConnectionManager>,
    pub locks: Arc<dyn LockRegistry>,
    pub presence: Arc<dyn PresenceRegistry>,
    pub room_manager: RoomManager,
    pub draft_manager: DraftManager,
}

impl AppState {
    pub fn new(
        config: Config,
        locks: Arc<dyn LockRegistry>,
        presence: Arc<dyn PresenceRegistry>,
        rooms: Arc<dyn RoomRepository>,
        drafts: Arc<dyn DraftRepository>,
    ) -> Self {
        let connections = Arc::new(ConnectionManager::new(presence.clone(), locks.clone()));
        Self {
            config,
            connections,
            locks,
            presence,
            room_manager: RoomManager::new(rooms.clone()),
            draft_manager: DraftManager::new(rooms, drafts),
        }
    }

    /// State backed entirely by in-process registries and repositories.
    /// Suitable for single-instance deployments and tests.
    pub fn in_memory(config: Config) -> Self {
        Self::new(
            config,
            Arc::new(InMemoryLockRegistry::new()),
            Arc::new(InMemoryPresenceRegistry::new()),
            Arc::new(InMemoryRoomRepository::new()),
            Arc::new(InMemoryDraftRepository::new()),
        )
    }
}

fn cors_layer(config: &Config) -> CorsLayer {
    match &config.cors_origins {
        Some(origins) => {
            let list: Vec<HeaderValue> = origins
                .split(',')
                .filter_map(|origin| origin.trim().parse().ok())
                .collect();
            CorsLayer::new()
                .allow_origin(list)
                .allow_methods(Any)
                .allow_headers(Any)
        }
        None => CorsLayer::permissive(),
    }
}

/// Build the full application router: REST API, Swagger UI and the
/// WebSocket endpoint.
pub fn app(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.config);

    Router::new()
        // Mount API routes
        .nest("/api", create_api_routes(state.clone()))
        // Mount the realtime endpoint (authenticates via query parameter)
        .route(
            "/ws/rooms/:room_id",
            get(room_ws).with_state(state),
        )
        // Mount Swagger UI
        .merge(SwaggerUi::new("/swagger").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Add tracing layer
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
