use std::panic;
use std::sync::Arc;

use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use draftroom::config::Config;
use draftroom::db;
use draftroom::registry::{
    InMemoryLockRegistry, InMemoryPresenceRegistry, LockRegistry, PresenceRegistry,
    RedisLockRegistry, RedisPresenceRegistry,
};
use draftroom::repo::{
    DraftRepository, InMemoryDraftRepository, InMemoryRoomRepository, RoomRepository,
};
use draftroom::store::Store;
use draftroom::AppState;

#[tokio::main]
async fn main() {
    // Set panic hook for better error messages
    panic::set_hook(Box::new(|info| {
        eprintln!("PANIC: {info}");
    }));

    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            // Default to info level, but allow debug for our app
            "draftroom=debug,tower_http=debug,axum::rejection=trace,info".into()
        }))
        .init();

    info!("Starting server...");

    // Load configuration
    let config = Config::load().unwrap_or_else(|e| {
        error!("Failed to load configuration: {}", e);
        warn!("Using default configuration");
        Config::default()
    });

    // Coordination store: Redis when configured, otherwise in-process.
    let (locks, presence): (Arc<dyn LockRegistry>, Arc<dyn PresenceRegistry>) =
        match &config.redis_url {
            Some(url) => match Store::connect(url) {
                Ok(store) => {
                    info!("Connected coordination store at {}", url);
                    (
                        Arc::new(RedisLockRegistry::new(store.clone())),
                        Arc::new(RedisPresenceRegistry::new(store)),
                    )
                }
                Err(e) => {
                    error!("Failed to connect coordination store: {}", e);
                    warn!("Falling back to in-process locks and presence");
                    (
                        Arc::new(InMemoryLockRegistry::new()),
                        Arc::new(InMemoryPresenceRegistry::new()),
                    )
                }
            },
            None => {
                warn!("No Redis URL configured - locks and presence are process-local");
                (
                    Arc::new(InMemoryLockRegistry::new()),
                    Arc::new(InMemoryPresenceRegistry::new()),
                )
            }
        };

    // Persistence: Postgres when configured, otherwise in-memory.
    let (rooms, drafts): (Arc<dyn RoomRepository>, Arc<dyn DraftRepository>) = match &config.db_url
    {
        Some(url) => match db::connect_pool(url).await {
            Ok(pool) => {
                info!("Database initialized successfully");
                (
                    Arc::new(db::PgRoomRepository::new(pool.clone())),
                    Arc::new(db::PgDraftRepository::new(pool)),
                )
            }
            Err(e) => {
                error!("Failed to initialize database: {}", e);
                warn!("Falling back to in-memory repositories");
                (
                    Arc::new(InMemoryRoomRepository::new()),
                    Arc::new(InMemoryDraftRepository::new()),
                )
            }
        },
        None => {
            warn!("No database URL configured - rooms and drafts are stored in memory");
            (
                Arc::new(InMemoryRoomRepository::new()),
                Arc::new(InMemoryDraftRepository::new()),
            )
        }
    };

    let address = config.server_address();
    let state = Arc::new(AppState::new(config, locks, presence, rooms, drafts));
    let app = draftroom::app(state);

    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .unwrap_or_else(|_| panic!("Failed to bind to {}", address));

    info!("🚀 Server running on http://{}", address);
    info!("📡 Realtime endpoint at ws://{}/ws/rooms/:room_id", address);
    info!("📚 Swagger UI available at http://{}/swagger", address);

    axum::serve(listener, app)
        .await
        .expect("Server failed to start");
}
