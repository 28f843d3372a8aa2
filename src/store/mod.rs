use redis::aio::MultiplexedConnection;
use thiserror::Error;
use tracing::info;

/// Errors surfaced by the coordination store.
///
/// "Denied" outcomes (lock already held, release by non-owner) are not
/// errors; they are boolean results on the registry traits. Only genuine
/// store failures end up here.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("coordination store unavailable: {0}")]
    Unavailable(#[from] redis::RedisError),
}

/// Shared handle to the atomic key-value store backing locks and presence.
///
/// All cross-process coordination state lives here; correctness across
/// service instances depends on the store's conditional-write and scripted
/// transaction guarantees, not on in-process locking.
#[derive(Clone)]
pub struct Store {
    client: redis::Client,
}

impl Store {
    pub fn connect(url: &str) -> Result<Self, StoreError> {
        let client = redis::Client::open(url)?;
        info!("Coordination store client created");
        Ok(Self { client })
    }

    pub async fn conn(&self) -> Result<MultiplexedConnection, StoreError> {
        Ok(self.client.get_multiplexed_async_connection().await?)
    }
}
