use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::MultiplexedConnection;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors surfaced by key-value store operations
///
/// `KeyNotFound` is kept apart from the communication failures so callers
/// can tell an absent key from an unreachable store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to connect to store: {0}")]
    Connect(#[source] BoxError),
    #[error("could not set key: {0}")]
    Set(#[source] BoxError),
    #[error("key does not exist")]
    KeyNotFound,
    #[error("could not get key: {0}")]
    Get(#[source] BoxError),
    #[error("store did not answer ping: {0}")]
    Ping(#[source] BoxError),
}

/// Operations the HTTP layer needs from the backing store
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Store `value` under `key` with no expiry.
    async fn put(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Fetch the value stored under `key`.
    async fn get(&self, key: &str) -> Result<String, StoreError>;

    /// Lightweight liveness check against the store.
    async fn ping(&self) -> Result<(), StoreError>;
}

/// Gateway owning the process-wide Redis connection
///
/// The multiplexed connection is opened once in [`RedisGateway::connect`]
/// and cloned per operation; all clones share one socket, so handlers can
/// use the gateway concurrently without a mutex. It is never re-opened.
#[derive(Clone)]
pub struct RedisGateway {
    connection: MultiplexedConnection,
}

impl RedisGateway {
    /// Open the connection and verify it with a PING
    ///
    /// # Errors
    /// Returns `StoreError::Connect` if the URL is rejected, the socket
    /// cannot be opened, or the store does not answer the PING.
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let client = redis::Client::open(url).map_err(|e| StoreError::Connect(Box::new(e)))?;

        let mut connection = client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| StoreError::Connect(Box::new(e)))?;

        let _pong: String = redis::cmd("PING")
            .query_async(&mut connection)
            .await
            .map_err(|e| StoreError::Connect(Box::new(e)))?;

        tracing::info!("Connected to store at {}", url);
        Ok(Self { connection })
    }
}

#[async_trait]
impl KeyValueStore for RedisGateway {
    async fn put(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut conn = self.connection.clone();

        let _: () = conn
            .set(key, value)
            .await
            .map_err(|e| StoreError::Set(Box::new(e)))?;

        tracing::debug!("SET {}", key);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<String, StoreError> {
        let mut conn = self.connection.clone();

        let value: Option<String> = conn
            .get(key)
            .await
            .map_err(|e| StoreError::Get(Box::new(e)))?;

        match value {
            Some(value) => {
                tracing::debug!("GET {} hit", key);
                Ok(value)
            }
            None => {
                tracing::debug!("GET {} miss", key);
                Err(StoreError::KeyNotFound)
            }
        }
    }

    async fn ping(&self) -> Result<(), StoreError> {
        let mut conn = self.connection.clone();

        let _pong: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(|e| StoreError::Ping(Box::new(e)))?;

        Ok(())
    }
}
