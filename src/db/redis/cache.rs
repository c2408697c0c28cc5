use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use redis::Client;
use serde::{de::DeserializeOwned, Serialize};
use std::fmt::Display;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::error::AppError;
use crate::error::AppResult;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// One catalog list response, keyed by its canonical query
    CatalogPage(String),
    /// Serialized quiz session
    Session(Uuid),
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheKey::CatalogPage(query) => write!(f, "catalog:{}", query),
            CacheKey::Session(id) => write!(f, "session:{}", id),
        }
    }
}

/// Opens a Redis client; connections are made lazily per operation
pub fn create_redis_client(redis_url: &str) -> anyhow::Result<Client> {
    let client = Client::open(redis_url)?;
    Ok(client)
}

/// A serialized value waiting for the background writer
struct PendingWrite {
    key: String,
    json: String,
    ttl: u64,
}

/// Redis-backed store for sessions and catalog pages
///
/// Clones share one background writer. Sessions are written with
/// [`Cache::set`] because the next request must observe them; catalog pages
/// go through [`Cache::set_in_background`] so responses never wait on Redis.
#[derive(Clone)]
pub struct Cache {
    redis_client: Client,
    pending_tx: mpsc::UnboundedSender<PendingWrite>,
}

/// Stops the background writer once the server is done
pub struct CacheWriterHandle {
    shutdown_tx: mpsc::Sender<()>,
    task: tokio::task::JoinHandle<()>,
}

impl CacheWriterHandle {
    /// Signals the writer and waits until the writes queued so far are flushed
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
        if let Err(e) = self.task.await {
            tracing::error!(error = %e, "Cache writer task panicked");
        }
    }
}

async fn connect(client: &Client) -> AppResult<MultiplexedConnection> {
    Ok(client.get_multiplexed_async_connection().await?)
}

async fn store(client: &Client, write: PendingWrite) -> AppResult<()> {
    let mut conn = connect(client).await?;
    let _: () = conn.set_ex(write.key, write.json, write.ttl).await?;
    Ok(())
}

fn serialize<T: Serialize>(key: &CacheKey, value: &T, ttl: u64) -> AppResult<PendingWrite> {
    let json = serde_json::to_string(value)
        .map_err(|e| AppError::Internal(format!("Cache serialization error: {}", e)))?;

    Ok(PendingWrite {
        key: key.to_string(),
        json,
        ttl,
    })
}

/// Writes queued pages until shutdown, then flushes what is already queued
///
/// Live `Cache` clones keep the channel open, so the flush uses `try_recv`
/// and never waits for new messages.
async fn run_writer(
    client: Client,
    mut pending_rx: mpsc::UnboundedReceiver<PendingWrite>,
    mut shutdown_rx: mpsc::Receiver<()>,
) {
    tracing::info!("Cache writer started");

    loop {
        tokio::select! {
            Some(write) = pending_rx.recv() => {
                let key = write.key.clone();
                if let Err(e) = store(&client, write).await {
                    tracing::error!(error = %e, key = %key, "Background cache write failed");
                }
            }
            _ = shutdown_rx.recv() => {
                let mut flushed = 0usize;
                while let Ok(write) = pending_rx.try_recv() {
                    if let Err(e) = store(&client, write).await {
                        tracing::error!(error = %e, "Cache write failed during shutdown");
                    }
                    flushed += 1;
                }

                tracing::info!(flushed = flushed, "Cache writer stopped");
                break;
            }
        }
    }
}

impl Cache {
    /// Creates the cache and spawns its background writer
    pub async fn new(redis_client: Client) -> (Self, CacheWriterHandle) {
        let (pending_tx, pending_rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);

        let task = tokio::spawn(run_writer(redis_client.clone(), pending_rx, shutdown_rx));

        (
            Self {
                redis_client,
                pending_tx,
            },
            CacheWriterHandle { shutdown_tx, task },
        )
    }

    /// Reads and deserializes `key`, `None` when it is absent or expired
    pub async fn get_from_cache<T: DeserializeOwned>(&self, key: &CacheKey) -> AppResult<Option<T>> {
        let mut conn = connect(&self.redis_client).await?;
        let cached: Option<String> = conn.get(key.to_string()).await?;

        cached
            .map(|json| {
                serde_json::from_str(&json).map_err(|e| {
                    AppError::Internal(format!("Cache deserialization error for {}: {}", key, e))
                })
            })
            .transpose()
    }

    /// Stores a value and waits for Redis to acknowledge it
    pub async fn set<T: Serialize>(&self, key: &CacheKey, value: &T, ttl: u64) -> AppResult<()> {
        store(&self.redis_client, serialize(key, value, ttl)?).await
    }

    /// Removes a key; deleting a missing key is not an error
    pub async fn delete(&self, key: &CacheKey) -> AppResult<()> {
        let mut conn = connect(&self.redis_client).await?;
        let _: () = conn.del(key.to_string()).await?;
        Ok(())
    }

    /// Queues a write for the background writer and returns immediately
    ///
    /// Failures are logged, never returned.
    pub fn set_in_background<T: Serialize>(&self, key: &CacheKey, value: &T, ttl: u64) {
        let write = match serialize(key, value, ttl) {
            Ok(write) => write,
            Err(e) => {
                tracing::error!(error = %e, key = %key, "Skipping background cache write");
                return;
            }
        };

        if self.pending_tx.send(write).is_err() {
            tracing::error!(key = %key, "Cache writer is gone, dropping write");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn redis_url() -> String {
        std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string())
    }

    #[test]
    fn test_cache_key_display_catalog_page() {
        let key = CacheKey::CatalogPage("/movie/popular?language=en-US&page=1".to_string());
        assert_eq!(key.to_string(), "catalog:/movie/popular?language=en-US&page=1");
    }

    #[test]
    fn test_cache_key_display_session() {
        let id = Uuid::parse_str("67e55044-10b1-426f-9247-bb680e5fe0c8").unwrap();
        let key = CacheKey::Session(id);
        assert_eq!(key.to_string(), "session:67e55044-10b1-426f-9247-bb680e5fe0c8");
    }

    #[test]
    fn test_serialize_pending_write() {
        let key = CacheKey::CatalogPage("/search/movie?query=alien".to_string());
        let write = serialize(&key, &vec![1, 2], 60).unwrap();
        assert_eq!(write.key, "catalog:/search/movie?query=alien");
        assert_eq!(write.json, "[1,2]");
        assert_eq!(write.ttl, 60);
    }

    #[tokio::test]
    #[ignore = "requires a running Redis"]
    async fn test_set_get_delete_round_trip() {
        let client = create_redis_client(&redis_url()).unwrap();
        let (cache, _handle) = Cache::new(client).await;

        let key = CacheKey::Session(Uuid::new_v4());
        cache.set(&key, &vec![1, 2, 3], 60).await.unwrap();

        let retrieved: Option<Vec<i32>> = cache.get_from_cache(&key).await.unwrap();
        assert_eq!(retrieved, Some(vec![1, 2, 3]));

        cache.delete(&key).await.unwrap();
        let retrieved: Option<Vec<i32>> = cache.get_from_cache(&key).await.unwrap();
        assert_eq!(retrieved, None);
    }

    #[tokio::test]
    #[ignore = "requires a running Redis"]
    async fn test_background_writes_flushed_on_shutdown() {
        let client = create_redis_client(&redis_url()).unwrap();
        let (cache, handle) = Cache::new(client).await;

        let key = CacheKey::CatalogPage("test_shutdown_flush".to_string());
        let value = vec!["queued".to_string()];
        cache.set_in_background(&key, &value, 60);

        handle.shutdown().await;

        let retrieved: Option<Vec<String>> = cache.get_from_cache(&key).await.unwrap();
        assert_eq!(retrieved, Some(value));
        cache.delete(&key).await.unwrap();
    }
}
