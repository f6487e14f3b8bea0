//! Redis-backed redirect cache.

use super::service::{CacheError, CacheResult, CacheService};
use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use tracing::{debug, info, warn};

const KEY_PREFIX: &str = "short_url:";

/// Redis cache for `short_code -> long_url` lookups.
///
/// `ConnectionManager` reconnects on its own; each call works on a cheap clone
/// of it. Read and write errors are logged and reported as misses.
pub struct RedisCache {
    manager: ConnectionManager,
    ttl_seconds: u64,
}

impl RedisCache {
    /// Connects to Redis and verifies the connection with a PING.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::ConnectionError`] if the URL is invalid, the
    /// connection cannot be established, or PING fails.
    pub async fn connect(redis_url: &str, ttl_seconds: u64) -> CacheResult<Self> {
        info!("Connecting to Redis");

        let client = Client::open(redis_url).map_err(|e| {
            CacheError::ConnectionError(format!("Failed to create Redis client: {}", e))
        })?;

        let manager = ConnectionManager::new(client).await.map_err(|e| {
            CacheError::ConnectionError(format!("Failed to connect to Redis: {}", e))
        })?;

        let mut probe = manager.clone();
        probe
            .ping::<()>()
            .await
            .map_err(|e| CacheError::ConnectionError(format!("Redis PING failed: {}", e)))?;

        info!("Connected to Redis");

        Ok(Self {
            manager,
            ttl_seconds,
        })
    }

    fn key(short_code: &str) -> String {
        format!("{}{}", KEY_PREFIX, short_code)
    }
}

#[async_trait]
impl CacheService for RedisCache {
    async fn get_url(&self, short_code: &str) -> CacheResult<Option<String>> {
        let mut conn = self.manager.clone();

        match conn.get::<_, Option<String>>(Self::key(short_code)).await {
            Ok(hit) => {
                debug!(short_code, hit = hit.is_some(), "cache lookup");
                Ok(hit)
            }
            Err(e) => {
                warn!(short_code, error = %e, "Redis GET failed");
                Ok(None)
            }
        }
    }

    async fn set_url(&self, short_code: &str, long_url: &str) -> CacheResult<()> {
        let mut conn = self.manager.clone();

        if let Err(e) = conn
            .set_ex::<_, _, ()>(Self::key(short_code), long_url, self.ttl_seconds)
            .await
        {
            warn!(short_code, error = %e, "Redis SET failed");
        }
        Ok(())
    }

    async fn invalidate(&self, short_code: &str) -> CacheResult<()> {
        let mut conn = self.manager.clone();

        conn.del::<_, i32>(Self::key(short_code))
            .await
            .map(|_| ())
            .map_err(|e| CacheError::OperationError(format!("Redis DEL failed: {}", e)))
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.manager.clone();
        conn.ping::<()>().await.is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_is_namespaced() {
        assert_eq!(RedisCache::key("Ab3dE9z"), "short_url:Ab3dE9z");
    }
}
