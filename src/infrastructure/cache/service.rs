//! Cache service trait and error types.

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur during cache operations.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Cache connection error: {0}")]
    ConnectionError(String),
    #[error("Cache operation error: {0}")]
    OperationError(String),
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Read-through cache of `short_code -> long_url` for redirects.
///
/// The store stays the source of truth. Implementations are fail-open: a
/// backend failure degrades to a miss and never fails a resolution.
///
/// # Implementations
///
/// - [`crate::infrastructure::cache::RedisCache`] - Redis-backed cache with TTL
/// - [`crate::infrastructure::cache::NullCache`] - No-op implementation for disabled caching
#[async_trait]
pub trait CacheService: Send + Sync {
    /// Returns the cached long URL for a short code.
    ///
    /// `Ok(None)` on a miss.
    async fn get_url(&self, short_code: &str) -> CacheResult<Option<String>>;

    /// Caches a mapping with the implementation's default TTL.
    async fn set_url(&self, short_code: &str, long_url: &str) -> CacheResult<()>;

    /// Drops a cached mapping. Must be called when a mapping is deleted.
    async fn invalidate(&self, short_code: &str) -> CacheResult<()>;

    /// Checks if the cache backend is reachable.
    async fn health_check(&self) -> bool;
}
