//! Short code resolution, statistics and deletion.

use std::sync::Arc;

use serde_json::json;
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, error, warn};

use crate::domain::click_event::ClickEvent;
use crate::domain::entities::UrlMapping;
use crate::domain::repositories::MappingRepository;
use crate::error::AppError;
use crate::infrastructure::cache::CacheService;

/// Resolves short codes and keeps the click counter.
///
/// Resolution and accounting are coupled in order (a click is queued only
/// after a successful lookup) but not in failure: losing a click never fails
/// the redirect.
pub struct ResolutionService<R: MappingRepository + ?Sized> {
    repository: Arc<R>,
    cache: Arc<dyn CacheService>,
    click_sender: mpsc::Sender<ClickEvent>,
}

impl<R: MappingRepository + ?Sized> ResolutionService<R> {
    /// Creates a new resolution service.
    pub fn new(
        repository: Arc<R>,
        cache: Arc<dyn CacheService>,
        click_sender: mpsc::Sender<ClickEvent>,
    ) -> Self {
        Self {
            repository,
            cache,
            click_sender,
        }
    }

    /// Returns the long URL for `short_code` and queues a click.
    ///
    /// # Cache Strategy
    ///
    /// - **Hit**: the store is not consulted
    /// - **Miss**: read the store, then populate the cache before returning
    /// - **Cache error**: logged, treated as a miss
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] for unknown codes.
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn resolve(&self, short_code: &str) -> Result<String, AppError> {
        let long_url = match self.cache.get_url(short_code).await {
            Ok(Some(cached)) => cached,
            Ok(None) => self.resolve_from_store(short_code).await?,
            Err(e) => {
                warn!(short_code, error = %e, "cache lookup failed");
                self.resolve_from_store(short_code).await?
            }
        };

        self.record_click(short_code);

        Ok(long_url)
    }

    async fn resolve_from_store(&self, short_code: &str) -> Result<String, AppError> {
        let mapping = self.find(short_code).await?;

        if let Err(e) = self
            .cache
            .set_url(&mapping.short_code, &mapping.long_url)
            .await
        {
            warn!(short_code, error = %e, "failed to cache mapping");
        }

        Ok(mapping.long_url)
    }

    /// Queues one click. Drops it if the queue is full or closed.
    fn record_click(&self, short_code: &str) {
        match self.click_sender.try_send(ClickEvent::new(short_code)) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => {
                metrics::counter!("clicks_dropped_total").increment(1);
                warn!(short_code = %event.short_code, "click queue full, dropping click");
            }
            Err(TrySendError::Closed(event)) => {
                metrics::counter!("clicks_dropped_total").increment(1);
                warn!(short_code = %event.short_code, "click queue closed, dropping click");
            }
        }
    }

    /// Returns the full mapping, including its click count.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] for unknown codes.
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn stats(&self, short_code: &str) -> Result<UrlMapping, AppError> {
        self.find(short_code).await
    }

    /// Hard-deletes a mapping and evicts it from the cache.
    ///
    /// The cache entry is dropped both before and after the row, so a
    /// resolution racing with the delete cannot leave it cached.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] for unknown codes.
    /// Returns [`AppError::Internal`] on storage errors, or if the cache entry
    /// could not be dropped. A failure before the store delete leaves the
    /// mapping in place.
    pub async fn delete(&self, short_code: &str) -> Result<(), AppError> {
        self.invalidate(short_code).await?;

        if !self.repository.delete(short_code).await? {
            return Err(AppError::short_code_not_found(short_code));
        }

        self.invalidate(short_code).await?;

        debug!(short_code, "deleted mapping");
        Ok(())
    }

    async fn invalidate(&self, short_code: &str) -> Result<(), AppError> {
        self.cache.invalidate(short_code).await.map_err(|e| {
            error!(short_code, error = %e, "failed to invalidate cached mapping");
            AppError::internal(
                "Failed to invalidate cached short URL",
                json!({ "short_code": short_code }),
            )
        })
    }

    async fn find(&self, short_code: &str) -> Result<UrlMapping, AppError> {
        self.repository
            .find_by_code(short_code)
            .await?
            .ok_or_else(|| AppError::short_code_not_found(short_code))
    }
}
