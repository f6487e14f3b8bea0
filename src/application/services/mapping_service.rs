//! Short link creation: dedup, code allocation and collision retry.

use std::sync::Arc;

use serde_json::json;
use tracing::{debug, error, info};

use crate::domain::entities::{NewUrlMapping, UrlMapping};
use crate::domain::repositories::MappingRepository;
use crate::error::AppError;
use crate::utils::code_generator::{DEFAULT_CODE_LENGTH, generate_code};
use crate::utils::url_normalizer::normalize_url;

/// Default bound on insert attempts per request.
pub const DEFAULT_MAX_COLLISION_RETRIES: u32 = 5;

/// Default public prefix for short URLs.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Tunables for [`MappingService`].
#[derive(Debug, Clone)]
pub struct MappingSettings {
    pub code_length: usize,
    pub max_collision_retries: u32,
    pub base_url: String,
}

impl Default for MappingSettings {
    fn default() -> Self {
        Self {
            code_length: DEFAULT_CODE_LENGTH,
            max_collision_retries: DEFAULT_MAX_COLLISION_RETRIES,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

/// Result of [`MappingService::create_or_get`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateOutcome {
    pub mapping: UrlMapping,
    /// `false` when an existing mapping for the same long URL was returned.
    pub created: bool,
}

/// Creates short links and lists existing ones.
///
/// # Concurrency
///
/// The dedup lookup and the insert are separate store calls. Two requests
/// racing on the same new long URL can both miss the lookup and both insert,
/// producing two codes for one URL. Short code uniqueness is unaffected: it is
/// enforced by the store.
pub struct MappingService<R: MappingRepository + ?Sized> {
    repository: Arc<R>,
    settings: MappingSettings,
}

impl<R: MappingRepository + ?Sized> MappingService<R> {
    /// Creates a new mapping service.
    pub fn new(repository: Arc<R>, settings: MappingSettings) -> Self {
        Self {
            repository,
            settings,
        }
    }

    /// Returns the short code for `long_url`, creating a mapping if needed.
    ///
    /// # Algorithm
    ///
    /// 1. Trim and check the `http://` / `https://` prefix
    /// 2. Return the existing mapping for this exact URL, if any
    /// 3. Otherwise generate a code and insert it, retrying with a fresh code
    ///    on collision, up to `max_collision_retries` attempts
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the URL has no supported scheme; the
    /// store is not touched in that case.
    ///
    /// Returns [`AppError::CodeAllocation`] if every attempt collided.
    ///
    /// Returns [`AppError::Internal`] on storage errors, which are never retried.
    pub async fn create_or_get(&self, long_url: &str) -> Result<CreateOutcome, AppError> {
        let long_url = normalize_url(long_url).map_err(|e| {
            AppError::bad_request(e.to_string(), json!({ "url": long_url.trim() }))
        })?;

        if let Some(existing) = self.repository.find_by_long_url(&long_url).await? {
            debug!(short_code = %existing.short_code, "returning existing mapping");
            return Ok(CreateOutcome {
                mapping: existing,
                created: false,
            });
        }

        let mapping = self.allocate(long_url).await?;

        metrics::counter!("mappings_created_total").increment(1);
        info!(short_code = %mapping.short_code, "created mapping");

        Ok(CreateOutcome {
            mapping,
            created: true,
        })
    }

    /// Inserts `long_url` under a freshly generated code, retrying on collision.
    async fn allocate(&self, long_url: String) -> Result<UrlMapping, AppError> {
        let attempts = self.settings.max_collision_retries;

        for attempt in 1..=attempts {
            let code = generate_code(self.settings.code_length);
            let new_mapping = NewUrlMapping::new(code, long_url.clone());

            if let Some(mapping) = self.repository.insert_if_absent(new_mapping).await? {
                return Ok(mapping);
            }

            metrics::counter!("code_collisions_total").increment(1);
            debug!(attempt, "short code collision, retrying");
        }

        metrics::counter!("code_allocation_failures_total").increment(1);
        error!(
            attempts,
            code_length = self.settings.code_length,
            "exhausted short code collision retries"
        );

        Err(AppError::code_allocation(
            "Failed to generate unique short code after multiple attempts",
            json!({ "attempts": attempts }),
        ))
    }

    /// Every stored mapping, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn list_all(&self) -> Result<Vec<UrlMapping>, AppError> {
        self.repository.list_all().await
    }

    /// Builds the public short URL for a code: `{base_url}/{code}`.
    pub fn short_url(&self, short_code: &str) -> String {
        format!(
            "{}/{}",
            self.settings.base_url.trim_end_matches('/'),
            short_code
        )
    }

    pub fn settings(&self) -> &MappingSettings {
        &self.settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockMappingRepository;
    use crate::utils::code_generator::is_valid_code;
    use chrono::Utc;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn stored(new_mapping: NewUrlMapping) -> UrlMapping {
        UrlMapping::new(
            1,
            new_mapping.long_url,
            new_mapping.short_code,
            Utc::now(),
            0,
        )
    }

    fn service(repo: MockMappingRepository) -> MappingService<MockMappingRepository> {
        MappingService::new(Arc::new(repo), MappingSettings::default())
    }

    #[tokio::test]
    async fn test_create_new_mapping() {
        let mut repo = MockMappingRepository::new();
        repo.expect_find_by_long_url()
            .withf(|url| url == "https://example.com/a")
            .times(1)
            .returning(|_| Ok(None));
        repo.expect_insert_if_absent()
            .withf(|m| m.long_url == "https://example.com/a" && m.short_code.len() == 7)
            .times(1)
            .returning(|m| Ok(Some(stored(m))));

        let outcome = service(repo)
            .create_or_get("https://example.com/a")
            .await
            .unwrap();

        assert!(outcome.created);
        assert_eq!(outcome.mapping.long_url, "https://example.com/a");
        assert_eq!(outcome.mapping.short_code.len(), 7);
        assert!(is_valid_code(&outcome.mapping.short_code));
    }

    #[tokio::test]
    async fn test_existing_url_is_deduplicated() {
        let mut repo = MockMappingRepository::new();
        repo.expect_find_by_long_url().times(1).returning(|url| {
            Ok(Some(UrlMapping::new(
                5,
                url.to_string(),
                "exist01".to_string(),
                Utc::now(),
                9,
            )))
        });
        repo.expect_insert_if_absent().times(0);

        let outcome = service(repo)
            .create_or_get("https://example.com/a")
            .await
            .unwrap();

        assert!(!outcome.created);
        assert_eq!(outcome.mapping.short_code, "exist01");
    }

    #[tokio::test]
    async fn test_url_is_trimmed_before_lookup() {
        let mut repo = MockMappingRepository::new();
        repo.expect_find_by_long_url()
            .withf(|url| url == "https://example.com/a")
            .times(1)
            .returning(|_| Ok(None));
        repo.expect_insert_if_absent()
            .withf(|m| m.long_url == "https://example.com/a")
            .times(1)
            .returning(|m| Ok(Some(stored(m))));

        let outcome = service(repo)
            .create_or_get("  https://example.com/a\t")
            .await
            .unwrap();

        assert_eq!(outcome.mapping.long_url, "https://example.com/a");
    }

    #[tokio::test]
    async fn test_invalid_scheme_never_touches_store() {
        let mut repo = MockMappingRepository::new();
        repo.expect_find_by_long_url().times(0);
        repo.expect_insert_if_absent().times(0);

        let result = service(repo).create_or_get("ftp://bad").await;

        assert!(matches!(result, Err(AppError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_collision_retries_with_fresh_code() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let calls = Arc::new(AtomicU32::new(0));

        let mut repo = MockMappingRepository::new();
        repo.expect_find_by_long_url().returning(|_| Ok(None));

        let seen_clone = seen.clone();
        let calls_clone = calls.clone();
        repo.expect_insert_if_absent()
            .times(3)
            .returning(move |m| {
                seen_clone.lock().unwrap().push(m.short_code.clone());
                if calls_clone.fetch_add(1, Ordering::SeqCst) < 2 {
                    Ok(None)
                } else {
                    Ok(Some(stored(m)))
                }
            });

        let outcome = service(repo)
            .create_or_get("https://example.com/retry")
            .await
            .unwrap();

        assert!(outcome.created);
        let codes = seen.lock().unwrap();
        assert_eq!(codes.len(), 3);
        assert_eq!(&outcome.mapping.short_code, codes.last().unwrap());
        assert_ne!(codes[0], codes[1]);
    }

    #[tokio::test]
    async fn test_last_attempt_may_succeed() {
        let calls = Arc::new(AtomicU32::new(0));

        let mut repo = MockMappingRepository::new();
        repo.expect_find_by_long_url().returning(|_| Ok(None));

        let calls_clone = calls.clone();
        repo.expect_insert_if_absent()
            .times(5)
            .returning(move |m| {
                if calls_clone.fetch_add(1, Ordering::SeqCst) < 4 {
                    Ok(None)
                } else {
                    Ok(Some(stored(m)))
                }
            });

        let outcome = service(repo)
            .create_or_get("https://example.com/edge")
            .await
            .unwrap();

        assert!(outcome.created);
    }

    #[tokio::test]
    async fn test_exhausted_retries_surface_code_allocation_error() {
        let mut repo = MockMappingRepository::new();
        repo.expect_find_by_long_url().returning(|_| Ok(None));
        repo.expect_insert_if_absent()
            .times(DEFAULT_MAX_COLLISION_RETRIES as usize)
            .returning(|_| Ok(None));

        let result = service(repo)
            .create_or_get("https://example.com/full")
            .await;

        assert!(matches!(result, Err(AppError::CodeAllocation { .. })));
    }

    #[tokio::test]
    async fn test_retry_bound_follows_settings() {
        let mut repo = MockMappingRepository::new();
        repo.expect_find_by_long_url().returning(|_| Ok(None));
        repo.expect_insert_if_absent()
            .times(2)
            .returning(|_| Ok(None));

        let settings = MappingSettings {
            max_collision_retries: 2,
            ..MappingSettings::default()
        };
        let service = MappingService::new(Arc::new(repo), settings);

        let result = service.create_or_get("https://example.com").await;
        assert!(matches!(result, Err(AppError::CodeAllocation { .. })));
    }

    #[tokio::test]
    async fn test_storage_error_is_not_retried() {
        let mut repo = MockMappingRepository::new();
        repo.expect_find_by_long_url().returning(|_| Ok(None));
        repo.expect_insert_if_absent()
            .times(1)
            .returning(|_| Err(AppError::internal("Database error", json!({}))));

        let result = service(repo)
            .create_or_get("https://example.com/down")
            .await;

        assert!(matches!(result, Err(AppError::Internal { .. })));
    }

    #[tokio::test]
    async fn test_lookup_error_propagates() {
        let mut repo = MockMappingRepository::new();
        repo.expect_find_by_long_url()
            .times(1)
            .returning(|_| Err(AppError::internal("Database error", json!({}))));
        repo.expect_insert_if_absent().times(0);

        let result = service(repo).create_or_get("https://example.com").await;
        assert!(matches!(result, Err(AppError::Internal { .. })));
    }

    #[tokio::test]
    async fn test_custom_code_length() {
        let mut repo = MockMappingRepository::new();
        repo.expect_find_by_long_url().returning(|_| Ok(None));
        repo.expect_insert_if_absent()
            .withf(|m| m.short_code.len() == 10)
            .times(1)
            .returning(|m| Ok(Some(stored(m))));

        let settings = MappingSettings {
            code_length: 10,
            ..MappingSettings::default()
        };
        let service = MappingService::new(Arc::new(repo), settings);

        let outcome = service.create_or_get("https://example.com").await.unwrap();
        assert_eq!(outcome.mapping.short_code.len(), 10);
    }

    #[test]
    fn test_short_url() {
        let settings = MappingSettings {
            base_url: "https://sho.rt/".to_string(),
            ..MappingSettings::default()
        };
        let service = MappingService::new(Arc::new(MockMappingRepository::new()), settings);

        assert_eq!(service.short_url("Ab3dE9z"), "https://sho.rt/Ab3dE9z");
    }

    #[test]
    fn test_short_url_default_base() {
        let service = service(MockMappingRepository::new());
        assert_eq!(service.short_url("abc"), "http://localhost:8000/abc");
    }
}
