//! Repository trait for URL mapping storage.

use crate::domain::entities::{NewUrlMapping, UrlMapping};
use crate::error::AppError;
use async_trait::async_trait;

/// Storage contract for URL mappings.
///
/// The store, not the caller, owns short code uniqueness: implementations must
/// enforce it atomically so two concurrent inserts of the same code cannot both
/// succeed.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgMappingRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::InMemoryMappingRepository`] - process-local store
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MappingRepository: Send + Sync {
    /// Finds a mapping by exact long URL.
    ///
    /// Concurrent first-time shortening of the same URL can leave more than one
    /// row; the oldest one is returned.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn find_by_long_url(&self, long_url: &str) -> Result<Option<UrlMapping>, AppError>;

    /// Inserts a mapping unless its short code is already taken.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(UrlMapping))` with the stored row on success
    /// - `Ok(None)` if the short code already exists; nothing is written
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] for every other storage failure, including
    /// constraint violations unrelated to the short code.
    async fn insert_if_absent(
        &self,
        new_mapping: NewUrlMapping,
    ) -> Result<Option<UrlMapping>, AppError>;

    /// Finds a mapping by short code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn find_by_code(&self, short_code: &str) -> Result<Option<UrlMapping>, AppError>;

    /// Adds one to the mapping's click counter.
    ///
    /// Returns `Ok(false)` if the code no longer exists.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn increment_click_count(&self, short_code: &str) -> Result<bool, AppError>;

    /// Hard-deletes a mapping.
    ///
    /// Returns `Ok(true)` if a row was removed, `Ok(false)` if the code was unknown.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn delete(&self, short_code: &str) -> Result<bool, AppError>;

    /// Returns every mapping, ordered by id.
    ///
    /// The result is fully materialised; there is no pagination.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn list_all(&self) -> Result<Vec<UrlMapping>, AppError>;

    /// Cheap connectivity probe used by the health endpoint.
    async fn ping(&self) -> Result<(), AppError>;
}
