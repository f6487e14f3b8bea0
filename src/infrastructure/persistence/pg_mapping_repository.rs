//! PostgreSQL implementation of the mapping repository.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::debug;

use crate::domain::entities::{NewUrlMapping, UrlMapping};
use crate::domain::repositories::MappingRepository;
use crate::error::AppError;
use crate::utils::db_error::is_unique_violation_on_code;

/// PostgreSQL repository for URL mappings.
///
/// Every call checks a connection out of the pool for the duration of one
/// statement; the connection goes back to the pool when the query future
/// completes or is dropped.
pub struct PgMappingRepository {
    pool: Arc<PgPool>,
}

impl PgMappingRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MappingRepository for PgMappingRepository {
    async fn find_by_long_url(&self, long_url: &str) -> Result<Option<UrlMapping>, AppError> {
        let row = sqlx::query_as::<_, UrlMapping>(
            r#"
            SELECT id, long_url, short_code, created_at, click_count
            FROM short_urls
            WHERE long_url = $1
            ORDER BY id
            LIMIT 1
            "#,
        )
        .bind(long_url)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row)
    }

    async fn insert_if_absent(
        &self,
        new_mapping: NewUrlMapping,
    ) -> Result<Option<UrlMapping>, AppError> {
        let result = sqlx::query_as::<_, UrlMapping>(
            r#"
            INSERT INTO short_urls (short_code, long_url)
            VALUES ($1, $2)
            RETURNING id, long_url, short_code, created_at, click_count
            "#,
        )
        .bind(&new_mapping.short_code)
        .bind(&new_mapping.long_url)
        .fetch_one(self.pool.as_ref())
        .await;

        match result {
            Ok(mapping) => Ok(Some(mapping)),
            Err(e) if is_unique_violation_on_code(&e) => {
                debug!(short_code = %new_mapping.short_code, "short code already taken");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn find_by_code(&self, short_code: &str) -> Result<Option<UrlMapping>, AppError> {
        let row = sqlx::query_as::<_, UrlMapping>(
            r#"
            SELECT id, long_url, short_code, created_at, click_count
            FROM short_urls
            WHERE short_code = $1
            "#,
        )
        .bind(short_code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row)
    }

    async fn increment_click_count(&self, short_code: &str) -> Result<bool, AppError> {
        let result =
            sqlx::query("UPDATE short_urls SET click_count = click_count + 1 WHERE short_code = $1")
                .bind(short_code)
                .execute(self.pool.as_ref())
                .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, short_code: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM short_urls WHERE short_code = $1")
            .bind(short_code)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_all(&self) -> Result<Vec<UrlMapping>, AppError> {
        let rows = sqlx::query_as::<_, UrlMapping>(
            r#"
            SELECT id, long_url, short_code, created_at, click_count
            FROM short_urls
            ORDER BY id
            "#,
        )
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows)
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(self.pool.as_ref())
            .await?;
        Ok(())
    }
}
