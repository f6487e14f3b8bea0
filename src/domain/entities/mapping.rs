//! URL mapping entity.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A persisted association between a short code and a long URL.
///
/// `short_code` and `created_at` never change after insertion. `click_count`
/// only grows, and only through successful resolutions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct UrlMapping {
    pub id: i64,
    pub long_url: String,
    pub short_code: String,
    pub created_at: DateTime<Utc>,
    pub click_count: i64,
}

impl UrlMapping {
    /// Creates a new UrlMapping instance.
    pub fn new(
        id: i64,
        long_url: String,
        short_code: String,
        created_at: DateTime<Utc>,
        click_count: i64,
    ) -> Self {
        Self {
            id,
            long_url,
            short_code,
            created_at,
            click_count,
        }
    }
}

/// Input data for inserting a new mapping.
///
/// `id`, `created_at` and `click_count` are assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUrlMapping {
    pub short_code: String,
    pub long_url: String,
}

impl NewUrlMapping {
    pub fn new(short_code: impl Into<String>, long_url: impl Into<String>) -> Self {
        Self {
            short_code: short_code.into(),
            long_url: long_url.into(),
        }
    }
}
