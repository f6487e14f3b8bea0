//! DTOs for the statistics endpoints.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::entities::UrlMapping;

/// Full statistics for a short code (`GET /api/stats/{code}`).
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub short_code: String,
    pub long_url: String,
    pub created_at: DateTime<Utc>,
    pub click_count: i64,
}

impl From<UrlMapping> for StatsResponse {
    fn from(mapping: UrlMapping) -> Self {
        Self {
            short_code: mapping.short_code,
            long_url: mapping.long_url,
            created_at: mapping.created_at,
            click_count: mapping.click_count,
        }
    }
}

/// Compact statistics (`GET /stats/{code}`), without the click counter.
#[derive(Debug, Serialize)]
pub struct BasicStatsResponse {
    pub url: String,
    pub short_code: String,
    pub created_at: DateTime<Utc>,
}

impl From<UrlMapping> for BasicStatsResponse {
    fn from(mapping: UrlMapping) -> Self {
        Self {
            url: mapping.long_url,
            short_code: mapping.short_code,
            created_at: mapping.created_at,
        }
    }
}
