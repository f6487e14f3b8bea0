//! Infrastructure layer: concrete storage and caching.
//!
//! - [`cache`] - Redirect cache (Redis and no-op implementations)
//! - [`persistence`] - Mapping repositories (PostgreSQL and in-memory)

pub mod cache;
pub mod persistence;
