//! Application layer services implementing business logic.
//!
//! Services consume the [`crate::domain::repositories::MappingRepository`]
//! trait and expose the operations HTTP handlers and the admin CLI call.
//!
//! - [`services::MappingService`] - Idempotent short link creation
//! - [`services::ResolutionService`] - Resolution, click accounting, stats and deletion

pub mod services;
