//! Business logic services for the application layer.

pub mod mapping_service;
pub mod resolution_service;

pub use mapping_service::{CreateOutcome, MappingService, MappingSettings};
pub use resolution_service::ResolutionService;
