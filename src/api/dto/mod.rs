//! Data Transfer Objects for API requests and responses.
//!
//! All DTOs use Serde for JSON serialization; request bodies are checked
//! with `validator`.

pub mod health;
pub mod message;
pub mod shorten;
pub mod stats;
