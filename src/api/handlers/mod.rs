//! HTTP request handlers.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod health;
pub mod mappings;
pub mod redirect;
pub mod shorten;
pub mod stats;

pub use health::health_handler;
pub use mappings::{delete_handler, list_handler, root_handler};
pub use redirect::redirect_handler;
pub use shorten::shorten_handler;
pub use stats::{basic_stats_handler, stats_handler};
