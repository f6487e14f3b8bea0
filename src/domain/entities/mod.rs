//! Core domain entities.
//!
//! The service has a single entity, [`UrlMapping`]. Creation input is split into
//! its own struct ([`NewUrlMapping`]) so store-assigned fields cannot be forged
//! by callers.

pub mod mapping;

pub use mapping::{NewUrlMapping, UrlMapping};
