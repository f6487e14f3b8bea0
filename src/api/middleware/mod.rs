//! HTTP middleware for request processing.
//!
//! Provides request tracing and cross-origin access.

pub mod cors;
pub mod tracing;
