//! Utility functions shared across layers.
//!
//! - [`code_generator`] - Short code generation
//! - [`url_normalizer`] - Long URL trimming and scheme checks
//! - [`db_error`] - Classification of database errors

pub mod code_generator;
pub mod db_error;
pub mod url_normalizer;
