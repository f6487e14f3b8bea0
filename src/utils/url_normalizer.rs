//! Long URL normalization.
//!
//! The service accepts any text that starts with `http://` or `https://` once
//! surrounding whitespace is removed. Nothing else about the URL is checked or
//! rewritten, so the stored value is exactly what the caller sent.

/// Schemes accepted for long URLs.
pub const ALLOWED_PREFIXES: [&str; 2] = ["http://", "https://"];

/// Errors that can occur during URL normalization.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum UrlNormalizationError {
    #[error("URL must not be empty")]
    Empty,

    #[error("URL must start with http:// or https://")]
    UnsupportedProtocol,
}

/// Trims `input` and checks its scheme prefix.
///
/// # Errors
///
/// Returns [`UrlNormalizationError::Empty`] for blank input and
/// [`UrlNormalizationError::UnsupportedProtocol`] for anything not starting
/// with `http://` or `https://` (case-sensitive, as stored).
pub fn normalize_url(input: &str) -> Result<String, UrlNormalizationError> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Err(UrlNormalizationError::Empty);
    }

    if !ALLOWED_PREFIXES.iter().any(|p| trimmed.starts_with(p)) {
        return Err(UrlNormalizationError::UnsupportedProtocol);
    }

    Ok(trimmed.to_string())
}
