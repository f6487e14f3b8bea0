//! DTOs for the shortening endpoint.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to shorten one long URL.
#[derive(Debug, Deserialize, Validate)]
pub struct ShortenRequest {
    /// The URL to shorten. Scheme checks happen in the service.
    #[validate(length(min = 1, message = "URL must not be empty"))]
    pub url: String,
}

/// Response for a shortened URL.
///
/// `url` echoes the stored long URL, which for an existing mapping is the
/// stored value rather than the request text.
#[derive(Debug, Serialize)]
pub struct ShortenResponse {
    pub url: String,
    pub short_code: String,
    pub short_url: String,
    /// `false` when the long URL had already been shortened.
    pub created: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_url_fails_validation() {
        let request = ShortenRequest { url: String::new() };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_non_empty_url_passes_validation() {
        let request = ShortenRequest {
            url: "ftp://bad".to_string(),
        };
        assert!(request.validate().is_ok());
    }
}
