//! Short code generation.
//!
//! Codes are drawn from the operating system CSPRNG so that neither existing
//! nor future codes can be predicted from observed ones. Uniqueness is not
//! checked here; the store rejects duplicates and
//! [`crate::application::services::MappingService`] retries.

use rand::rngs::OsRng;
use rand::{Rng, TryRngCore};
use tracing::debug;

/// The 62-symbol alphabet: `A-Z`, `a-z`, `0-9`.
pub const ALPHABET: &[u8; 62] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// 62^7 ≈ 3.5 × 10^12 possible codes.
pub const DEFAULT_CODE_LENGTH: usize = 7;

/// Path segments served by fixed routes. A code equal to one of these would
/// never reach the redirect handler, so it is never handed out.
pub const RESERVED_CODES: &[&str] = &["shorten", "show", "health", "stats", "api"];

/// Generates a random short code of `length` characters.
///
/// Every character is drawn independently and uniformly from [`ALPHABET`].
///
/// # Panics
///
/// Panics if the operating system randomness source fails. There is no
/// meaningful local recovery from that.
///
/// Reserved codes ([`RESERVED_CODES`]) are redrawn.
pub fn generate_code(length: usize) -> String {
    let mut rng = OsRng.unwrap_err();

    next_unreserved(|| {
        (0..length)
            .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
            .collect()
    })
}

fn next_unreserved(mut draw: impl FnMut() -> String) -> String {
    loop {
        let code = draw();
        if !is_reserved_code(&code) {
            return code;
        }
        debug!(code = %code, "drew a reserved code, redrawing");
    }
}

/// Returns true if `code` collides with a fixed route.
pub fn is_reserved_code(code: &str) -> bool {
    RESERVED_CODES.contains(&code)
}

/// Returns true if `code` only contains alphabet characters.
pub fn is_valid_code(code: &str) -> bool {
    !code.is_empty() && code.bytes().all(|b| ALPHABET.contains(&b))
}
