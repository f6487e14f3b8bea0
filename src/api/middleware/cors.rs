//! Cross-origin resource sharing.

use tower_http::cors::{Any, CorsLayer};

/// Allows any origin, method and header.
///
/// The API carries no credentials, so browser clients on any host may call it.
pub fn layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}
