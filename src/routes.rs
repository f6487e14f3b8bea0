//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET    /`                        - Welcome string
//! - `POST   /shorten`                 - Create (or fetch) a short code
//! - `GET    /show`                    - List every mapping
//! - `GET    /health`                  - Health check: store, cache, click queue
//! - `GET    /stats/{short_code}`      - Mapping metadata
//! - `GET    /api/stats/{short_code}`  - Mapping metadata with click count
//! - `DELETE /api/delete/{short_code}` - Delete a mapping
//! - `GET    /{short_code}`            - Permanent redirect
//!
//! Static segments take precedence over `/{short_code}` (`GET /shorten` is a
//! 405, not a redirect). The generator never hands out those names; see
//! [`crate::utils::code_generator::RESERVED_CODES`].
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **CORS** - Any origin, method and header

use crate::api::handlers::{
    basic_stats_handler, delete_handler, health_handler, list_handler, redirect_handler,
    root_handler, shorten_handler, stats_handler,
};
use crate::api::middleware::{cors, tracing};
use crate::state::AppState;
use axum::Router;
use axum::routing::{delete, get, post};

/// Constructs the application router with all routes and middleware.
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/shorten", post(shorten_handler))
        .route("/shorten/", post(shorten_handler))
        .route("/show", get(list_handler))
        .route("/health", get(health_handler))
        .route("/stats/{short_code}", get(basic_stats_handler))
        .route("/api/stats/{short_code}", get(stats_handler))
        .route("/api/delete/{short_code}", delete(delete_handler))
        .route("/{short_code}", get(redirect_handler))
        .with_state(state)
        .layer(cors::layer())
        .layer(tracing::layer())
}
