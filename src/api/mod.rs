//! API Routes for the markdown generator
//!
//! This module combines all API routes into a single router.

mod markdown_generator;
pub mod status;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::config::ROUTE_PREFIX;
use crate::AppState;

/// Build the route table.
///
/// Route structure:
/// - /markdown-generator/* - Generation and downloads (public)
/// - /health, /status - Health checks (public)
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(status::routes())
        .nest(ROUTE_PREFIX, markdown_generator::routes())
}

/// Build the complete application with middleware and state applied.
pub fn app(state: AppState) -> Router {
    let max_body_bytes = state.config.server.max_body_bytes;

    Router::new()
        .merge(routes())
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
