//! Reference storage service for snaplink.
//!
//! A dumb blob store: it keeps base64 envelopes and their file metadata in
//! memory, hands each one out at most once, and never sees a key.

use axum::extract::DefaultBodyLimit;
use axum::Router;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod store;

/// The full application: routes, auth on create endpoints, body limit and
/// request tracing.
pub fn app(state: routes::AppState) -> Router {
    let max_body_bytes = state.config.max_body_bytes;
    Router::new()
        .merge(routes::router_with_auth(state.clone()))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
