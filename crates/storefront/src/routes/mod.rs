//! HTTP routes for the storefront API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health          - Liveness check
//! GET  /api/posts       - Blog posts page (?first&after&category&search&tag)
//! GET  /api/projects    - Portfolio projects page (same parameters)
//! POST /api/orders      - Place an order from the browser cart
//! ```

pub mod listing;
pub mod orders;

use axum::{
    Router,
    body::Body,
    http::Request,
    middleware,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::middleware::{cors_layer, request_id_middleware};
use crate::state::AppState;

/// The JSON API routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/posts", get(listing::posts))
        .route("/projects", get(listing::projects))
        .route("/orders", post(orders::create))
}

/// The full application with middleware, ready to serve.
///
/// Sentry layers are added by the binary so tests run without a client.
pub fn app(state: AppState) -> Router {
    let cors = cors_layer(&state.config().site_origin);

    Router::new()
        .route("/health", get(health))
        .nest("/api", api_routes())
        .layer(middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = tracing::field::Empty,
                )
            }),
        )
        .layer(cors)
        .with_state(state)
}

/// Liveness health check. Does not check the CMS.
async fn health() -> &'static str {
    "ok"
}
