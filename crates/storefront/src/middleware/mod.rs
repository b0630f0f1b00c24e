//! HTTP middleware stack for the storefront API.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. CORS (site origin only)
//! 3. `TraceLayer` (request tracing)
//! 4. Request ID (add unique ID to each request)

pub mod request_id;

use axum::http::{HeaderName, HeaderValue, Method, header};
use tower_http::cors::CorsLayer;

pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};

/// CORS for the rendered site calling the JSON API.
///
/// An origin that is not a valid header value allows no cross-origin calls.
#[must_use]
pub fn cors_layer(site_origin: &str) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, HeaderName::from_static(REQUEST_ID_HEADER)])
        .expose_headers([HeaderName::from_static(REQUEST_ID_HEADER)]);

    match HeaderValue::from_str(site_origin.trim_end_matches('/')) {
        Ok(origin) => layer.allow_origin(origin),
        Err(e) => {
            tracing::warn!(error = %e, origin = site_origin, "Invalid CORS origin");
            layer
        }
    }
}
