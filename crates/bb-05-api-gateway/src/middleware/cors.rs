//! CORS middleware.
//!
//! Wrapper around tower-http CORS with gateway configuration.

use crate::domain::CorsConfig;
use axum::http::{HeaderName, HeaderValue, Method};
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};

/// Create CORS layer from gateway config
pub fn create_cors_layer(config: &CorsConfig) -> CorsLayer {
    if !config.enabled {
        // Adds no CORS headers, so browsers fall back to same-origin.
        return CorsLayer::new();
    }

    let mut cors = CorsLayer::new();

    let wildcard_origin = config.allowed_origins.iter().any(|o| o == "*");
    if wildcard_origin {
        cors = cors.allow_origin(Any);
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        cors = cors.allow_origin(origins);
    }

    let methods: Vec<Method> = config
        .allowed_methods
        .iter()
        .filter_map(|m| m.parse().ok())
        .collect();
    cors = cors.allow_methods(methods);

    let wildcard_headers = config.allowed_headers.iter().any(|h| h == "*");
    if wildcard_headers {
        cors = cors.allow_headers(Any);
    } else {
        let headers: Vec<HeaderName> = config
            .allowed_headers
            .iter()
            .filter_map(|h| h.parse().ok())
            .collect();
        cors = cors.allow_headers(headers);
    }

    cors = cors.max_age(Duration::from_secs(config.max_age));

    // tower-http rejects credentials combined with wildcards at runtime.
    if config.allow_credentials && !wildcard_origin && !wildcard_headers {
        cors = cors.allow_credentials(true);
    }

    cors
}
