//! Liveness and counters. Served without credentials.

use crate::domain::ApiError;
use crate::middleware::MetricsSnapshot;
use crate::router::AppState;
use axum::extract::State;
use axum::http::Uri;
use axum::Json;
use serde_json::{json, Value};

pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": crate::VERSION,
    }))
}

pub async fn metrics(State(state): State<AppState>) -> Json<MetricsSnapshot> {
    Json(state.metrics.snapshot())
}

pub async fn not_found(uri: Uri) -> ApiError {
    ApiError::not_found(format!("route {}", uri.path()))
}
