//! Route table and shared handler state.

use crate::domain::{GatewayConfig, LimitsConfig};
use crate::middleware::{
    create_cors_layer, AuthLayer, GatewayMetrics, MetricsLayer, TimeoutLayer, TracingLayer,
};
use crate::ports::UserDirectory;
use crate::rest::{donors, reports, storage, system, units, users};
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, patch, post};
use axum::Router;
use bb_01_donor_registry::DonorRegistryApi;
use bb_02_unit_lifecycle::UnitLifecycleApi;
use bb_03_cold_storage::ColdStorageApi;
use bb_04_reporting::ReportingApi;
use std::sync::Arc;
use tower::ServiceBuilder;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub units: Arc<dyn UnitLifecycleApi>,
    pub donors: Arc<dyn DonorRegistryApi>,
    pub storage: Arc<dyn ColdStorageApi>,
    pub reports: Arc<dyn ReportingApi>,
    pub users: Arc<dyn UserDirectory>,
    pub metrics: Arc<GatewayMetrics>,
    pub limits: Arc<LimitsConfig>,
}

/// Build the HTTP router with the full middleware stack.
pub fn build_router(state: AppState, config: &GatewayConfig) -> Router {
    let middleware = ServiceBuilder::new()
        .layer(create_cors_layer(&config.cors))
        .layer(TracingLayer::new())
        .layer(MetricsLayer::new(Arc::clone(&state.metrics)))
        .layer(TimeoutLayer::new(&config.timeouts))
        .layer(AuthLayer::new(
            Arc::clone(&state.users),
            config.auth.session_cookie.as_str(),
        ));

    Router::new()
        .route("/health", get(system::health))
        .route("/metrics", get(system::metrics))
        // Inventory
        .route("/api/donations", post(units::create_donation))
        .route("/api/units", get(units::list_units))
        .route("/api/units/batch-status", post(units::batch_update_status))
        .route("/api/units/:id", get(units::get_unit))
        .route("/api/units/:id/status", patch(units::update_status))
        .route("/api/units/:id/transfusion", post(units::record_transfusion))
        .route("/api/units/:id/temperature", post(units::record_temperature))
        // Reports
        .route("/api/reports/dashboard", get(reports::dashboard))
        .route("/api/reports/expiry", get(reports::expiry))
        .route("/api/reports/distribution", get(reports::distribution))
        .route("/api/reports/inventory", get(reports::inventory))
        .route("/api/reports/wastage", get(reports::wastage))
        // Donors
        .route("/api/donors", get(donors::list_donors).post(donors::register_donor))
        .route("/api/donors/:id", get(donors::get_donor))
        // Cold storage
        .route(
            "/api/storage-units",
            get(storage::list_storage_units).post(storage::register_storage_unit),
        )
        .route("/api/storage-units/alerts", get(storage::alerts))
        .route("/api/storage-units/:id", get(storage::get_storage_unit))
        .route("/api/storage-units/:id/readings", post(storage::record_reading))
        // Users
        .route("/api/users", get(users::list_users).post(users::create_user))
        .route("/api/users/:id/deactivate", post(users::deactivate_user))
        .fallback(system::not_found)
        .layer(DefaultBodyLimit::max(config.limits.max_body_bytes))
        .layer(middleware)
        .with_state(state)
}
