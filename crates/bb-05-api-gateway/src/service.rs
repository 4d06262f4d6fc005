//! API Gateway service, the HTTP entry point.

use crate::domain::{GatewayConfig, GatewayError, Role};
use crate::middleware::GatewayMetrics;
use crate::ports::UserDirectory;
use crate::router::{build_router, AppState};
use axum::Router;
use bb_01_donor_registry::DonorRegistryApi;
use bb_02_unit_lifecycle::UnitLifecycleApi;
use bb_03_cold_storage::ColdStorageApi;
use bb_04_reporting::ReportingApi;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::Notify;
use tracing::{error, info};

/// Subsystems the gateway routes to.
#[derive(Clone)]
pub struct GatewayServices {
    pub units: Arc<dyn UnitLifecycleApi>,
    pub donors: Arc<dyn DonorRegistryApi>,
    pub storage: Arc<dyn ColdStorageApi>,
    pub reports: Arc<dyn ReportingApi>,
    pub users: Arc<dyn UserDirectory>,
}

/// API Gateway service state
pub struct ApiGatewayService {
    config: GatewayConfig,
    state: AppState,
    shutdown: Arc<Notify>,
}

/// Stops a running gateway from another task.
#[derive(Clone)]
pub struct ShutdownHandle(Arc<Notify>);

impl ShutdownHandle {
    pub fn shutdown(&self) {
        // A stored permit covers a server that is not waiting yet.
        self.0.notify_one();
    }
}

impl ApiGatewayService {
    /// Validate the configuration, seed the bootstrap administrator and
    /// prepare the handler state.
    pub fn new(config: GatewayConfig, services: GatewayServices) -> Result<Self, GatewayError> {
        config
            .validate()
            .map_err(|e| GatewayError::Config(e.to_string()))?;

        if let Some(token) = &config.auth.admin_token {
            services
                .users
                .seed(&config.auth.admin_name, Role::Admin, token)
                .map_err(|e| GatewayError::Users(e.to_string()))?;
        } else {
            tracing::warn!("[bb-05] No admin token configured; only pre-existing users can sign in");
        }

        let state = AppState {
            units: services.units,
            donors: services.donors,
            storage: services.storage,
            reports: services.reports,
            users: services.users,
            metrics: Arc::new(GatewayMetrics::new()),
            limits: Arc::new(config.limits.clone()),
        };

        Ok(Self {
            config,
            state,
            shutdown: Arc::new(Notify::new()),
        })
    }

    /// The router with every route and middleware attached.
    pub fn router(&self) -> Router {
        build_router(self.state.clone(), &self.config)
    }

    pub fn http_addr(&self) -> SocketAddr {
        self.config.http_addr()
    }

    /// Serve until shut down or the server fails.
    pub async fn start(&self) -> Result<(), GatewayError> {
        let addr = self.config.http_addr();
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| GatewayError::Bind(format!("{}: {}", addr, e)))?;
        self.serve(listener).await
    }

    /// Serve on an already bound listener.
    pub async fn serve(&self, listener: tokio::net::TcpListener) -> Result<(), GatewayError> {
        let shutdown = Arc::clone(&self.shutdown);
        let addr = listener
            .local_addr()
            .map_err(|e| GatewayError::Bind(e.to_string()))?;
        info!(addr = %addr, "[bb-05] Starting HTTP server");

        let result = axum::serve(listener, self.router())
            .with_graceful_shutdown(async move {
                shutdown.notified().await;
                info!("[bb-05] Received shutdown signal");
            })
            .await;

        match result {
            Ok(()) => {
                info!("[bb-05] API Gateway stopped");
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "[bb-05] HTTP server error");
                Err(GatewayError::Serve(e.to_string()))
            }
        }
    }

    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle(Arc::clone(&self.shutdown))
    }

    /// Trigger graceful shutdown
    pub fn shutdown(&self) {
        self.shutdown_handle().shutdown();
    }

    /// Get metrics
    pub fn metrics(&self) -> Arc<GatewayMetrics> {
        Arc::clone(&self.state.metrics)
    }
}
