//! Middleware stack for the API Gateway.
//!
//! Outermost first:
//! CORS → Tracing → Metrics → Timeout → Auth → handler.

pub mod auth;
pub mod cors;
pub mod metrics;
pub mod timeout;
pub mod tracing;

pub use auth::{AuthLayer, AuthService, PUBLIC_PATHS};
pub use cors::create_cors_layer;
pub use metrics::{GatewayMetrics, MetricsLayer, MetricsService, MetricsSnapshot};
pub use timeout::{TimeoutLayer, TimeoutService};
pub use self::tracing::{TracingLayer, TracingService};
