//! BB-05 API Gateway - REST interface for the blood bank service.
//!
//! Every external request enters here, is authenticated against the user
//! directory, checked against the caller's role and handed to one of the
//! subsystem APIs.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                        API GATEWAY (bb-05)                        │
//! ├──────────────────────────────────────────────────────────────────┤
//! │  ┌────────────────────────────────────────────────────────────┐  │
//! │  │                    HTTP (axum, port 8080)                   │  │
//! │  └─────────────────────────────┬──────────────────────────────┘  │
//! │  ┌─────────────────────────────┴──────────────────────────────┐  │
//! │  │                     Middleware Stack                        │  │
//! │  │      CORS → Tracing → Metrics → Timeout → Auth              │  │
//! │  └─────────────────────────────┬──────────────────────────────┘  │
//! │  ┌─────────────────────────────┴──────────────────────────────┐  │
//! │  │            REST handlers (permission check per route)       │  │
//! │  └─────────────────────────────┬──────────────────────────────┘  │
//! └────────────────────────────────┼─────────────────────────────────┘
//!                                  │
//!      ┌──────────────┬────────────┼──────────────┬───────────────┐
//!      ▼              ▼            ▼              ▼               ▼
//! bb-01-donor   bb-02-unit    bb-03-cold    bb-04-reporting   users
//!  registry      lifecycle     storage
//! ```
//!
//! # Access
//!
//! | Route prefix | Read | Write |
//! |--------------|------|-------|
//! | `/api/donations`, `/api/units` | `inventory:read` | `inventory:write` |
//! | `/api/donors` | `donors:read` | `donors:write` |
//! | `/api/storage-units` | `storage:read` | `storage:write` |
//! | `/api/reports` | `reports:read` | |
//! | `/api/users` | `users:manage` | `users:manage` |
//!
//! `/health` and `/metrics` need no credentials. Credentials are a bearer
//! token or the session cookie.
//!
//! # Usage
//!
//! ```ignore
//! use bb_05_api_gateway::{ApiGatewayService, GatewayConfig, GatewayServices};
//!
//! let service = ApiGatewayService::new(GatewayConfig::default(), services)?;
//! service.start().await?;
//! ```

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod adapters;
pub mod domain;
pub mod middleware;
pub mod ports;
pub mod rest;
pub mod router;
pub mod service;

// Re-exports for public API
pub use adapters::{InMemoryUserDirectory, RegistryDonationLedger};
pub use domain::auth::{IssuedUser, Permission, Principal, Role, User, UserError};
pub use domain::config::GatewayConfig;
pub use domain::error::{ApiError, ApiResult, GatewayError};
pub use middleware::{GatewayMetrics, MetricsSnapshot};
pub use ports::UserDirectory;
pub use router::{build_router, AppState};
pub use service::{ApiGatewayService, GatewayServices, ShutdownHandle};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_every_role_reads_reports() {
        for role in Role::ALL {
            assert!(role.allows(Permission::ReportsRead));
        }
    }
}
