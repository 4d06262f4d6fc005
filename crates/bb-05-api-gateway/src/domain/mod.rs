//! Domain layer for the API Gateway.

pub mod auth;
pub mod config;
pub mod error;

pub use auth::*;
pub use config::*;
pub use error::*;
