//! # Subsystem Container
//!
//! Opens the configured document store and wires every subsystem service
//! to it. Subsystems reach each other only through their API traits.

pub mod config;
pub mod subsystems;

pub use config::{ConfigError, RuntimeConfig, StorageBackend};
pub use subsystems::SubsystemContainer;
