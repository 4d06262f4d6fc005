//! # Bank Runtime Library
//!
//! Exposes the runtime's configuration, wiring and storage adapters for
//! testing. The main entry point is the `main.rs` binary.
//!
//! ## Architectural Patterns
//!
//! - **DDD**: each subsystem crate owns its domain rules
//! - **Hexagonal Architecture**: ports define contracts, adapters implement them
//! - **Single composition root**: the store is opened here and injected into
//!   every service; nothing holds a global connection

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod adapters;
pub mod container;

pub use container::{ConfigError, RuntimeConfig, StorageBackend, SubsystemContainer};
