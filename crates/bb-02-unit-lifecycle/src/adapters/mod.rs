//! # Adapters Layer
//!
//! - `memory`: in-process document store for tests and the `memory` backend

pub mod memory;

pub use memory::InMemoryUnitRepository;
