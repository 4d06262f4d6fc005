//! # Ports Layer
//!
//! The reporter reads units through [`UnitLifecycleApi`](bb_02_unit_lifecycle::UnitLifecycleApi);
//! it has no store of its own.

pub mod inbound;

pub use inbound::*;
