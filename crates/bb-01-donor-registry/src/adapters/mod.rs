//! # Adapters Layer
//!
//! In-process implementations of the outbound ports.

pub mod memory;

pub use memory::{AtomicSequence, InMemoryDonorRepository};
