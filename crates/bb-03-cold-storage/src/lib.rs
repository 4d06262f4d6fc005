//! # Cold Storage Monitoring Subsystem
//!
//! Registers refrigerators, freezers and platelet incubators, keeps a
//! bounded history of probe readings for each, and reports the units whose
//! latest reading is outside their acceptable range.
//!
//! ## Domain Invariants
//!
//! | Invariant | Enforcement Location |
//! |-----------|---------------------|
//! | Range derived from kind | `service.rs` - `register()` |
//! | Reading history bounded | `domain/entities.rs` - `record_reading()` |
//! | Alerts reflect latest reading only | `domain/entities.rs` - `alert()` |

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::InMemoryStorageUnitRepository;
pub use domain::*;
pub use ports::*;
pub use service::{ColdStorageConfig, ColdStorageService};
