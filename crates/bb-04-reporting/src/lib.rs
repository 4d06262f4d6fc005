//! # Aggregation Reporter Subsystem
//!
//! Dashboard and report payloads built from unit snapshots.
//!
//! ## Derived Figures
//!
//! | Figure | Definition |
//! |--------|------------|
//! | Wastage rate | `(expired + discarded) / processed × 100`, two decimals |
//! | Days of supply | `available / (transfusions in last 30 days / 30)`; 30 or 0 without usage |
//! | Shortage level | `< threshold` Critical, `< 2 × threshold` Low, else Adequate |
//!
//! ## Outbound Dependencies
//!
//! | Subsystem | Trait | Purpose |
//! |-----------|-------|---------|
//! | 2 (Unit Lifecycle) | `UnitLifecycleApi` | Unit snapshots |

pub mod domain;
pub mod ports;
pub mod service;

pub use domain::*;
pub use ports::*;
pub use service::ReportingService;
