//! # Blood Unit Lifecycle Subsystem
//!
//! Tracks each blood unit from intake to its terminal state.
//!
//! ## Purpose
//!
//! - Intake of donated units into `Quarantined`
//! - The status transition writer (single and batch)
//! - The expiry classifier used by reports and dashboards
//! - Transfusion and unit temperature records
//!
//! ## Lifecycle
//!
//! ```text
//! [intake] ──→ Quarantined ──→ Available ⇄ Reserved
//!                  │               │          │
//!                  └──────────┬────┴──────────┘
//!                             ↓
//!                Transfused | Discarded | Expired
//! ```
//!
//! The status writer accepts any of the six statuses from any state; only
//! transfusion recording checks the current status.
//!
//! ## Domain Invariants
//!
//! | Invariant | Enforcement Location |
//! |-----------|---------------------|
//! | Status always one of six values | `domain/transition.rs` - `StatusChange::parse()` |
//! | History append-only | `domain/entities.rs` - `apply_status()` is the only writer |
//! | Expiration forced to now on early `Expired` | `domain/entities.rs` - `apply_status()` |
//! | Single-document writes atomic | `ports/outbound.rs` - `UnitRepository::update()` |
//!
//! ## Outbound Dependencies
//!
//! | Dependency | Trait | Purpose |
//! |------------|-------|---------|
//! | Document store | `UnitRepository` | Unit persistence |
//! | Donor registry | `DonationLedger` | Eligibility check at intake |
//! | Clock | `TimeSource` | "now" for history and expiry |

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::InMemoryUnitRepository;
pub use domain::*;
pub use ports::*;
pub use service::UnitLifecycleService;
