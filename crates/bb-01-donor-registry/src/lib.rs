//! # Donor Registry Subsystem
//!
//! Registers donors, numbers them sequentially and decides when they may
//! donate again.
//!
//! ## Domain Invariants
//!
//! | Invariant | Enforcement Location |
//! |-----------|---------------------|
//! | Donor numbers unique and increasing | `ports/outbound.rs` - `SequenceGenerator` |
//! | Age 17-65 at registration | `domain/registration.rs` - `validate()` |
//! | 56 days between donations | `domain/entities.rs` - `Donor::eligibility()` |
//! | Donated blood type matches donor | `service.rs` - `record_donation()` |

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::{AtomicSequence, InMemoryDonorRepository};
pub use domain::*;
pub use ports::*;
pub use service::{DonorRegistryDependencies, DonorRegistryService};
