//! # Shared Types Crate
//!
//! This crate contains the vocabulary every blood bank subsystem speaks:
//! blood types, document identifiers, the acting user recorded in audit
//! trails, storage locations, the injectable clock, and field-level
//! validation errors.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All cross-subsystem types are defined here.
//! - **Boundary Checks Once**: Optional nested data (storage location) is
//!   normalised into `Option<StorageLocation>` at the request boundary and is
//!   never re-checked field by field downstream.
//! - **Injectable Time**: Every "now" flows through [`TimeSource`] so lifecycle
//!   and reporting logic is deterministic under test.

pub mod blood;
pub mod entities;
pub mod errors;
pub mod ids;
pub mod time;

pub use blood::*;
pub use entities::*;
pub use errors::*;
pub use ids::*;
pub use time::*;
