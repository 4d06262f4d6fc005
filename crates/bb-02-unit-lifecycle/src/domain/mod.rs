//! # Domain Layer
//!
//! Pure lifecycle logic for blood units.
//!
//! - `entities`: `BloodUnit`, `UnitStatus`, history and transfusion records
//! - `transition`: the status transition writer (allow-list + history append)
//! - `expiry`: the expiry classifier
//! - `intake`: validation of new units
//!
//! This module contains NO I/O dependencies. All external interactions
//! are abstracted through ports in the `ports` module.

pub mod entities;
pub mod errors;
pub mod expiry;
pub mod intake;
pub mod transition;

pub use entities::*;
pub use errors::*;
pub use expiry::*;
pub use intake::*;
pub use transition::*;
