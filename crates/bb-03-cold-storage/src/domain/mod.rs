//! # Domain Layer
//!
//! - `entities`: `StorageUnit`, kinds and their acceptable ranges
//! - `registration`: validation of new storage units
//! - `errors`: `ColdStorageError`

pub mod entities;
pub mod errors;
pub mod registration;

pub use entities::*;
pub use errors::*;
pub use registration::*;
