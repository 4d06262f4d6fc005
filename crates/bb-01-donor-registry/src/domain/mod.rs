//! # Domain Layer
//!
//! - `entities`: `Donor`, donor numbers, eligibility
//! - `registration`: validation of new donors
//! - `errors`: `DonorError`

pub mod entities;
pub mod errors;
pub mod registration;

pub use entities::*;
pub use errors::*;
pub use registration::*;
