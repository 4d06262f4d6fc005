//! # Domain Layer
//!
//! - `grouping`: group-by-and-count along one dimension
//! - `metrics`: wastage rate, days of supply, shortage levels
//! - `reports`: the report payloads
//! - `filter`: period and blood type restriction

pub mod errors;
pub mod filter;
pub mod grouping;
pub mod metrics;
pub mod reports;

pub use errors::*;
pub use filter::*;
pub use grouping::*;
pub use metrics::*;
pub use reports::*;
