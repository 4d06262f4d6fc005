//! Adapters for the API Gateway.
//!
//! Infrastructure implementations of the gateway's ports and the error
//! conversions at the HTTP boundary.

pub mod donation_ledger;
pub mod error_conversions;
pub mod user_directory;

pub use donation_ledger::RegistryDonationLedger;
pub use user_directory::InMemoryUserDirectory;
