//! # Ports Layer
//!
//! - `inbound`: the API this crate offers to the gateway
//! - `outbound`: what the host must supply (document store, donation ledger)

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
