//! # Blood Bank Test Suite
//!
//! Unified test crate containing:
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── fixtures.rs   # Fully wired in-memory service on a fixed clock
//!     ├── flows.rs      # Cross-subsystem flows through the API traits
//!     └── http.rs       # The gateway served over a real socket
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p bb-tests
//!
//! # By category
//! cargo test -p bb-tests integration::flows::
//! cargo test -p bb-tests integration::http::
//! ```

#![allow(dead_code)]

pub mod integration;
