//! # Production Storage Adapters
//!
//! Enable the `rocksdb` feature to use the RocksDB document store:
//!
//! ```toml
//! bank-runtime = { path = "...", features = ["rocksdb"] }
//! ```
//!
//! One store instance implements every repository port, with one column
//! family per collection. Without the feature only the in-memory adapters
//! of each subsystem crate are available.

#[cfg(feature = "rocksdb")]
pub mod rocksdb_store;

#[cfg(feature = "rocksdb")]
pub use rocksdb_store::{
    RocksDbConfig, RocksDbDocumentStore, CF_DONORS, CF_SEQUENCES, CF_STORAGE_UNITS, CF_UNITS,
    COLUMN_FAMILIES,
};

// Re-export in-memory adapters for testing
pub use bb_01_donor_registry::{AtomicSequence, InMemoryDonorRepository};
pub use bb_02_unit_lifecycle::InMemoryUnitRepository;
pub use bb_03_cold_storage::InMemoryStorageUnitRepository;
