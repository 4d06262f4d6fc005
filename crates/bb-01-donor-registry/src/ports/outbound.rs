//! # Outbound Ports (Driven Ports)
//!
//! Production: `RocksDbDocumentStore` (bank-runtime/src/adapters/rocksdb_store.rs)
//! Testing: [`InMemoryDonorRepository`](crate::adapters::InMemoryDonorRepository),
//! [`AtomicSequence`](crate::adapters::AtomicSequence)

use crate::domain::{Donor, DonorError};
use shared_types::{DonorId, StoreError};

/// Mutation applied inside a single-document read-modify-write.
pub type DonorMutation<'a> = &'a mut dyn FnMut(&mut Donor) -> Result<(), DonorError>;

/// Document store for donors.
pub trait DonorRepository: Send + Sync {
    fn insert(&self, donor: Donor) -> Result<(), DonorError>;

    fn get(&self, id: &DonorId) -> Result<Option<Donor>, DonorError>;

    fn list(&self) -> Result<Vec<Donor>, DonorError>;

    /// Read, mutate and write back one donor atomically. `Ok(None)` when the
    /// donor does not exist; a failed mutation stores nothing.
    fn update(&self, id: &DonorId, mutate: DonorMutation<'_>) -> Result<Option<Donor>, DonorError>;
}

/// Named monotonic counters.
///
/// Each call returns a value never returned before for that name, starting
/// at 1. Implementations must increment atomically, never query-then-write.
pub trait SequenceGenerator: Send + Sync {
    fn next_value(&self, sequence: &str) -> Result<u64, StoreError>;
}
