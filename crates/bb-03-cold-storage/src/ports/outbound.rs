//! # Outbound Ports (Driven Ports)
//!
//! Production: `RocksDbDocumentStore` (bank-runtime/src/adapters/rocksdb_store.rs)
//! Testing: [`InMemoryStorageUnitRepository`](crate::adapters::InMemoryStorageUnitRepository)

use crate::domain::{ColdStorageError, StorageUnit};
use shared_types::StorageUnitId;

/// Mutation applied inside a single-document read-modify-write.
pub type StorageUnitMutation<'a> = &'a mut dyn FnMut(&mut StorageUnit) -> Result<(), ColdStorageError>;

/// Document store for storage units.
pub trait StorageUnitRepository: Send + Sync {
    fn insert(&self, unit: StorageUnit) -> Result<(), ColdStorageError>;

    fn get(&self, id: &StorageUnitId) -> Result<Option<StorageUnit>, ColdStorageError>;

    fn list(&self) -> Result<Vec<StorageUnit>, ColdStorageError>;

    /// Read, mutate and write back one storage unit atomically.
    fn update(
        &self,
        id: &StorageUnitId,
        mutate: StorageUnitMutation<'_>,
    ) -> Result<Option<StorageUnit>, ColdStorageError>;
}
