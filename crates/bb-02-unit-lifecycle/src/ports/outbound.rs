//! # Outbound Ports (Driven Ports)
//!
//! Dependencies the host application supplies to the lifecycle service.
//!
//! Production: `RocksDbDocumentStore` (bank-runtime/src/adapters/rocksdb_store.rs)
//! Testing: [`InMemoryUnitRepository`](crate::adapters::InMemoryUnitRepository)

use crate::domain::{BloodUnit, LifecycleError};
use shared_types::{BloodType, DonorId, Timestamp, UnitId};

/// Mutation applied inside a single-document read-modify-write.
pub type UnitMutation<'a> = &'a mut dyn FnMut(&mut BloodUnit) -> Result<(), LifecycleError>;

/// Document store for blood units.
pub trait UnitRepository: Send + Sync {
    /// Store a new unit. Fails with a store conflict if the id is taken.
    fn insert(&self, unit: BloodUnit) -> Result<(), LifecycleError>;

    fn get(&self, id: &UnitId) -> Result<Option<BloodUnit>, LifecycleError>;

    /// Every stored unit, in no particular order.
    fn list(&self) -> Result<Vec<BloodUnit>, LifecycleError>;

    /// Read, mutate and write back one unit atomically.
    ///
    /// Returns `Ok(None)` when the unit does not exist. When `mutate` fails
    /// the stored document is left untouched and the error is returned.
    fn update(&self, id: &UnitId, mutate: UnitMutation<'_>) -> Result<Option<BloodUnit>, LifecycleError>;
}

/// Donor-side bookkeeping for a donation linked to a donor.
///
/// Implemented by the gateway on top of the donor registry.
pub trait DonationLedger: Send + Sync {
    /// Check the donor may give `blood_type` at `at`, then record it.
    ///
    /// ## Errors
    ///
    /// - `Validation`: unknown donor, or blood type differs from the donor's
    /// - `Conflict`: donor inactive or not yet eligible
    fn record_donation(
        &self,
        donor_id: &DonorId,
        blood_type: BloodType,
        at: Timestamp,
    ) -> Result<(), LifecycleError>;
}
