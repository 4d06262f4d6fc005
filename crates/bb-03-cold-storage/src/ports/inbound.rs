//! # Inbound Ports (Driving Ports)

use crate::domain::{ColdStorageError, StorageAlert, StorageKind, StorageRegistration, StorageUnit};
use serde::{Deserialize, Serialize};
use shared_types::{Actor, StorageUnitId};

/// Criteria for listing storage units.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageFilter {
    pub facility: Option<String>,
    pub kind: Option<StorageKind>,
}

impl StorageFilter {
    pub fn matches(&self, unit: &StorageUnit) -> bool {
        self.facility.as_deref().map_or(true, |f| unit.facility == f)
            && self.kind.map_or(true, |k| unit.kind == k)
    }
}

/// Result of recording a reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingOutcome {
    pub storage_unit: StorageUnit,
    pub excursion: bool,
}

/// Primary API for cold storage monitoring.
pub trait ColdStorageApi: Send + Sync {
    fn register(&self, request: StorageRegistration) -> Result<StorageUnit, ColdStorageError>;

    fn get_storage_unit(&self, id: &StorageUnitId) -> Result<StorageUnit, ColdStorageError>;

    /// Storage units matching `filter`, ordered by facility then name.
    fn list_storage_units(&self, filter: &StorageFilter) -> Result<Vec<StorageUnit>, ColdStorageError>;

    /// Append a probe reading. Excursions are logged and reported back.
    fn record_reading(
        &self,
        id: &StorageUnitId,
        celsius: f64,
        actor: &Actor,
    ) -> Result<ReadingOutcome, ColdStorageError>;

    /// Storage units whose latest reading is out of range, worst first.
    fn active_alerts(&self) -> Result<Vec<StorageAlert>, ColdStorageError>;
}
