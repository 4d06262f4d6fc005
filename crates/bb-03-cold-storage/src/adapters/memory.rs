//! In-memory storage unit store.

use crate::domain::{ColdStorageError, StorageUnit};
use crate::ports::{StorageUnitMutation, StorageUnitRepository};
use parking_lot::RwLock;
use shared_types::{StorageUnitId, StoreError};
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct InMemoryStorageUnitRepository {
    units: RwLock<HashMap<StorageUnitId, StorageUnit>>,
}

impl InMemoryStorageUnitRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageUnitRepository for InMemoryStorageUnitRepository {
    fn insert(&self, unit: StorageUnit) -> Result<(), ColdStorageError> {
        let mut units = self.units.write();
        if units.contains_key(&unit.id) {
            return Err(StoreError::Conflict(format!("storage unit {} already exists", unit.id)).into());
        }
        units.insert(unit.id.clone(), unit);
        Ok(())
    }

    fn get(&self, id: &StorageUnitId) -> Result<Option<StorageUnit>, ColdStorageError> {
        Ok(self.units.read().get(id).cloned())
    }

    fn list(&self) -> Result<Vec<StorageUnit>, ColdStorageError> {
        Ok(self.units.read().values().cloned().collect())
    }

    fn update(
        &self,
        id: &StorageUnitId,
        mutate: StorageUnitMutation<'_>,
    ) -> Result<Option<StorageUnit>, ColdStorageError> {
        let mut units = self.units.write();
        let Some(stored) = units.get_mut(id) else {
            return Ok(None);
        };
        let mut draft = stored.clone();
        mutate(&mut draft)?;
        *stored = draft.clone();
        Ok(Some(draft))
    }
}
