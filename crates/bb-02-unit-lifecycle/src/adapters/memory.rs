//! In-memory unit store.

use crate::domain::{BloodUnit, LifecycleError};
use crate::ports::{UnitMutation, UnitRepository};
use parking_lot::RwLock;
use shared_types::{StoreError, UnitId};
use std::collections::HashMap;

/// `UnitRepository` backed by a `HashMap` under one lock.
///
/// The write lock is held for the whole of an `update`, which makes every
/// single-document write atomic.
#[derive(Debug, Default)]
pub struct InMemoryUnitRepository {
    units: RwLock<HashMap<UnitId, BloodUnit>>,
}

impl InMemoryUnitRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.units.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.read().is_empty()
    }
}

impl UnitRepository for InMemoryUnitRepository {
    fn insert(&self, unit: BloodUnit) -> Result<(), LifecycleError> {
        let mut units = self.units.write();
        if units.contains_key(unit.id()) {
            return Err(StoreError::Conflict(format!("unit {} already exists", unit.id())).into());
        }
        units.insert(unit.id().clone(), unit);
        Ok(())
    }

    fn get(&self, id: &UnitId) -> Result<Option<BloodUnit>, LifecycleError> {
        Ok(self.units.read().get(id).cloned())
    }

    fn list(&self) -> Result<Vec<BloodUnit>, LifecycleError> {
        Ok(self.units.read().values().cloned().collect())
    }

    fn update(&self, id: &UnitId, mutate: UnitMutation<'_>) -> Result<Option<BloodUnit>, LifecycleError> {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UnitStatus;
    use chrono::{TimeZone, Utc};
    use shared_types::{Actor, BloodType};

    fn unit(id: &str) -> BloodUnit {
        let t = Utc.with_ymd_and_hms(2024, 4, 4, 4, 0, 0).unwrap();
        BloodUnit::collected(UnitId::from(id), BloodType::AbNegative, 450, t, &Actor::system(), t)
    }

    #[test]
    fn test_insert_rejects_duplicate_id() {
        let repo = InMemoryUnitRepository::new();
        repo.insert(unit("BU-1")).unwrap();
        let err = repo.insert(unit("BU-1")).unwrap_err();
        assert!(matches!(err, LifecycleError::Store(StoreError::Conflict(_))));
        assert_eq!(repo.len(), 1);
    }

    #[test]
    fn test_update_missing_is_none() {
        let repo = InMemoryUnitRepository::new();
        let result = repo.update(&UnitId::from("nope"), &mut |_| Ok(())).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_failed_mutation_leaves_document_untouched() {
        let repo = InMemoryUnitRepository::new();
        repo.insert(unit("BU-1")).unwrap();
        let id = UnitId::from("BU-1");
        let t = Utc.with_ymd_and_hms(2024, 4, 5, 0, 0, 0).unwrap();

        let result = repo.update(&id, &mut |u| {
            u.apply_status(UnitStatus::Available, &Actor::system(), None, t);
            Err(LifecycleError::Conflict("abort".into()))
        });
        assert!(result.is_err());

        let stored = repo.get(&id).unwrap().unwrap();
        assert_eq!(stored.status(), UnitStatus::Quarantined);
        assert_eq!(stored.history().len(), 1);
    }
}
