//! # Cold Storage Service

use crate::domain::{
    ColdStorageError, StorageAlert, StorageRegistration, StorageStatus, StorageUnit,
    DEFAULT_MAX_READINGS,
};
use crate::ports::{ColdStorageApi, ReadingOutcome, StorageFilter, StorageUnitRepository};
use shared_types::{validate_celsius, Actor, StorageUnitId, TimeSource};

/// Service settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColdStorageConfig {
    /// Readings kept per storage unit.
    pub max_readings: usize,
}

impl Default for ColdStorageConfig {
    fn default() -> Self {
        Self {
            max_readings: DEFAULT_MAX_READINGS,
        }
    }
}

/// The cold storage monitoring service.
pub struct ColdStorageService<R, T>
where
    R: StorageUnitRepository,
    T: TimeSource,
{
    repository: R,
    time_source: T,
    config: ColdStorageConfig,
}

impl<R, T> ColdStorageService<R, T>
where
    R: StorageUnitRepository,
    T: TimeSource,
{
    pub fn new(repository: R, time_source: T, config: ColdStorageConfig) -> Self {
        Self {
            repository,
            time_source,
            config,
        }
    }
}

impl<R, T> ColdStorageApi for ColdStorageService<R, T>
where
    R: StorageUnitRepository,
    T: TimeSource,
{
    fn register(&self, request: StorageRegistration) -> Result<StorageUnit, ColdStorageError> {
        let valid = request.validate()?;
        let now = self.time_source.now();
        let unit = StorageUnit {
            id: StorageUnitId::generate(),
            name: valid.name,
            facility: valid.facility,
            kind: valid.kind,
            range: valid.kind.range(),
            capacity_units: valid.capacity_units,
            status: StorageStatus::Operational,
            readings: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        self.repository.insert(unit.clone())?;
        tracing::info!(
            storage_unit_id = %unit.id,
            kind = %unit.kind,
            facility = %unit.facility,
            "[bb-03] Storage unit registered"
        );
        Ok(unit)
    }

    fn get_storage_unit(&self, id: &StorageUnitId) -> Result<StorageUnit, ColdStorageError> {
        self.repository
            .get(id)?
            .ok_or_else(|| ColdStorageError::StorageUnitNotFound(id.clone()))
    }

    fn list_storage_units(&self, filter: &StorageFilter) -> Result<Vec<StorageUnit>, ColdStorageError> {
        let mut units: Vec<StorageUnit> = self
            .repository
            .list()?
            .into_iter()
            .filter(|u| filter.matches(u))
            .collect();
        units.sort_by(|a, b| {
            a.facility
                .cmp(&b.facility)
                .then_with(|| a.name.cmp(&b.name))
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(units)
    }

    fn record_reading(
        &self,
        id: &StorageUnitId,
        celsius: f64,
        actor: &Actor,
    ) -> Result<ReadingOutcome, ColdStorageError> {
        validate_celsius("celsius", celsius)?;
        let now = self.time_source.now();
        let max_readings = self.config.max_readings;

        let mut excursion = false;
        let storage_unit = self
            .repository
            .update(id, &mut |unit| {
                excursion = unit.record_reading(celsius, actor, now, max_readings);
                Ok(())
            })?
            .ok_or_else(|| ColdStorageError::StorageUnitNotFound(id.clone()))?;

        if excursion {
            tracing::warn!(
                storage_unit_id = %id,
                celsius,
                min = storage_unit.range.min_celsius,
                max = storage_unit.range.max_celsius,
                "[bb-03] 🌡️ Temperature excursion"
            );
        } else {
            tracing::debug!(storage_unit_id = %id, celsius, "[bb-03] Reading recorded");
        }
        Ok(ReadingOutcome {
            storage_unit,
            excursion,
        })
    }

    fn active_alerts(&self) -> Result<Vec<StorageAlert>, ColdStorageError> {
        let mut alerts: Vec<StorageAlert> = self
            .repository
            .list()?
            .iter()
            .filter_map(StorageUnit::alert)
            .collect();
        alerts.sort_by(|a, b| {
            b.deviation
                .total_cmp(&a.deviation)
                .then_with(|| a.storage_unit_id.cmp(&b.storage_unit_id))
        });
        Ok(alerts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryStorageUnitRepository;
    use crate::domain::StorageKind;
    use chrono::{TimeZone, Utc};
    use shared_types::FixedTimeSource;

    type Service = ColdStorageService<InMemoryStorageUnitRepository, FixedTimeSource>;

    fn service(max_readings: usize) -> Service {
        ColdStorageService::new(
            InMemoryStorageUnitRepository::new(),
            FixedTimeSource::new(Utc.with_ymd_and_hms(2024, 11, 3, 6, 0, 0).unwrap()),
            ColdStorageConfig { max_readings },
        )
    }

    fn register(service: &Service, name: &str, kind: &str) -> StorageUnit {
        service
            .register(StorageRegistration {
                name: name.into(),
                facility: "Central".into(),
                kind: kind.into(),
                capacity_units: 100,
            })
            .unwrap()
    }

    #[test]
    fn test_register_sets_range_from_kind() {
        let s = service(10);
        let unit = register(&s, "Incubator 1", "PlateletIncubator");
        assert_eq!(unit.range, StorageKind::PlateletIncubator.range());
        assert_eq!(s.get_storage_unit(&unit.id).unwrap(), unit);
    }

    #[test]
    fn test_alerts_sorted_by_deviation() {
        let s = service(10);
        let fridge = register(&s, "Fridge", "Refrigerator");
        let freezer = register(&s, "Freezer", "Freezer");
        let ok = register(&s, "Fridge OK", "Refrigerator");
        let actor = Actor::system();

        assert!(s.record_reading(&fridge.id, 7.0, &actor).unwrap().excursion);
        assert!(s.record_reading(&freezer.id, -10.0, &actor).unwrap().excursion);
        assert!(!s.record_reading(&ok.id, 4.0, &actor).unwrap().excursion);

        let alerts = s.active_alerts().unwrap();
        let ids: Vec<_> = alerts.iter().map(|a| a.storage_unit_id.clone()).collect();
        assert_eq!(ids, vec![freezer.id, fridge.id]);
    }

    #[test]
    fn test_readings_trimmed_to_config() {
        let s = service(3);
        let unit = register(&s, "Fridge", "Refrigerator");
        for c in [3.0, 3.5, 4.0, 4.5, 5.0] {
            s.record_reading(&unit.id, c, &Actor::system()).unwrap();
        }
        let stored = s.get_storage_unit(&unit.id).unwrap();
        let values: Vec<f64> = stored.readings.iter().map(|r| r.celsius).collect();
        assert_eq!(values, vec![4.0, 4.5, 5.0]);
    }

    #[test]
    fn test_reading_errors() {
        let s = service(3);
        let missing = StorageUnitId::from("SU-x");
        assert_eq!(
            s.record_reading(&missing, 4.0, &Actor::system()).unwrap_err(),
            ColdStorageError::StorageUnitNotFound(missing)
        );
        let unit = register(&s, "Fridge", "Refrigerator");
        assert!(matches!(
            s.record_reading(&unit.id, f64::INFINITY, &Actor::system()),
            Err(ColdStorageError::Validation(_))
        ));
    }

    #[test]
    fn test_list_filter_by_kind() {
        let s = service(3);
        register(&s, "B", "Refrigerator");
        register(&s, "A", "Refrigerator");
        register(&s, "C", "Freezer");
        let filter = StorageFilter {
            kind: Some(StorageKind::Refrigerator),
            ..Default::default()
        };
        let names: Vec<_> = s.list_storage_units(&filter).unwrap().into_iter().map(|u| u.name).collect();
        assert_eq!(names, vec!["A", "B"]);
    }
}
