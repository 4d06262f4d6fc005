//! # Reporting Service
//!
//! Snapshots units through the lifecycle API and hands them to the pure
//! report builders.

use crate::domain::{
    BloodTypeDistribution, DashboardSummary, ExpiryTrackingReport, GroupBy, InventoryReport,
    ReportError, ReportFilter, WastageReport, USAGE_WINDOW_DAYS,
};
use crate::ports::ReportingApi;
use bb_02_unit_lifecycle::{BloodUnit, UnitLifecycleApi};
use chrono::Duration;
use shared_types::{BloodType, TimeSource};
use std::sync::Arc;

pub struct ReportingService<T: TimeSource> {
    units: Arc<dyn UnitLifecycleApi>,
    time_source: T,
}

impl<T: TimeSource> ReportingService<T> {
    pub fn new(units: Arc<dyn UnitLifecycleApi>, time_source: T) -> Self {
        Self { units, time_source }
    }

    fn snapshot(&self) -> Result<Vec<BloodUnit>, ReportError> {
        self.units.all_units().map_err(|e| {
            tracing::error!("[bb-04] Could not read units for report: {}", e);
            ReportError::from(e)
        })
    }
}

impl<T: TimeSource> ReportingApi for ReportingService<T> {
    fn dashboard(&self) -> Result<DashboardSummary, ReportError> {
        let units = self.snapshot()?;
        let summary = DashboardSummary::build(&units, self.time_source.now());
        if !summary.critical_shortages.is_empty() {
            tracing::warn!(
                shortages = ?summary.critical_shortages,
                "[bb-04] Critical shortage on dashboard"
            );
        }
        Ok(summary)
    }

    fn expiry_tracking(&self, blood_type: Option<BloodType>) -> Result<ExpiryTrackingReport, ReportError> {
        let units = self.snapshot()?;
        Ok(ExpiryTrackingReport::build(&units, self.time_source.now(), blood_type))
    }

    fn distribution(&self, filter: &ReportFilter) -> Result<BloodTypeDistribution, ReportError> {
        filter.validate()?;
        let units = self.snapshot()?;
        Ok(BloodTypeDistribution::build(&units, self.time_source.now(), filter))
    }

    fn inventory(&self, group_by: GroupBy, filter: &ReportFilter) -> Result<InventoryReport, ReportError> {
        filter.validate()?;
        let units = self.snapshot()?;
        Ok(InventoryReport::build(&units, self.time_source.now(), group_by, filter))
    }

    fn wastage(&self, filter: &ReportFilter) -> Result<WastageReport, ReportError> {
        filter.validate()?;
        let now = self.time_source.now();
        let mut period = *filter;
        if period.from.is_none() {
            period.from = Some(period.to.unwrap_or(now) - Duration::days(USAGE_WINDOW_DAYS));
        }
        period.validate()?;
        let units = self.snapshot()?;
        Ok(WastageReport::build(&units, now, &period))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bb_02_unit_lifecycle::{InMemoryUnitRepository, IntakeRequest, UnitLifecycleService};
    use chrono::{TimeZone, Utc};
    use shared_types::{Actor, FixedTimeSource, Timestamp};

    fn t0() -> Timestamp {
        Utc.with_ymd_and_hms(2024, 5, 20, 9, 0, 0).unwrap()
    }

    fn setup() -> (Arc<dyn UnitLifecycleApi>, ReportingService<Arc<FixedTimeSource>>) {
        let clock = Arc::new(FixedTimeSource::new(t0()));
        let lifecycle: Arc<dyn UnitLifecycleApi> =
            Arc::new(UnitLifecycleService::new(InMemoryUnitRepository::new(), clock.clone()));
        let reporting = ReportingService::new(lifecycle.clone(), clock);
        (lifecycle, reporting)
    }

    fn intake(api: &Arc<dyn UnitLifecycleApi>, bt: &str, days_ago: i64) -> BloodUnit {
        api.intake(
            IntakeRequest {
                blood_type: bt.into(),
                quantity_ml: 450,
                collection_date: Some(t0() - Duration::days(days_ago)),
                ..Default::default()
            },
            &Actor::system(),
        )
        .unwrap()
    }

    #[test]
    fn test_dashboard_reflects_status_writes() {
        let (api, reporting) = setup();
        let u = intake(&api, "O-", 40);
        api.update_status(u.id(), "Available", None, &Actor::system()).unwrap();
        intake(&api, "O-", 1);

        let dash = reporting.dashboard().unwrap();
        assert_eq!(dash.total_units, 2);
        assert_eq!(dash.available_units, 1);
        assert_eq!(dash.expiring.critical, 1);
        assert!(dash.critical_shortages.contains(&BloodType::ONegative));
    }

    #[test]
    fn test_wastage_defaults_to_trailing_window() {
        let (api, reporting) = setup();
        let recent = intake(&api, "A+", 10);
        api.update_status(recent.id(), "Discarded", None, &Actor::system()).unwrap();
        intake(&api, "A+", 5);
        let old = intake(&api, "A+", 35);
        api.update_status(old.id(), "Discarded", None, &Actor::system()).unwrap();

        let report = reporting.wastage(&ReportFilter::default()).unwrap();
        assert_eq!(report.processed, 2);
        assert_eq!(report.wastage_rate, 50.0);
    }

    #[test]
    fn test_inverted_period_is_validation_error() {
        let (_, reporting) = setup();
        let filter = ReportFilter {
            from: Some(t0()),
            to: Some(t0() - Duration::days(1)),
            blood_type: None,
        };
        assert!(matches!(
            reporting.inventory(GroupBy::Day, &filter),
            Err(ReportError::Validation(_))
        ));
    }
}
