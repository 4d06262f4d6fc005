//! # Test Fixtures
//!
//! A fully wired in-memory service, built the same way the runtime builds
//! it, on a clock the test controls.

use bank_runtime::{RuntimeConfig, SubsystemContainer};
use bb_02_unit_lifecycle::{BloodUnit, IntakeRequest, UnitLifecycleApi};
use chrono::{Duration, TimeZone, Utc};
use shared_types::{Actor, FixedTimeSource, Timestamp, UnitId, UserId};
use std::sync::Arc;

/// Reference instant for every fixture.
pub fn t0() -> Timestamp {
    Utc.with_ymd_and_hms(2024, 6, 3, 8, 0, 0)
        .single()
        .unwrap_or_else(Utc::now)
}

pub fn technician() -> Actor {
    Actor::new(UserId::from("US-tech"), "Lab Technician")
}

pub struct TestBank {
    pub clock: Arc<FixedTimeSource>,
    pub container: SubsystemContainer,
}

impl TestBank {
    pub fn new() -> Self {
        let clock = Arc::new(FixedTimeSource::new(t0()));
        let container = SubsystemContainer::with_time_source(&RuntimeConfig::default(), clock.clone())
            .unwrap_or_else(|e| panic!("in-memory wiring failed: {e:#}"));
        Self { clock, container }
    }

    pub fn units(&self) -> &dyn UnitLifecycleApi {
        self.container.units.as_ref()
    }

    pub fn now(&self) -> Timestamp {
        use shared_types::TimeSource;
        self.clock.now()
    }

    /// Take in a unit collected `days_ago` days before now.
    pub fn collect(&self, blood_type: &str, days_ago: i64) -> BloodUnit {
        self.units()
            .intake(
                IntakeRequest {
                    blood_type: blood_type.to_string(),
                    quantity_ml: 450,
                    collection_date: Some(self.now() - Duration::days(days_ago)),
                    donor_id: None,
                    location: None,
                    notes: None,
                },
                &technician(),
            )
            .unwrap_or_else(|e| panic!("intake failed: {e}"))
    }

    /// Take in a unit and release it from quarantine.
    pub fn collect_available(&self, blood_type: &str, days_ago: i64) -> UnitId {
        let id = self.collect(blood_type, days_ago).id().clone();
        self.set_status(&id, "Available");
        id
    }

    pub fn set_status(&self, id: &UnitId, status: &str) -> BloodUnit {
        self.units()
            .update_status(id, status, None, &technician())
            .unwrap_or_else(|e| panic!("status write failed: {e}"))
    }
}

impl Default for TestBank {
    fn default() -> Self {
        Self::new()
    }
}
