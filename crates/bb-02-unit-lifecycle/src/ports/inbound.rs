//! # Inbound Ports (Driving Ports)
//!
//! The primary API for the unit lifecycle subsystem.

use crate::domain::{
    BatchStatusOutcome, BloodUnit, IntakeRequest, LifecycleError, TransfusionInput, UnitStatus,
};
use serde::{Deserialize, Serialize};
use shared_types::{Actor, BloodType, Timestamp, UnitId};

/// Criteria for listing units. Empty criteria match every unit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitFilter {
    pub blood_type: Option<BloodType>,
    pub status: Option<UnitStatus>,
    /// Collection date lower bound, inclusive.
    pub from: Option<Timestamp>,
    /// Collection date upper bound, inclusive.
    pub to: Option<Timestamp>,
    pub facility: Option<String>,
}

impl UnitFilter {
    pub fn matches(&self, unit: &BloodUnit) -> bool {
        self.blood_type.map_or(true, |bt| unit.blood_type() == bt)
            && self.status.map_or(true, |s| unit.status() == s)
            && self.from.map_or(true, |from| unit.collection_date() >= from)
            && self.to.map_or(true, |to| unit.collection_date() <= to)
            && self
                .facility
                .as_deref()
                .map_or(true, |f| unit.facility() == Some(f))
    }
}

/// Result of recording a unit temperature reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemperatureOutcome {
    pub unit: BloodUnit,
    pub excursion: bool,
}

/// Primary API for the unit lifecycle subsystem.
///
/// Every write is atomic per document. Status writes validate the requested
/// status against the allow-list before any document is read.
pub trait UnitLifecycleApi: Send + Sync {
    /// Create a unit in `Quarantined` status.
    ///
    /// ## Errors
    ///
    /// - `Validation`: any intake field is malformed or out of range
    /// - `Conflict`: the linked donor refused the donation
    fn intake(&self, request: IntakeRequest, actor: &Actor) -> Result<BloodUnit, LifecycleError>;

    /// Fetch one unit with its full history.
    fn get_unit(&self, id: &UnitId) -> Result<BloodUnit, LifecycleError>;

    /// Units matching `filter`, newest collection first.
    fn list_units(&self, filter: &UnitFilter) -> Result<Vec<BloodUnit>, LifecycleError>;

    /// Every stored unit. Used by the reporter.
    fn all_units(&self) -> Result<Vec<BloodUnit>, LifecycleError>;

    /// Write a new status and append a history entry.
    ///
    /// ## Errors
    ///
    /// - `Validation`: `status` is not one of the six allowed values
    /// - `UnitNotFound`: no unit with this identifier
    /// - `InvalidState`: unit is already `Transfused`, `Discarded` or `Expired`
    fn update_status(
        &self,
        id: &UnitId,
        status: &str,
        note: Option<String>,
        actor: &Actor,
    ) -> Result<BloodUnit, LifecycleError>;

    /// Apply one status write to many units.
    ///
    /// Missing identifiers, units in a terminal status and per-unit store
    /// failures are reported, not raised. Duplicate identifiers are applied
    /// once.
    fn batch_update_status(
        &self,
        ids: &[UnitId],
        status: &str,
        note: Option<String>,
        actor: &Actor,
    ) -> Result<BatchStatusOutcome, LifecycleError>;

    /// Attach a transfusion record and move the unit to `Transfused`.
    ///
    /// ## Errors
    ///
    /// - `InvalidState`: unit is not `Available` or `Reserved`
    fn record_transfusion(
        &self,
        id: &UnitId,
        input: TransfusionInput,
        actor: &Actor,
    ) -> Result<BloodUnit, LifecycleError>;

    /// Append a probe reading to the unit.
    fn record_temperature(
        &self,
        id: &UnitId,
        celsius: f64,
        actor: &Actor,
    ) -> Result<TemperatureOutcome, LifecycleError>;
}
