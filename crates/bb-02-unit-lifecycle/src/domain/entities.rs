//! # Blood Unit Entities
//!
//! The `BloodUnit` document and the records embedded in it.
//!
//! ## Invariants
//!
//! | Invariant | Enforcement |
//! |-----------|-------------|
//! | Status is one of six values | `UnitStatus` enum, private `status` field |
//! | History is append-only | private `status_history`, only [`BloodUnit::apply_status`] pushes |
//! | Expiration set at creation | private field, only moved forward-to-now on `Expired` |
//! | Quantity immutable | private field, getter only |
//! | Terminal statuses are final | [`BloodUnit::ensure_status_open`] before every status write |

use super::errors::LifecycleError;
use chrono::Duration;
use serde::{Deserialize, Serialize};
use shared_types::{
    Actor, BloodType, DonorId, StorageLocation, TemperatureReading, Timestamp, UnitId,
};
use std::fmt;
use std::str::FromStr;

/// Whole blood shelf life from collection to expiration.
pub const SHELF_LIFE_DAYS: i64 = 42;

/// Largest single-bag volume accepted at intake.
pub const MAX_QUANTITY_ML: u32 = 1_000;

/// Storage range for red cells and whole blood, in °C.
pub const UNIT_STORAGE_RANGE_CELSIUS: (f64, f64) = (1.0, 6.0);

/// Shelf life as a duration.
pub fn shelf_life() -> Duration {
    Duration::days(SHELF_LIFE_DAYS)
}

/// Status of a blood unit.
///
/// ```text
///  intake ──→ [Quarantined] ──→ [Available] ⇄ [Reserved]
///                                    │            │
///                                    ├────────────┴──→ [Transfused]
///                                    └──────────────→ [Discarded] / [Expired]
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum UnitStatus {
    Available,
    Reserved,
    Quarantined,
    Discarded,
    Transfused,
    Expired,
}

impl UnitStatus {
    /// The allow-list, in display order.
    pub const ALL: [UnitStatus; 6] = [
        UnitStatus::Available,
        UnitStatus::Reserved,
        UnitStatus::Quarantined,
        UnitStatus::Discarded,
        UnitStatus::Transfused,
        UnitStatus::Expired,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            UnitStatus::Available => "Available",
            UnitStatus::Reserved => "Reserved",
            UnitStatus::Quarantined => "Quarantined",
            UnitStatus::Discarded => "Discarded",
            UnitStatus::Transfused => "Transfused",
            UnitStatus::Expired => "Expired",
        }
    }

    /// `Transfused`, `Discarded` and `Expired` end a unit's life.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            UnitStatus::Transfused | UnitStatus::Discarded | UnitStatus::Expired
        )
    }
}

impl fmt::Display for UnitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a requested status is not on the allow-list.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid status '{0}' (expected one of Available, Reserved, Quarantined, Discarded, Transfused, Expired)")]
pub struct ParseUnitStatusError(pub String);

impl FromStr for UnitStatus {
    type Err = ParseUnitStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UnitStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ParseUnitStatusError(s.to_string()))
    }
}

/// One immutable entry of a unit's status audit trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusHistoryEntry {
    pub status: UnitStatus,
    pub timestamp: Timestamp,
    pub actor: Actor,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// Expiration date that was replaced when this entry marked the unit
    /// `Expired` ahead of its shelf-life expiry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_overridden_from: Option<Timestamp>,
}

/// Who received a unit and where.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransfusionRecord {
    pub recipient_ref: String,
    pub hospital: String,
    pub physician: String,
    pub transfused_at: Timestamp,
    pub recorded_by: Actor,
}

/// A bag of donated blood tracked from intake to its terminal state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BloodUnit {
    id: UnitId,
    blood_type: BloodType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    donor_id: Option<DonorId>,
    collection_date: Timestamp,
    expiration_date: Timestamp,
    quantity_ml: u32,
    status: UnitStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    location: Option<StorageLocation>,
    status_history: Vec<StatusHistoryEntry>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    temperature_readings: Vec<TemperatureReading>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    transfusion: Option<TransfusionRecord>,
    created_at: Timestamp,
    updated_at: Timestamp,
}

/// What a status write changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionOutcome {
    pub previous: UnitStatus,
    pub current: UnitStatus,
    /// The stored expiration date was moved back to "now".
    pub expiration_forced: bool,
}

impl BloodUnit {
    /// Create a freshly collected unit in `Quarantined` status.
    ///
    /// The expiration date is derived from the collection date plus the
    /// fixed shelf life, and the first history entry records the intake.
    pub fn collected(
        id: UnitId,
        blood_type: BloodType,
        quantity_ml: u32,
        collection_date: Timestamp,
        actor: &Actor,
        now: Timestamp,
    ) -> Self {
        Self {
            id,
            blood_type,
            donor_id: None,
            collection_date,
            expiration_date: collection_date + shelf_life(),
            quantity_ml,
            status: UnitStatus::Quarantined,
            location: None,
            status_history: vec![StatusHistoryEntry {
                status: UnitStatus::Quarantined,
                timestamp: now,
                actor: actor.clone(),
                note: Some("Unit received at intake".to_string()),
                expiration_overridden_from: None,
            }],
            temperature_readings: Vec::new(),
            transfusion: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_donor(mut self, donor_id: Option<DonorId>) -> Self {
        self.donor_id = donor_id;
        self
    }

    pub fn with_location(mut self, location: Option<StorageLocation>) -> Self {
        self.location = location;
        self
    }

    /// Replace the default note on the intake entry. Only used before the
    /// unit is first persisted.
    pub fn with_intake_note(mut self, note: Option<String>) -> Self {
        if let (Some(note), Some(first)) = (note, self.status_history.first_mut()) {
            first.note = Some(note);
        }
        self
    }

    pub fn id(&self) -> &UnitId {
        &self.id
    }

    pub fn blood_type(&self) -> BloodType {
        self.blood_type
    }

    pub fn donor_id(&self) -> Option<&DonorId> {
        self.donor_id.as_ref()
    }

    pub fn collection_date(&self) -> Timestamp {
        self.collection_date
    }

    pub fn expiration_date(&self) -> Timestamp {
        self.expiration_date
    }

    pub fn quantity_ml(&self) -> u32 {
        self.quantity_ml
    }

    pub fn status(&self) -> UnitStatus {
        self.status
    }

    pub fn location(&self) -> Option<&StorageLocation> {
        self.location.as_ref()
    }

    /// Facility name, if the unit has a location.
    pub fn facility(&self) -> Option<&str> {
        self.location.as_ref().map(|l| l.facility.as_str())
    }

    pub fn history(&self) -> &[StatusHistoryEntry] {
        &self.status_history
    }

    pub fn temperature_readings(&self) -> &[TemperatureReading] {
        &self.temperature_readings
    }

    pub fn transfusion(&self) -> Option<&TransfusionRecord> {
        self.transfusion.as_ref()
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    /// Timestamp of the most recent history entry with the given status.
    pub fn last_entered(&self, status: UnitStatus) -> Option<Timestamp> {
        self.status_history
            .iter()
            .rev()
            .find(|entry| entry.status == status)
            .map(|entry| entry.timestamp)
    }

    /// Refuse a status write once the unit is `Transfused`, `Discarded` or
    /// `Expired`.
    pub fn ensure_status_open(&self, operation: &'static str) -> Result<(), LifecycleError> {
        if self.status.is_terminal() {
            return Err(LifecycleError::InvalidState {
                id: self.id.clone(),
                status: self.status,
                operation,
            });
        }
        Ok(())
    }

    /// Write a new status and append the matching history entry.
    ///
    /// Marking a unit `Expired` while its expiration date is still in the
    /// future moves the expiration date to `now`; the replaced date is kept on
    /// the history entry. A unit already past its expiration keeps it.
    pub fn apply_status(
        &mut self,
        status: UnitStatus,
        actor: &Actor,
        note: Option<String>,
        now: Timestamp,
    ) -> TransitionOutcome {
        let previous = self.status;
        let mut overridden = None;

        if status == UnitStatus::Expired && self.expiration_date > now {
            overridden = Some(self.expiration_date);
            self.expiration_date = now;
        }

        self.status = status;
        self.updated_at = now;
        self.status_history.push(StatusHistoryEntry {
            status,
            timestamp: now,
            actor: actor.clone(),
            note,
            expiration_overridden_from: overridden,
        });

        TransitionOutcome {
            previous,
            current: status,
            expiration_forced: overridden.is_some(),
        }
    }

    /// Attach a transfusion record. The caller moves the status.
    pub(crate) fn set_transfusion(&mut self, record: TransfusionRecord) {
        self.transfusion = Some(record);
    }

    /// Append a temperature reading and report whether it is an excursion.
    pub fn record_temperature(&mut self, celsius: f64, actor: &Actor, now: Timestamp) -> bool {
        let (min, max) = UNIT_STORAGE_RANGE_CELSIUS;
        let excursion = celsius < min || celsius > max;
        self.temperature_readings.push(TemperatureReading {
            celsius,
            recorded_at: now,
            recorded_by: actor.clone(),
            excursion,
        });
        self.updated_at = now;
        excursion
    }
}
