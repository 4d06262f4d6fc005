//! # Core Domain Entities
//!
//! Entities shared by more than one subsystem.
//!
//! - **Actor**: the authenticated user recorded on audit entries
//! - **StorageLocation**: where a blood unit physically sits
//! - **TemperatureReading**: one probe reading, for a unit or a storage unit

use crate::errors::FieldErrors;
use crate::ids::{StorageUnitId, UserId};
use crate::time::Timestamp;
use serde::{Deserialize, Serialize};

/// The user performing an operation, as recorded in audit trails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Actor {
    pub user_id: UserId,
    pub name: String,
}

impl Actor {
    pub fn new(user_id: impl Into<UserId>, name: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            name: name.into(),
        }
    }

    /// Actor used for changes made by the service itself.
    pub fn system() -> Self {
        Self::new("system", "System")
    }
}

/// Physical location of a blood unit.
///
/// A unit either has a location (with at least a facility) or it has none;
/// the partially-filled shapes a form can submit are resolved once by
/// [`LocationInput::into_location`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageLocation {
    pub facility: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_unit: Option<StorageUnitId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shelf: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
}

/// Location fields as submitted by a client. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationInput {
    pub facility: Option<String>,
    pub storage_unit: Option<String>,
    pub shelf: Option<String>,
    pub position: Option<String>,
}

impl LocationInput {
    /// Resolve the submitted fields into an explicit optional location.
    ///
    /// - every field blank → `Ok(None)`
    /// - facility present → `Ok(Some(..))`
    /// - other fields present without a facility → field error on `location.facility`
    pub fn into_location(self) -> Result<Option<StorageLocation>, FieldErrors> {
        let facility = non_blank(self.facility);
        let storage_unit = non_blank(self.storage_unit).map(StorageUnitId);
        let shelf = non_blank(self.shelf);
        let position = non_blank(self.position);

        match facility {
            Some(facility) => Ok(Some(StorageLocation {
                facility,
                storage_unit,
                shelf,
                position,
            })),
            None if storage_unit.is_none() && shelf.is_none() && position.is_none() => Ok(None),
            None => Err(FieldErrors::single(
                "location.facility",
                "facility is required when any location field is set",
            )),
        }
    }
}

/// A single temperature measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemperatureReading {
    pub celsius: f64,
    pub recorded_at: Timestamp,
    pub recorded_by: Actor,
    /// Reading fell outside the acceptable range at the time it was taken.
    pub excursion: bool,
}

/// Plausible probe range. Values outside it are rejected as input errors.
pub const PLAUSIBLE_CELSIUS: (f64, f64) = (-90.0, 60.0);

/// Validate a submitted probe value.
pub fn validate_celsius(field: &str, celsius: f64) -> Result<(), FieldErrors> {
    if !celsius.is_finite() || celsius < PLAUSIBLE_CELSIUS.0 || celsius > PLAUSIBLE_CELSIUS.1 {
        return Err(FieldErrors::single(
            field,
            format!(
                "must be between {} and {} degrees Celsius",
                PLAUSIBLE_CELSIUS.0, PLAUSIBLE_CELSIUS.1
            ),
        ));
    }
    Ok(())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
