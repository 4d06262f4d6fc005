//! # Intake
//!
//! Validation of a donation before it becomes a `BloodUnit`. Every failing
//! field is reported at once.

use super::entities::{shelf_life, BloodUnit, MAX_QUANTITY_ML};
use super::errors::LifecycleError;
use super::transition::normalize_note;
use shared_types::{Actor, BloodType, DonorId, FieldErrors, LocationInput, StorageLocation, Timestamp, UnitId};

/// A donation as submitted at the boundary.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IntakeRequest {
    pub blood_type: String,
    pub quantity_ml: i64,
    /// Defaults to "now" when absent.
    pub collection_date: Option<Timestamp>,
    pub donor_id: Option<DonorId>,
    pub location: Option<LocationInput>,
    pub notes: Option<String>,
}

/// An intake that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedIntake {
    pub blood_type: BloodType,
    pub quantity_ml: u32,
    pub collection_date: Timestamp,
    pub donor_id: Option<DonorId>,
    pub location: Option<StorageLocation>,
    pub note: Option<String>,
}

impl IntakeRequest {
    /// Check every field against `now`.
    ///
    /// - blood type must be one of the eight ABO/Rh values
    /// - quantity must be `1..=1000` ml
    /// - collection date may not be in the future, nor so old that the unit
    ///   would already be past its shelf life
    pub fn validate(self, now: Timestamp) -> Result<ValidatedIntake, LifecycleError> {
        let mut errors = FieldErrors::new();

        let blood_type = match self.blood_type.parse::<BloodType>() {
            Ok(bt) => Some(bt),
            Err(e) => {
                errors.add("bloodType", e.to_string());
                None
            }
        };

        let quantity_ml = if self.quantity_ml < 1 || self.quantity_ml > i64::from(MAX_QUANTITY_ML) {
            errors.add(
                "quantityMl",
                format!("must be between 1 and {} millilitres", MAX_QUANTITY_ML),
            );
            0
        } else {
            self.quantity_ml as u32
        };

        let collection_date = self.collection_date.unwrap_or(now);
        if collection_date > now {
            errors.add("collectionDate", "cannot be in the future");
        } else if collection_date + shelf_life() <= now {
            errors.add("collectionDate", "unit would already be past its shelf life");
        }

        let donor_id = self
            .donor_id
            .map(|id| DonorId(id.0.trim().to_string()))
            .filter(|id| !id.0.is_empty());

        let location = match self.location.map(LocationInput::into_location).transpose() {
            Ok(location) => location.flatten(),
            Err(e) => {
                errors.extend(e);
                None
            }
        };

        let note = match normalize_note(self.notes) {
            Ok(note) => note,
            Err(e) => {
                errors.extend(e);
                None
            }
        };

        match blood_type {
            Some(blood_type) if errors.is_empty() => Ok(ValidatedIntake {
                blood_type,
                quantity_ml,
                collection_date,
                donor_id,
                location,
                note,
            }),
            _ => Err(LifecycleError::Validation(errors)),
        }
    }
}

impl ValidatedIntake {
    /// Build the new `Quarantined` unit.
    pub fn into_unit(self, id: UnitId, actor: &Actor, now: Timestamp) -> BloodUnit {
        BloodUnit::collected(id, self.blood_type, self.quantity_ml, self.collection_date, actor, now)
            .with_donor(self.donor_id)
            .with_location(self.location)
            .with_intake_note(self.note)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::UnitStatus;
    use chrono::{Duration, TimeZone, Utc};

    fn now() -> Timestamp {
        Utc.with_ymd_and_hms(2024, 7, 2, 10, 0, 0).unwrap()
    }

    fn request() -> IntakeRequest {
        IntakeRequest {
            blood_type: "O-".into(),
            quantity_ml: 450,
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_intake_builds_quarantined_unit() {
        let intake = request().validate(now()).unwrap();
        let unit = intake.into_unit(UnitId::from("BU-1"), &Actor::system(), now());
        assert_eq!(unit.status(), UnitStatus::Quarantined);
        assert_eq!(unit.blood_type(), BloodType::ONegative);
        assert_eq!(unit.expiration_date(), now() + Duration::days(42));
        assert!(unit.location().is_none());
    }

    #[test]
    fn test_all_failures_reported_together() {
        let req = IntakeRequest {
            blood_type: "C+".into(),
            quantity_ml: 0,
            collection_date: Some(now() + Duration::days(1)),
            ..Default::default()
        };
        match req.validate(now()) {
            Err(LifecycleError::Validation(fields)) => {
                assert!(fields.contains("bloodType"));
                assert!(fields.contains("quantityMl"));
                assert!(fields.contains("collectionDate"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_quantity_upper_bound() {
        let mut req = request();
        req.quantity_ml = 1_000;
        assert!(req.clone().validate(now()).is_ok());
        req.quantity_ml = 1_001;
        assert!(req.validate(now()).is_err());
    }

    #[test]
    fn test_stale_collection_date_rejected() {
        let mut req = request();
        req.collection_date = Some(now() - Duration::days(42));
        assert!(req.validate(now()).is_err());
    }

    #[test]
    fn test_location_and_note_carried() {
        let mut req = request();
        req.location = Some(LocationInput {
            facility: Some("North Depot".into()),
            shelf: Some("R2".into()),
            ..Default::default()
        });
        req.notes = Some("mobile drive".into());
        let unit = req
            .validate(now())
            .unwrap()
            .into_unit(UnitId::from("BU-2"), &Actor::system(), now());
        assert_eq!(unit.facility(), Some("North Depot"));
        assert_eq!(unit.history()[0].note.as_deref(), Some("mobile drive"));
    }

    #[test]
    fn test_partial_location_rejected() {
        let mut req = request();
        req.location = Some(LocationInput {
            position: Some("7".into()),
            ..Default::default()
        });
        match req.validate(now()) {
            Err(LifecycleError::Validation(fields)) => assert!(fields.contains("location.facility")),
            other => panic!("unexpected {other:?}"),
        }
    }
}
