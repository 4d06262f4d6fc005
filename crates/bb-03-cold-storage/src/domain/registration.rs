//! # Registration
//!
//! Validation of a new storage unit.

use super::entities::StorageKind;
use super::errors::ColdStorageError;
use shared_types::FieldErrors;

/// Largest capacity accepted for one storage unit.
pub const MAX_CAPACITY_UNITS: i64 = 10_000;

/// A storage unit as submitted at the boundary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StorageRegistration {
    pub name: String,
    pub facility: String,
    pub kind: String,
    pub capacity_units: i64,
}

/// A registration that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedStorageRegistration {
    pub name: String,
    pub facility: String,
    pub kind: StorageKind,
    pub capacity_units: u32,
}

impl StorageRegistration {
    pub fn validate(self) -> Result<ValidatedStorageRegistration, ColdStorageError> {
        let mut errors = FieldErrors::new();

        let name = self.name.trim().to_string();
        if name.is_empty() {
            errors.add("name", "is required");
        }
        let facility = self.facility.trim().to_string();
        if facility.is_empty() {
            errors.add("facility", "is required");
        }
        let kind = match self.kind.parse::<StorageKind>() {
            Ok(kind) => Some(kind),
            Err(e) => {
                errors.add("kind", e.to_string());
                None
            }
        };
        if !(1..=MAX_CAPACITY_UNITS).contains(&self.capacity_units) {
            errors.add(
                "capacityUnits",
                format!("must be between 1 and {}", MAX_CAPACITY_UNITS),
            );
        }

        match kind {
            Some(kind) if errors.is_empty() => Ok(ValidatedStorageRegistration {
                name,
                facility,
                kind,
                capacity_units: self.capacity_units as u32,
            }),
            _ => Err(ColdStorageError::Validation(errors)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_registration() {
        let v = StorageRegistration {
            name: "Freezer 2".into(),
            facility: "Central".into(),
            kind: "Freezer".into(),
            capacity_units: 120,
        }
        .validate()
        .unwrap();
        assert_eq!(v.kind, StorageKind::Freezer);
    }

    #[test]
    fn test_all_fields_reported() {
        match StorageRegistration::default().validate() {
            Err(ColdStorageError::Validation(fields)) => {
                assert_eq!(fields.len(), 4);
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
