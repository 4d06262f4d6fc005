//! # Domain Errors
//!
//! Error types for the unit lifecycle subsystem.

use super::entities::UnitStatus;
use shared_types::{FieldErrors, StoreError, UnitId};
use thiserror::Error;

/// Errors that can occur during lifecycle operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LifecycleError {
    /// No unit with this identifier.
    #[error("blood unit not found: {0}")]
    UnitNotFound(UnitId),

    /// Request failed validation before anything was persisted.
    #[error("validation failed: {0}")]
    Validation(FieldErrors),

    /// The unit exists but its current status forbids the operation.
    #[error("unit {id} is {status}; cannot {operation}")]
    InvalidState {
        id: UnitId,
        status: UnitStatus,
        operation: &'static str,
    },

    /// A linked record refused the operation (e.g. donor not yet eligible).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Document store failure.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl LifecycleError {
    pub fn field(field: &str, message: impl Into<String>) -> Self {
        LifecycleError::Validation(FieldErrors::single(field, message))
    }
}

impl From<FieldErrors> for LifecycleError {
    fn from(errors: FieldErrors) -> Self {
        LifecycleError::Validation(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = LifecycleError::InvalidState {
            id: UnitId::from("BU-9"),
            status: UnitStatus::Discarded,
            operation: "record transfusion",
        };
        assert_eq!(err.to_string(), "unit BU-9 is Discarded; cannot record transfusion");
    }

    #[test]
    fn test_field_helper() {
        let err = LifecycleError::field("status", "bad");
        match err {
            LifecycleError::Validation(fields) => assert_eq!(fields.get("status"), Some("bad")),
            other => panic!("unexpected {other:?}"),
        }
    }
}
