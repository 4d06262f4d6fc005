//! Error conversions from subsystem and extractor errors.
//!
//! | Source | Status |
//! |--------|--------|
//! | `Validation` | 400 with fields |
//! | `*NotFound` | 404 |
//! | `InvalidState`, `Conflict`, `NotEligible` | 409 |
//! | `Store` | 500, logged |

use crate::domain::{ApiError, UserError};
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use bb_01_donor_registry::DonorError;
use bb_02_unit_lifecycle::LifecycleError;
use bb_03_cold_storage::ColdStorageError;
use bb_04_reporting::ReportError;
use shared_types::StoreError;

fn store_failure(error: &StoreError) -> ApiError {
    tracing::error!(error = %error, "[bb-05] Document store failure");
    ApiError::internal()
}

impl From<LifecycleError> for ApiError {
    fn from(e: LifecycleError) -> Self {
        match e {
            LifecycleError::UnitNotFound(id) => ApiError::not_found(format!("blood unit {}", id)),
            LifecycleError::Validation(fields) => ApiError::validation(fields),
            e @ LifecycleError::InvalidState { .. } => ApiError::conflict(e.to_string()),
            LifecycleError::Conflict(details) => ApiError::conflict(details),
            LifecycleError::Store(e) => store_failure(&e),
        }
    }
}

impl From<DonorError> for ApiError {
    fn from(e: DonorError) -> Self {
        match e {
            DonorError::DonorNotFound(id) => ApiError::not_found(format!("donor {}", id)),
            DonorError::Validation(fields) => ApiError::validation(fields),
            e @ DonorError::NotEligible { .. } => ApiError::conflict(e.to_string()),
            DonorError::Store(e) => store_failure(&e),
        }
    }
}

impl From<ColdStorageError> for ApiError {
    fn from(e: ColdStorageError) -> Self {
        match e {
            ColdStorageError::StorageUnitNotFound(id) => {
                ApiError::not_found(format!("storage unit {}", id))
            }
            ColdStorageError::Validation(fields) => ApiError::validation(fields),
            ColdStorageError::Store(e) => store_failure(&e),
        }
    }
}

impl From<ReportError> for ApiError {
    fn from(e: ReportError) -> Self {
        match e {
            ReportError::Validation(fields) => ApiError::validation(fields),
            ReportError::Source(e) => e.into(),
        }
    }
}

impl From<UserError> for ApiError {
    fn from(e: UserError) -> Self {
        match e {
            UserError::UserNotFound(id) => ApiError::not_found(format!("user {}", id)),
            UserError::Validation(fields) => ApiError::validation(fields),
            UserError::DuplicateToken => ApiError::conflict("token already issued"),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            return ApiError::payload_too_large(rejection.body_text());
        }
        ApiError::bad_request(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::bad_request(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::bad_request(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bb_02_unit_lifecycle::UnitStatus;
    use shared_types::{DonorId, FieldErrors, UnitId};

    #[test]
    fn test_lifecycle_mapping() {
        let not_found: ApiError = LifecycleError::UnitNotFound(UnitId::from("BU-1")).into();
        assert_eq!(not_found.status, StatusCode::NOT_FOUND);

        let invalid: ApiError = LifecycleError::InvalidState {
            id: UnitId::from("BU-1"),
            status: UnitStatus::Quarantined,
            operation: "record transfusion",
        }
        .into();
        assert_eq!(invalid.status, StatusCode::CONFLICT);

        let validation: ApiError = LifecycleError::field("status", "unknown").into();
        assert_eq!(validation.status, StatusCode::BAD_REQUEST);
        assert!(validation.fields.unwrap().contains("status"));
    }

    #[test]
    fn test_store_failure_is_generic_500() {
        let err: ApiError = LifecycleError::Store(StoreError::Database("disk full".into())).into();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!err.message.contains("disk full"));
    }

    #[test]
    fn test_not_eligible_is_conflict() {
        let err: ApiError = DonorError::NotEligible {
            id: DonorId::from("DN-1"),
            reason: "donated recently".into(),
            next_eligible_date: None,
        }
        .into();
        assert_eq!(err.status, StatusCode::CONFLICT);
        assert!(err.message.contains("donated recently"));
    }

    #[test]
    fn test_report_source_unwraps() {
        let err: ApiError = ReportError::Source(LifecycleError::Store(StoreError::Conflict(
            "x".into(),
        )))
        .into();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);

        let err: ApiError = ReportError::Validation(FieldErrors::single("from", "bad")).into();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }
}
