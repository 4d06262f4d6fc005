//! # Domain Errors

use shared_types::{FieldErrors, StoreError, DonorId, Timestamp};
use thiserror::Error;

/// Errors that can occur in the donor registry.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DonorError {
    #[error("donor not found: {0}")]
    DonorNotFound(DonorId),

    #[error("validation failed: {0}")]
    Validation(FieldErrors),

    /// The donor exists but may not donate now.
    #[error("donor {id} is not eligible: {reason}")]
    NotEligible {
        id: DonorId,
        reason: String,
        next_eligible_date: Option<Timestamp>,
    },

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl DonorError {
    pub fn field(field: &str, message: impl Into<String>) -> Self {
        DonorError::Validation(FieldErrors::single(field, message))
    }
}

impl From<FieldErrors> for DonorError {
    fn from(errors: FieldErrors) -> Self {
        DonorError::Validation(errors)
    }
}
