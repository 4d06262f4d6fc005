//! # Domain Errors

use bb_02_unit_lifecycle::LifecycleError;
use shared_types::FieldErrors;
use thiserror::Error;

/// Errors that can occur while building reports.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReportError {
    /// Malformed report parameters.
    #[error("validation failed: {0}")]
    Validation(FieldErrors),

    /// Reading units failed.
    #[error("unit source failed: {0}")]
    Source(#[from] LifecycleError),
}

impl From<FieldErrors> for ReportError {
    fn from(errors: FieldErrors) -> Self {
        ReportError::Validation(errors)
    }
}
