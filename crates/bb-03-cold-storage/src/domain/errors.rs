//! # Domain Errors

use shared_types::{FieldErrors, StorageUnitId, StoreError};
use thiserror::Error;

/// Errors that can occur in cold storage monitoring.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ColdStorageError {
    #[error("storage unit not found: {0}")]
    StorageUnitNotFound(StorageUnitId),

    #[error("validation failed: {0}")]
    Validation(FieldErrors),

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl From<FieldErrors> for ColdStorageError {
    fn from(errors: FieldErrors) -> Self {
        ColdStorageError::Validation(errors)
    }
}
