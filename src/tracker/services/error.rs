//! Service-level error type shared by the tracker repositories.

use thiserror::Error;

use crate::tracker::{
    domain::ValidationError,
    ports::{AttachmentStoreError, StoreError},
};

/// Errors surfaced by repository operations.
///
/// A missing record is never an error; lookups return `Option` and mutations
/// return `bool`.
#[derive(Debug, Clone, Error)]
pub enum TrackerError {
    /// The payload failed validation before any store access.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The record store failed.
    #[error(transparent)]
    Store(StoreError),

    /// Writing attachment bytes failed.
    #[error(transparent)]
    Io(#[from] AttachmentStoreError),
}

/// Result type for repository operations.
pub type TrackerResult<T> = Result<T, TrackerError>;

impl From<StoreError> for TrackerError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Rejected(invalid) => Self::Validation(invalid),
            other => Self::Store(other),
        }
    }
}
