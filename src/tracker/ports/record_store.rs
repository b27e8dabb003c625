//! Persistence port shared by every tracker entity.

use crate::tracker::domain::{Entity, EntityKind, FieldFilter, RecordId, ValidationError};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for record store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// In-place mutation applied by [`RecordStore::modify`].
///
/// An `Err` discards the mutation and nothing is persisted.
pub type RecordChange<E> = Box<dyn FnOnce(&mut E) -> Result<(), ValidationError> + Send>;

/// Record persistence contract for one entity type.
///
/// Every call runs within a single scoped session of the underlying store
/// and releases it before returning.
#[async_trait]
pub trait RecordStore<E: Entity>: Send + Sync {
    /// Persists a new record and returns its store-assigned identifier.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Persistence`] when the store rejects the insert.
    async fn insert(&self, draft: E::Draft) -> StoreResult<RecordId>;

    /// Fetches a record by identifier.
    ///
    /// Returns `None` when no record matches.
    async fn get(&self, id: RecordId) -> StoreResult<Option<E>>;

    /// Fetches every record in store-native order.
    async fn list(&self) -> StoreResult<Vec<E>>;

    /// Fetches the records whose identifiers appear in `ids`.
    ///
    /// Identifiers without a record are skipped.
    async fn list_by_ids(&self, ids: &[RecordId]) -> StoreResult<Vec<E>>;

    /// Fetches the records matching an equality filter.
    async fn list_where(&self, filter: &FieldFilter<E>) -> StoreResult<Vec<E>>;

    /// Loads a record, applies `change` and persists the result within one
    /// session.
    ///
    /// Returns the updated record, or `None` without calling `change` when the
    /// record does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Rejected`] when `change` fails, leaving the stored
    /// record untouched.
    async fn modify(&self, id: RecordId, change: RecordChange<E>) -> StoreResult<Option<E>>;
}

/// Errors returned by record store implementations.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// The store cannot evaluate the filter.
    #[error("unsupported filter on {entity}.{field}")]
    UnsupportedFilter {
        /// Entity being filtered.
        entity: EntityKind,
        /// Filter field name.
        field: &'static str,
    },

    /// The change passed to [`RecordStore::modify`] rejected the record.
    #[error("change rejected: {0}")]
    Rejected(ValidationError),

    /// Persisted data could not be reconstructed into domain types.
    #[error("invalid persisted data: {0}")]
    InvalidPersistedData(Arc<dyn std::error::Error + Send + Sync>),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl StoreError {
    /// Wraps persisted-data decoding failures.
    pub fn invalid_persisted_data(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::InvalidPersistedData(Arc::new(err))
    }

    /// Wraps a persistence-layer failure.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
