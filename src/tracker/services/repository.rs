//! Generic repository over any tracker entity.
//!
//! [`Repository`] validates payloads, delegates to a [`RecordStore`] and
//! reports absence as `None`/`false` rather than as an error.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::{TrackerError, TrackerResult};
use crate::tracker::{
    domain::{
        Entity, FieldFilter, FieldValue, FileRecord, Project, RecordId, User, Validate,
        ValidationError,
    },
    ports::RecordStore,
};

/// CRUD and filtering operations for one entity type.
pub struct Repository<E, S>
where
    E: Entity,
    S: RecordStore<E>,
{
    store: Arc<S>,
    entity: PhantomData<fn() -> E>,
}

/// Repository for users.
pub type UserRepository<S> = Repository<User, S>;

/// Repository for projects.
pub type ProjectRepository<S> = Repository<Project, S>;

/// Repository for file metadata.
pub type FileRepository<S> = Repository<FileRecord, S>;

impl<E, S> Repository<E, S>
where
    E: Entity,
    S: RecordStore<E>,
{
    /// Creates a repository over an injected store handle.
    #[must_use]
    pub const fn new(store: Arc<S>) -> Self {
        Self {
            store,
            entity: PhantomData,
        }
    }

    /// Returns the underlying store handle.
    #[must_use]
    pub const fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Validates and persists a new record, returning its identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Validation`] when the draft is invalid, or
    /// [`TrackerError::Store`] when the insert fails.
    pub async fn add_one(&self, draft: E::Draft) -> TrackerResult<RecordId> {
        draft.validate()?;
        let id = self.store.insert(draft).await?;
        info!(entity = %E::KIND, %id, "record created");
        Ok(id)
    }

    /// Returns every record in store order.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Store`] when the query fails.
    pub async fn find_all(&self) -> TrackerResult<Vec<E>> {
        let records = self.store.list().await?;
        debug!(entity = %E::KIND, count = records.len(), "listed records");
        Ok(records)
    }

    /// Returns the record with the given identifier, or `None`.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Store`] when the query fails.
    pub async fn get_by_id(&self, id: RecordId) -> TrackerResult<Option<E>> {
        Ok(self.store.get(id).await?)
    }

    /// Merges the set fields of `patch` into the record.
    ///
    /// Returns `false` without touching the store contents when no record has
    /// the identifier. The merged record is checked before it is saved.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Validation`] when the patch or the merged record
    /// is invalid, or [`TrackerError::Store`] when loading or saving fails.
    pub async fn update_one(&self, id: RecordId, patch: E::Patch) -> TrackerResult<bool> {
        patch.validate()?;
        let updated = self
            .store
            .modify(
                id,
                Box::new(move |record: &mut E| {
                    record.apply_patch(patch);
                    record.check()
                }),
            )
            .await?;
        if updated.is_none() {
            debug!(entity = %E::KIND, %id, "update target not found");
        }
        Ok(updated.is_some())
    }

    /// Returns the records matching a typed filter.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Store`] when the query fails.
    pub async fn list_by_filter(&self, filter: &FieldFilter<E>) -> TrackerResult<Vec<E>> {
        Ok(self.store.list_where(filter).await?)
    }

    /// Filters by a field named at runtime.
    ///
    /// Returns `Ok(None)` when `field_name` is not on the entity's filter
    /// allow-list.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Validation`] when the value type does not match
    /// the field, or [`TrackerError::Store`] when the query fails.
    pub async fn get_list_by_field(
        &self,
        field_name: &str,
        value: impl Into<FieldValue>,
    ) -> TrackerResult<Option<Vec<E>>> {
        match FieldFilter::<E>::parse(field_name, value.into()) {
            Ok(filter) => self.list_by_filter(&filter).await.map(Some),
            Err(ValidationError::UnknownFilterField { entity, field }) => {
                warn!(%entity, %field, "rejected filter on unknown field");
                Ok(None)
            }
            Err(err) => Err(TrackerError::Validation(err)),
        }
    }
}

impl<E, S> Clone for Repository<E, S>
where
    E: Entity,
    S: RecordStore<E>,
{
    fn clone(&self) -> Self {
        Self::new(Arc::clone(&self.store))
    }
}

impl<E, S> fmt::Debug for Repository<E, S>
where
    E: Entity,
    S: RecordStore<E>,
{
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Repository")
            .field("entity", &E::KIND)
            .finish_non_exhaustive()
    }
}
