//! Generic `PostgreSQL` record store.

use async_trait::async_trait;
use diesel::prelude::*;
use std::fmt;
use std::marker::PhantomData;

use super::blocking_helpers::{PgPool, run_blocking};
use crate::tracker::{
    domain::{Entity, FieldFilter, RecordId},
    ports::{RecordChange, RecordStore, StoreError, StoreResult},
};

/// Table mapping for an entity persisted in `PostgreSQL`.
///
/// Every method runs on a connection borrowed by the caller, so several calls
/// can share one transaction. Listing methods return rows ordered by id.
pub trait PgEntity: Entity + Sized {
    /// Inserts a draft and returns the generated identifier.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the insert fails.
    fn insert(connection: &mut PgConnection, draft: Self::Draft) -> StoreResult<RecordId>;

    /// Loads one record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the query fails or the row cannot be decoded.
    fn load(connection: &mut PgConnection, id: RecordId) -> StoreResult<Option<Self>>;

    /// Loads one record and locks its row until the transaction ends.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the query fails or the row cannot be decoded.
    fn lock(connection: &mut PgConnection, id: RecordId) -> StoreResult<Option<Self>>;

    /// Loads every record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the query fails or a row cannot be decoded.
    fn load_all(connection: &mut PgConnection) -> StoreResult<Vec<Self>>;

    /// Loads the records whose ids appear in `ids`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the query fails or a row cannot be decoded.
    fn load_many(connection: &mut PgConnection, ids: &[i32]) -> StoreResult<Vec<Self>>;

    /// Loads the records matching an equality filter.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::UnsupportedFilter`] when the filter has no column
    /// mapping, or [`StoreError`] when the query fails.
    fn load_matching(
        connection: &mut PgConnection,
        filter: &FieldFilter<Self>,
    ) -> StoreResult<Vec<Self>>;

    /// Overwrites every mutable column of the record's row.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the update fails.
    fn save(connection: &mut PgConnection, record: &Self) -> StoreResult<()>;
}

/// `PostgreSQL`-backed store for one entity type.
///
/// A rejected [`RecordStore::modify`] change rolls its transaction back.
pub struct PostgresRecordStore<E> {
    pool: PgPool,
    entity: PhantomData<fn() -> E>,
}

impl<E: PgEntity> PostgresRecordStore<E> {
    /// Creates a store over a connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self {
            pool,
            entity: PhantomData,
        }
    }
}

impl<E> Clone for PostgresRecordStore<E> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            entity: PhantomData,
        }
    }
}

impl<E: Entity> fmt::Debug for PostgresRecordStore<E> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("PostgresRecordStore")
            .field("entity", &E::KIND)
            .field("pool", &self.pool)
            .finish()
    }
}

#[async_trait]
impl<E: PgEntity> RecordStore<E> for PostgresRecordStore<E> {
    async fn insert(&self, draft: E::Draft) -> StoreResult<RecordId> {
        run_blocking(&self.pool, move |connection| E::insert(connection, draft)).await
    }

    async fn get(&self, id: RecordId) -> StoreResult<Option<E>> {
        run_blocking(&self.pool, move |connection| E::load(connection, id)).await
    }

    async fn list(&self) -> StoreResult<Vec<E>> {
        run_blocking(&self.pool, E::load_all).await
    }

    async fn list_by_ids(&self, ids: &[RecordId]) -> StoreResult<Vec<E>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let raw_ids: Vec<i32> = ids.iter().map(|id| id.value()).collect();
        run_blocking(&self.pool, move |connection| {
            E::load_many(connection, &raw_ids)
        })
        .await
    }

    async fn list_where(&self, filter: &FieldFilter<E>) -> StoreResult<Vec<E>> {
        let owned_filter = filter.clone();
        run_blocking(&self.pool, move |connection| {
            E::load_matching(connection, &owned_filter)
        })
        .await
    }

    async fn modify(&self, id: RecordId, change: RecordChange<E>) -> StoreResult<Option<E>> {
        run_blocking(&self.pool, move |connection| {
            connection.transaction::<_, StoreError, _>(|transaction| {
                let Some(mut record) = E::lock(transaction, id)? else {
                    return Ok(None);
                };
                change(&mut record).map_err(StoreError::Rejected)?;
                E::save(transaction, &record)?;
                Ok(Some(record))
            })
        })
        .await
    }
}
