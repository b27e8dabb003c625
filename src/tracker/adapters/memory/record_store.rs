//! In-memory record store for tests and embedded use.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, RwLock};

use crate::tracker::{
    domain::{Entity, FieldFilter, RecordId},
    ports::{RecordChange, RecordStore, StoreError, StoreResult},
};

/// Thread-safe in-memory store for one entity type.
///
/// Identifiers are assigned sequentially from 1 and records are listed in
/// identifier order.
pub struct InMemoryRecordStore<E: Entity> {
    state: Arc<RwLock<InMemoryState<E>>>,
}

struct InMemoryState<E> {
    records: BTreeMap<RecordId, E>,
    last_id: i32,
}

impl<E: Entity> InMemoryRecordStore<E> {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(InMemoryState {
                records: BTreeMap::new(),
                last_id: 0,
            })),
        }
    }
}

impl<E: Entity> Default for InMemoryRecordStore<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Entity> Clone for InMemoryRecordStore<E> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<E: Entity> fmt::Debug for InMemoryRecordStore<E> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("InMemoryRecordStore")
            .field("entity", &E::KIND)
            .finish_non_exhaustive()
    }
}

fn store_failure<E: fmt::Display>(err: &E) -> StoreError {
    StoreError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl<E: Entity> RecordStore<E> for InMemoryRecordStore<E> {
    async fn insert(&self, draft: E::Draft) -> StoreResult<RecordId> {
        let mut state = self.state.write().map_err(|err| store_failure(&err))?;
        let next = state
            .last_id
            .checked_add(1)
            .ok_or_else(|| store_failure(&format!("{} identifier space exhausted", E::KIND)))?;
        let id = RecordId::new(next);
        state.last_id = next;
        state.records.insert(id, E::from_draft(id, draft));
        Ok(id)
    }

    async fn get(&self, id: RecordId) -> StoreResult<Option<E>> {
        let state = self.state.read().map_err(|err| store_failure(&err))?;
        Ok(state.records.get(&id).cloned())
    }

    async fn list(&self) -> StoreResult<Vec<E>> {
        let state = self.state.read().map_err(|err| store_failure(&err))?;
        Ok(state.records.values().cloned().collect())
    }

    async fn list_by_ids(&self, ids: &[RecordId]) -> StoreResult<Vec<E>> {
        let state = self.state.read().map_err(|err| store_failure(&err))?;
        Ok(state
            .records
            .iter()
            .filter(|(id, _)| ids.contains(*id))
            .map(|(_, record)| record.clone())
            .collect())
    }

    async fn list_where(&self, filter: &FieldFilter<E>) -> StoreResult<Vec<E>> {
        let state = self.state.read().map_err(|err| store_failure(&err))?;
        Ok(state
            .records
            .values()
            .filter(|record| filter.matches(record))
            .cloned()
            .collect())
    }

    async fn modify(&self, id: RecordId, change: RecordChange<E>) -> StoreResult<Option<E>> {
        let mut state = self.state.write().map_err(|err| store_failure(&err))?;
        let Some(record) = state.records.get_mut(&id) else {
            return Ok(None);
        };
        let mut changed = record.clone();
        change(&mut changed).map_err(StoreError::Rejected)?;
        record.clone_from(&changed);
        Ok(Some(changed))
    }
}
