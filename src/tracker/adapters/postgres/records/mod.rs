//! Row models and table mappings for each tracker entity.

mod file;
mod history;
mod project;
mod task;
mod user;

use serde_json::Value;

use crate::tracker::{
    domain::{EntityKind, FilterField, RecordId},
    ports::{StoreError, StoreResult},
};

/// Encodes an identifier list column.
fn ids_to_json(ids: Option<&[RecordId]>) -> StoreResult<Option<Value>> {
    ids.map(serde_json::to_value)
        .transpose()
        .map_err(StoreError::persistence)
}

/// Decodes an identifier list column.
fn ids_from_json(value: Option<Value>) -> StoreResult<Option<Vec<RecordId>>> {
    value
        .map(serde_json::from_value::<Vec<RecordId>>)
        .transpose()
        .map_err(StoreError::invalid_persisted_data)
}

fn unsupported<F: FilterField>(entity: EntityKind, field: F) -> StoreError {
    StoreError::UnsupportedFilter {
        entity,
        field: field.name(),
    }
}
