//! `PostgreSQL` adapters for tracker persistence.
//!
//! One generic [`PostgresRecordStore`] serves every entity; the per-entity
//! column mappings live in `records`.

mod blocking_helpers;
mod record_store;
mod records;
mod schema;

pub use blocking_helpers::PgPool;
pub use record_store::{PgEntity, PostgresRecordStore};
