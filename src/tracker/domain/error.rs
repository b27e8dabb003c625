//! Validation errors raised before any store access.

use super::{EntityKind, FieldKind, RecordId};
use thiserror::Error;

/// Errors returned when a payload violates its schema constraints.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required text field is empty after trimming.
    #[error("{field} must not be empty")]
    EmptyField {
        /// Name of the offending field.
        field: &'static str,
    },

    /// A reference field holds an id no store could have assigned.
    #[error("{field} must reference a positive record id, got {id}")]
    InvalidReference {
        /// Name of the offending field.
        field: &'static str,
        /// Rejected identifier.
        id: RecordId,
    },

    /// The end timestamp precedes the start timestamp.
    #[error("date_end {end} precedes date_start {start}")]
    InvertedDateRange {
        /// Start timestamp in Unix seconds.
        start: i64,
        /// End timestamp in Unix seconds.
        end: i64,
    },

    /// An uploaded file name is not a single plain path component.
    #[error("invalid attachment file name '{0}'")]
    InvalidFileName(String),

    /// The filter field is not on the entity's allow-list.
    #[error("unknown filter field '{field}' for {entity}")]
    UnknownFilterField {
        /// Entity the filter was requested for.
        entity: EntityKind,
        /// Requested field name.
        field: String,
    },

    /// The filter value does not match the field's type.
    #[error("filter field '{field}' expects a {expected} value, got {actual}")]
    FilterValueMismatch {
        /// Filter field name.
        field: &'static str,
        /// Value kind the field stores.
        expected: FieldKind,
        /// Value kind supplied by the caller.
        actual: FieldKind,
    },
}
