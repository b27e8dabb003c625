//! Compile-time description of a persisted tracker entity.
//!
//! Each entity binds together its read schema (the implementing type), its
//! create schema ([`Entity::Draft`]), its partial-update schema
//! ([`Entity::Patch`]) and the allow-list of fields callers may filter on
//! ([`Entity::Field`]). The generic repository is instantiated once per
//! entity over these associated types.

use super::{FieldValue, FilterField, RecordId, ValidationError};
use serde::Serialize;
use std::fmt;

/// The five record types held by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// Tracker users.
    User,
    /// Projects grouping tasks.
    Project,
    /// Tasks.
    Task,
    /// Task change-history entries.
    HistoryElement,
    /// Uploaded file metadata.
    File,
}

impl EntityKind {
    /// Returns the canonical snake-case name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Project => "project",
            Self::Task => "task",
            Self::HistoryElement => "history_element",
            Self::File => "file",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Schema-level validation performed before any store access.
pub trait Validate {
    /// Checks the payload's field constraints.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] describing the first violated constraint.
    fn validate(&self) -> Result<(), ValidationError>;
}

/// A persisted record type and its schemas.
pub trait Entity: Clone + fmt::Debug + Send + Sync + 'static {
    /// Create schema.
    type Draft: Validate + fmt::Debug + Send + Sync + 'static;
    /// Partial-update schema; every field is optional.
    type Patch: Validate + fmt::Debug + Send + 'static;
    /// Allow-listed filter fields.
    type Field: FilterField;

    /// Record type tag used in logs and errors.
    const KIND: EntityKind;

    /// Returns the store-assigned identifier.
    fn id(&self) -> RecordId;

    /// Builds the read schema for a freshly inserted draft.
    fn from_draft(id: RecordId, draft: Self::Draft) -> Self;

    /// Merges every explicitly set field of `patch` into the record.
    ///
    /// Absent fields leave the stored value untouched.
    fn apply_patch(&mut self, patch: Self::Patch);

    /// Checks constraints spanning several fields of a merged record.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] when the record is inconsistent.
    fn check(&self) -> Result<(), ValidationError> {
        Ok(())
    }

    /// Returns the current value of a filterable field, or `None` when the
    /// field is unset on this record.
    fn field_value(&self, field: Self::Field) -> Option<FieldValue>;
}

/// Entities that own an append-only list of attached file ids.
///
/// The list keeps insertion order and is neither deduplicated nor checked
/// against the file table.
pub trait HasAttachments: Entity {
    /// Returns the attached file ids, if any were ever recorded.
    fn files(&self) -> Option<&[RecordId]>;

    /// Appends newly ingested file ids after the existing ones, initializing
    /// the list when it is absent.
    fn append_files(&mut self, file_ids: Vec<RecordId>);
}

/// Patch type for entities that cannot be updated after creation.
///
/// The type is uninhabited, so no update call can ever be constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoChanges {}

impl Validate for NoChanges {
    fn validate(&self) -> Result<(), ValidationError> {
        match *self {}
    }
}

pub(crate) fn require_text(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::EmptyField { field });
    }
    Ok(())
}

pub(crate) fn require_optional_text(
    field: &'static str,
    value: Option<&str>,
) -> Result<(), ValidationError> {
    value.map_or(Ok(()), |text| require_text(field, text))
}

pub(crate) fn require_reference(field: &'static str, id: RecordId) -> Result<(), ValidationError> {
    if !id.is_assignable() {
        return Err(ValidationError::InvalidReference { field, id });
    }
    Ok(())
}

pub(crate) fn require_optional_reference(
    field: &'static str,
    id: Option<RecordId>,
) -> Result<(), ValidationError> {
    id.map_or(Ok(()), |value| require_reference(field, value))
}

pub(crate) fn require_references(
    field: &'static str,
    ids: Option<&[RecordId]>,
) -> Result<(), ValidationError> {
    ids.unwrap_or_default()
        .iter()
        .try_for_each(|id| require_reference(field, *id))
}

pub(crate) fn require_date_order(
    start: Option<i64>,
    end: Option<i64>,
) -> Result<(), ValidationError> {
    match (start, end) {
        (Some(from), Some(to)) if to < from => Err(ValidationError::InvertedDateRange {
            start: from,
            end: to,
        }),
        _ => Ok(()),
    }
}
