//! Allow-listed equality filters over entity fields.
//!
//! Filtering by an arbitrary caller-supplied attribute name is replaced by a
//! closed set of fields per entity. A [`FieldFilter`] can only be built for a
//! field on that set and with a value of the field's type.

use super::{Entity, ValidationError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Type of the value stored in a filterable field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Integer codes, timestamps and record references.
    Int,
    /// Free text.
    Text,
    /// Boolean flags.
    Bool,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(match self {
            Self::Int => "integer",
            Self::Text => "text",
            Self::Bool => "boolean",
        })
    }
}

/// Value compared for equality against a filterable field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Integer value.
    Int(i32),
    /// Text value.
    Text(String),
    /// Boolean value.
    Bool(bool),
}

impl FieldValue {
    /// Returns the kind of this value.
    #[must_use]
    pub const fn kind(&self) -> FieldKind {
        match self {
            Self::Int(_) => FieldKind::Int,
            Self::Text(_) => FieldKind::Text,
            Self::Bool(_) => FieldKind::Bool,
        }
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        Self::Int(value)
    }
}

impl From<i16> for FieldValue {
    fn from(value: i16) -> Self {
        Self::Int(i32::from(value))
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// Closed enumeration of the fields an entity may be filtered on.
pub trait FilterField: Copy + Eq + fmt::Debug + Send + Sync + 'static {
    /// Every allow-listed field.
    const ALL: &'static [Self];

    /// Wire name of the field.
    fn name(self) -> &'static str;

    /// Type of value stored in the field.
    fn kind(self) -> FieldKind;

    /// Resolves a wire name against the allow-list.
    #[must_use]
    fn parse(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|field| field.name() == name)
    }
}

/// Type-checked equality filter on one allow-listed field of `E`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldFilter<E: Entity> {
    field: E::Field,
    value: FieldValue,
}

impl<E: Entity> FieldFilter<E> {
    /// Creates a filter, checking that the value matches the field type.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::FilterValueMismatch`] when the value kind
    /// differs from the field kind.
    pub fn new(field: E::Field, value: FieldValue) -> Result<Self, ValidationError> {
        if field.kind() != value.kind() {
            return Err(ValidationError::FilterValueMismatch {
                field: field.name(),
                expected: field.kind(),
                actual: value.kind(),
            });
        }
        Ok(Self { field, value })
    }

    /// Resolves a wire field name and builds the filter.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::UnknownFilterField`] when the name is not on
    /// the entity's allow-list, or [`ValidationError::FilterValueMismatch`]
    /// when the value has the wrong type.
    pub fn parse(field_name: &str, value: FieldValue) -> Result<Self, ValidationError> {
        let field = <E::Field as FilterField>::parse(field_name).ok_or_else(|| {
            ValidationError::UnknownFilterField {
                entity: E::KIND,
                field: field_name.to_owned(),
            }
        })?;
        Self::new(field, value)
    }

    /// Returns the filtered field.
    #[must_use]
    pub const fn field(&self) -> E::Field {
        self.field
    }

    /// Returns the value compared against.
    #[must_use]
    pub const fn value(&self) -> &FieldValue {
        &self.value
    }

    /// Returns `true` when `record` holds the filter value in the field.
    #[must_use]
    pub fn matches(&self, record: &E) -> bool {
        record
            .field_value(self.field)
            .is_some_and(|current| current == self.value)
    }
}
