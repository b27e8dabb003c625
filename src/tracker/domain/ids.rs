//! Identifier type shared by every tracker record.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Store-assigned identifier for a tracker record.
///
/// Cross-entity references (task executors, history authors, file lists)
/// use the same type. The store does not enforce referential integrity
/// between them, so a reference may point at a record that never existed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(i32);

impl RecordId {
    /// Wraps a raw identifier value.
    #[must_use]
    pub const fn new(value: i32) -> Self {
        Self(value)
    }

    /// Returns the raw identifier value.
    #[must_use]
    pub const fn value(self) -> i32 {
        self.0
    }

    /// Returns `true` when a store could have assigned this identifier.
    #[must_use]
    pub const fn is_assignable(self) -> bool {
        self.0 > 0
    }
}

impl From<i32> for RecordId {
    fn from(value: i32) -> Self {
        Self(value)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}
