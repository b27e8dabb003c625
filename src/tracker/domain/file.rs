//! Uploaded file metadata.

use super::entity::require_text;
use super::{
    Entity, EntityKind, FieldKind, FieldValue, FilterField, NoChanges, RecordId, Validate,
    ValidationError,
};
use camino::{Utf8Component, Utf8Path};
use serde::{Deserialize, Serialize};

/// Metadata recorded once per ingested payload.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewFile {
    /// Original upload file name.
    pub name: String,
    /// Storage path the bytes were written to.
    pub path: String,
    /// Size on disk in bytes.
    pub size: u64,
}

impl Validate for NewFile {
    fn validate(&self) -> Result<(), ValidationError> {
        require_text("name", &self.name)?;
        require_text("path", &self.path)
    }
}

/// Checks that an upload name is a single plain path component.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidFileName`] for empty names, `.` or `..`,
/// and names containing a separator or NUL byte.
pub fn validate_file_name(name: &str) -> Result<(), ValidationError> {
    let has_forbidden_char = name.contains(['/', '\\', '\0']);
    let mut components = Utf8Path::new(name).components();
    let is_single_normal = matches!(
        (components.next(), components.next()),
        (Some(Utf8Component::Normal(_)), None)
    );
    if has_forbidden_char || !is_single_normal || name.trim().is_empty() {
        return Err(ValidationError::InvalidFileName(name.to_owned()));
    }
    Ok(())
}

/// Read schema for an uploaded file.
///
/// File records are immutable; their owners reference them by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileRecord {
    id: RecordId,
    /// Original upload file name.
    pub name: String,
    /// Storage path the bytes were written to.
    pub path: String,
    /// Size on disk in bytes.
    pub size: u64,
}

impl FileRecord {
    /// Returns the store-assigned identifier.
    #[must_use]
    pub const fn id(&self) -> RecordId {
        self.id
    }
}

/// Filterable file fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileField {
    /// `name`
    Name,
}

impl FilterField for FileField {
    const ALL: &'static [Self] = &[Self::Name];

    fn name(self) -> &'static str {
        match self {
            Self::Name => "name",
        }
    }

    fn kind(self) -> FieldKind {
        match self {
            Self::Name => FieldKind::Text,
        }
    }
}

impl Entity for FileRecord {
    type Draft = NewFile;
    type Patch = NoChanges;
    type Field = FileField;

    const KIND: EntityKind = EntityKind::File;

    fn id(&self) -> RecordId {
        self.id
    }

    fn from_draft(id: RecordId, draft: NewFile) -> Self {
        Self {
            id,
            name: draft.name,
            path: draft.path,
            size: draft.size,
        }
    }

    fn apply_patch(&mut self, patch: NoChanges) {
        match patch {}
    }

    fn field_value(&self, field: FileField) -> Option<FieldValue> {
        match field {
            FileField::Name => Some(FieldValue::from(self.name.as_str())),
        }
    }
}
