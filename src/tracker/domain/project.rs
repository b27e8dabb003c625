//! Project schemas.

use super::entity::{require_optional_text, require_references, require_text};
use super::{
    Entity, EntityKind, FieldKind, FieldValue, FilterField, RecordId, Validate, ValidationError,
};
use serde::{Deserialize, Serialize};

/// Create schema for a project.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewProject {
    /// Project name.
    pub name: String,
    /// Free-text description.
    pub description: String,
    /// Task ids grouped under the project.
    #[serde(default)]
    pub tasks: Option<Vec<RecordId>>,
}

impl Validate for NewProject {
    fn validate(&self) -> Result<(), ValidationError> {
        require_text("name", &self.name)?;
        require_references("tasks", self.tasks.as_deref())
    }
}

/// Partial-update schema for a project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ProjectPatch {
    /// New name.
    pub name: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// Replacement task list.
    pub tasks: Option<Vec<RecordId>>,
}

impl Validate for ProjectPatch {
    fn validate(&self) -> Result<(), ValidationError> {
        require_optional_text("name", self.name.as_deref())?;
        require_references("tasks", self.tasks.as_deref())
    }
}

/// Read schema for a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Project {
    id: RecordId,
    /// Project name.
    pub name: String,
    /// Free-text description.
    pub description: String,
    /// Task ids grouped under the project.
    pub tasks: Option<Vec<RecordId>>,
}

impl Project {
    /// Returns the store-assigned identifier.
    #[must_use]
    pub const fn id(&self) -> RecordId {
        self.id
    }
}

/// Filterable project fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProjectField {
    /// `name`
    Name,
}

impl FilterField for ProjectField {
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

impl Entity for Project {
    type Draft = NewProject;
    type Patch = ProjectPatch;
    type Field = ProjectField;

    const KIND: EntityKind = EntityKind::Project;

    fn id(&self) -> RecordId {
        self.id
    }

    fn from_draft(id: RecordId, draft: NewProject) -> Self {
        Self {
            id,
            name: draft.name,
            description: draft.description,
            tasks: draft.tasks,
        }
    }

    fn apply_patch(&mut self, patch: ProjectPatch) {
        if let Some(value) = patch.name {
            self.name = value;
        }
        if let Some(value) = patch.description {
            self.description = value;
        }
        if patch.tasks.is_some() {
            self.tasks = patch.tasks;
        }
    }

    fn field_value(&self, field: ProjectField) -> Option<FieldValue> {
        match field {
            ProjectField::Name => Some(FieldValue::from(self.name.as_str())),
        }
    }
}
