//! Task change-history schemas.

use super::entity::{
    require_date_order, require_optional_reference, require_optional_text, require_reference,
    require_references,
};
use super::{
    Entity, EntityKind, FieldKind, FieldValue, FilterField, HasAttachments, RecordId, Validate,
    ValidationError,
};
use serde::{Deserialize, Serialize};

/// Create schema for a history entry.
///
/// Each `new_*` field snapshots the value a task field took in the recorded
/// change; unset snapshots mean the field did not change.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewHistoryElement {
    /// Time of the change, Unix seconds.
    pub timestamp: i64,
    /// Free-text description of the change.
    #[serde(default)]
    pub text: Option<String>,
    /// Acting user.
    pub by_user: RecordId,
    /// New planned start.
    #[serde(default)]
    pub new_date_start: Option<i64>,
    /// New planned end.
    #[serde(default)]
    pub new_date_end: Option<i64>,
    /// New progress code.
    #[serde(default)]
    pub new_progress: Option<i16>,
    /// New status code.
    #[serde(default)]
    pub new_status: Option<i16>,
    /// New priority code.
    #[serde(default)]
    pub new_priority: Option<i16>,
    /// New executing user.
    #[serde(default)]
    pub new_executor: Option<RecordId>,
    /// New related-task list.
    #[serde(default)]
    pub new_related_tasks: Option<Vec<RecordId>>,
}

impl NewHistoryElement {
    /// Creates an entry with no field snapshots.
    #[must_use]
    pub fn new(timestamp: i64, by_user: RecordId) -> Self {
        Self {
            timestamp,
            text: None,
            by_user,
            new_date_start: None,
            new_date_end: None,
            new_progress: None,
            new_status: None,
            new_priority: None,
            new_executor: None,
            new_related_tasks: None,
        }
    }

    /// Sets the change description.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Records a status change.
    #[must_use]
    pub const fn with_new_status(mut self, status: i16) -> Self {
        self.new_status = Some(status);
        self
    }

    /// Records an executor change.
    #[must_use]
    pub const fn with_new_executor(mut self, executor: RecordId) -> Self {
        self.new_executor = Some(executor);
        self
    }
}

impl Validate for NewHistoryElement {
    fn validate(&self) -> Result<(), ValidationError> {
        require_reference("by_user", self.by_user)?;
        require_optional_reference("new_executor", self.new_executor)?;
        require_references("new_related_tasks", self.new_related_tasks.as_deref())?;
        require_date_order(self.new_date_start, self.new_date_end)
    }
}

/// Partial-update schema for a history entry. Only the description may be
/// amended; the recorded snapshots are immutable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HistoryPatch {
    /// Replacement description.
    pub text: Option<String>,
}

impl HistoryPatch {
    /// Creates a patch replacing the description.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
        }
    }
}

impl Validate for HistoryPatch {
    fn validate(&self) -> Result<(), ValidationError> {
        require_optional_text("text", self.text.as_deref())
    }
}

/// Read schema for a history entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryElement {
    id: RecordId,
    /// Time of the change, Unix seconds.
    pub timestamp: i64,
    /// Free-text description of the change.
    pub text: Option<String>,
    /// Acting user.
    pub by_user: RecordId,
    /// New planned start.
    pub new_date_start: Option<i64>,
    /// New planned end.
    pub new_date_end: Option<i64>,
    /// New progress code.
    pub new_progress: Option<i16>,
    /// New status code.
    pub new_status: Option<i16>,
    /// New priority code.
    pub new_priority: Option<i16>,
    /// New executing user.
    pub new_executor: Option<RecordId>,
    /// New related-task list.
    pub new_related_tasks: Option<Vec<RecordId>>,
    files: Option<Vec<RecordId>>,
}

impl HistoryElement {
    /// Returns the store-assigned identifier.
    #[must_use]
    pub const fn id(&self) -> RecordId {
        self.id
    }

    /// Returns the attached file ids in attachment order.
    #[must_use]
    pub fn files(&self) -> Option<&[RecordId]> {
        self.files.as_deref()
    }

    /// Restores the attached file ids of a persisted entry.
    pub(crate) fn with_files(mut self, files: Option<Vec<RecordId>>) -> Self {
        self.files = files;
        self
    }
}

/// Filterable history fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HistoryField {
    /// `by_user`
    ByUser,
    /// `new_executor`
    NewExecutor,
    /// `new_status`
    NewStatus,
}

impl FilterField for HistoryField {
    const ALL: &'static [Self] = &[Self::ByUser, Self::NewExecutor, Self::NewStatus];

    fn name(self) -> &'static str {
        match self {
            Self::ByUser => "by_user",
            Self::NewExecutor => "new_executor",
            Self::NewStatus => "new_status",
        }
    }

    fn kind(self) -> FieldKind {
        FieldKind::Int
    }
}

impl Entity for HistoryElement {
    type Draft = NewHistoryElement;
    type Patch = HistoryPatch;
    type Field = HistoryField;

    const KIND: EntityKind = EntityKind::HistoryElement;

    fn id(&self) -> RecordId {
        self.id
    }

    fn from_draft(id: RecordId, draft: NewHistoryElement) -> Self {
        let NewHistoryElement {
            timestamp,
            text,
            by_user,
            new_date_start,
            new_date_end,
            new_progress,
            new_status,
            new_priority,
            new_executor,
            new_related_tasks,
        } = draft;
        Self {
            id,
            timestamp,
            text,
            by_user,
            new_date_start,
            new_date_end,
            new_progress,
            new_status,
            new_priority,
            new_executor,
            new_related_tasks,
            files: None,
        }
    }

    fn apply_patch(&mut self, patch: HistoryPatch) {
        if patch.text.is_some() {
            self.text = patch.text;
        }
    }

    fn field_value(&self, field: HistoryField) -> Option<FieldValue> {
        match field {
            HistoryField::ByUser => Some(FieldValue::Int(self.by_user.value())),
            HistoryField::NewExecutor => self
                .new_executor
                .map(|executor| FieldValue::Int(executor.value())),
            HistoryField::NewStatus => self.new_status.map(FieldValue::from),
        }
    }
}

impl HasAttachments for HistoryElement {
    fn files(&self) -> Option<&[RecordId]> {
        self.files.as_deref()
    }

    fn append_files(&mut self, file_ids: Vec<RecordId>) {
        self.files.get_or_insert_with(Vec::new).extend(file_ids);
    }
}
