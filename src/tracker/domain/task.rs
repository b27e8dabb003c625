//! Task schemas.

use super::entity::{
    require_date_order, require_optional_reference, require_optional_text, require_reference,
    require_references, require_text,
};
use super::{
    Entity, EntityKind, FieldKind, FieldValue, FilterField, HasAttachments, RecordId, Validate,
    ValidationError,
};
use serde::{Deserialize, Serialize};

/// Progress, status and priority code assigned when a draft omits it.
pub const DEFAULT_CODE: i16 = 1;

const fn default_code() -> i16 {
    DEFAULT_CODE
}

/// Create schema for a task.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewTask {
    /// Task name.
    pub name: String,
    /// Free-text description.
    pub description: String,
    /// Planned start, Unix seconds.
    #[serde(default)]
    pub date_start: Option<i64>,
    /// Planned end, Unix seconds.
    #[serde(default)]
    pub date_end: Option<i64>,
    /// Progress code.
    #[serde(default = "default_code")]
    pub progress: i16,
    /// Status code.
    #[serde(default = "default_code")]
    pub status: i16,
    /// Priority code.
    #[serde(default = "default_code")]
    pub priority: i16,
    /// Creating user.
    pub created_by: RecordId,
    /// Administering user.
    pub admin: RecordId,
    /// Executing user.
    pub executor: RecordId,
    /// Last modification, Unix seconds.
    #[serde(default)]
    pub last_modified_time: Option<i64>,
}

impl NewTask {
    /// Creates a draft with default codes and no dates.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        created_by: RecordId,
        executor: RecordId,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            date_start: None,
            date_end: None,
            progress: DEFAULT_CODE,
            status: DEFAULT_CODE,
            priority: DEFAULT_CODE,
            created_by,
            admin: created_by,
            executor,
            last_modified_time: None,
        }
    }

    /// Sets the planned date range.
    #[must_use]
    pub const fn with_dates(mut self, date_start: Option<i64>, date_end: Option<i64>) -> Self {
        self.date_start = date_start;
        self.date_end = date_end;
        self
    }

    /// Sets the administering user.
    #[must_use]
    pub const fn with_admin(mut self, admin: RecordId) -> Self {
        self.admin = admin;
        self
    }

    /// Sets the progress, status and priority codes.
    #[must_use]
    pub const fn with_codes(mut self, progress: i16, status: i16, priority: i16) -> Self {
        self.progress = progress;
        self.status = status;
        self.priority = priority;
        self
    }
}

impl Validate for NewTask {
    fn validate(&self) -> Result<(), ValidationError> {
        require_text("name", &self.name)?;
        require_reference("created_by", self.created_by)?;
        require_reference("admin", self.admin)?;
        require_reference("executor", self.executor)?;
        require_date_order(self.date_start, self.date_end)
    }
}

/// Partial-update schema for a task.
///
/// Attached files are not patchable; the file list only grows through
/// attachment ingestion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TaskPatch {
    /// New name.
    pub name: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New planned start.
    pub date_start: Option<i64>,
    /// New planned end.
    pub date_end: Option<i64>,
    /// New progress code.
    pub progress: Option<i16>,
    /// New status code.
    pub status: Option<i16>,
    /// New priority code.
    pub priority: Option<i16>,
    /// New administering user.
    pub admin: Option<RecordId>,
    /// New executing user.
    pub executor: Option<RecordId>,
    /// New last modification time.
    pub last_modified_time: Option<i64>,
    /// Replacement related-task list.
    pub related_tasks: Option<Vec<RecordId>>,
    /// Replacement history-entry list.
    pub history: Option<Vec<RecordId>>,
}

impl Validate for TaskPatch {
    fn validate(&self) -> Result<(), ValidationError> {
        require_optional_text("name", self.name.as_deref())?;
        require_optional_reference("admin", self.admin)?;
        require_optional_reference("executor", self.executor)?;
        require_references("related_tasks", self.related_tasks.as_deref())?;
        require_references("history", self.history.as_deref())?;
        require_date_order(self.date_start, self.date_end)
    }
}

/// Read schema for a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Task {
    id: RecordId,
    /// Task name.
    pub name: String,
    /// Free-text description.
    pub description: String,
    /// Planned start, Unix seconds.
    pub date_start: Option<i64>,
    /// Planned end, Unix seconds.
    pub date_end: Option<i64>,
    /// Progress code.
    pub progress: i16,
    /// Status code.
    pub status: i16,
    /// Priority code.
    pub priority: i16,
    /// Creating user.
    pub created_by: RecordId,
    /// Administering user.
    pub admin: RecordId,
    /// Executing user.
    pub executor: RecordId,
    /// Last modification, Unix seconds.
    pub last_modified_time: Option<i64>,
    /// History-entry ids.
    pub history: Option<Vec<RecordId>>,
    /// Related task ids.
    pub related_tasks: Option<Vec<RecordId>>,
    files: Option<Vec<RecordId>>,
}

impl Task {
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

    /// Restores the id-list columns of a persisted task.
    pub(crate) fn with_links(
        mut self,
        history: Option<Vec<RecordId>>,
        related_tasks: Option<Vec<RecordId>>,
        files: Option<Vec<RecordId>>,
    ) -> Self {
        self.history = history;
        self.related_tasks = related_tasks;
        self.files = files;
        self
    }
}

/// Filterable task fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskField {
    /// `created_by`
    CreatedBy,
    /// `admin`
    Admin,
    /// `executor`
    Executor,
    /// `status`
    Status,
    /// `priority`
    Priority,
    /// `progress`
    Progress,
}

impl FilterField for TaskField {
    const ALL: &'static [Self] = &[
        Self::CreatedBy,
        Self::Admin,
        Self::Executor,
        Self::Status,
        Self::Priority,
        Self::Progress,
    ];

    fn name(self) -> &'static str {
        match self {
            Self::CreatedBy => "created_by",
            Self::Admin => "admin",
            Self::Executor => "executor",
            Self::Status => "status",
            Self::Priority => "priority",
            Self::Progress => "progress",
        }
    }

    fn kind(self) -> FieldKind {
        FieldKind::Int
    }
}

impl Entity for Task {
    type Draft = NewTask;
    type Patch = TaskPatch;
    type Field = TaskField;

    const KIND: EntityKind = EntityKind::Task;

    fn id(&self) -> RecordId {
        self.id
    }

    fn from_draft(id: RecordId, draft: NewTask) -> Self {
        let NewTask {
            name,
            description,
            date_start,
            date_end,
            progress,
            status,
            priority,
            created_by,
            admin,
            executor,
            last_modified_time,
        } = draft;
        Self {
            id,
            name,
            description,
            date_start,
            date_end,
            progress,
            status,
            priority,
            created_by,
            admin,
            executor,
            last_modified_time,
            history: None,
            related_tasks: None,
            files: None,
        }
    }

    fn apply_patch(&mut self, patch: TaskPatch) {
        let TaskPatch {
            name,
            description,
            date_start,
            date_end,
            progress,
            status,
            priority,
            admin,
            executor,
            last_modified_time,
            related_tasks,
            history,
        } = patch;
        if let Some(value) = name {
            self.name = value;
        }
        if let Some(value) = description {
            self.description = value;
        }
        if date_start.is_some() {
            self.date_start = date_start;
        }
        if date_end.is_some() {
            self.date_end = date_end;
        }
        if let Some(value) = progress {
            self.progress = value;
        }
        if let Some(value) = status {
            self.status = value;
        }
        if let Some(value) = priority {
            self.priority = value;
        }
        if let Some(value) = admin {
            self.admin = value;
        }
        if let Some(value) = executor {
            self.executor = value;
        }
        if last_modified_time.is_some() {
            self.last_modified_time = last_modified_time;
        }
        if related_tasks.is_some() {
            self.related_tasks = related_tasks;
        }
        if history.is_some() {
            self.history = history;
        }
    }

    fn check(&self) -> Result<(), ValidationError> {
        require_date_order(self.date_start, self.date_end)
    }

    fn field_value(&self, field: TaskField) -> Option<FieldValue> {
        Some(match field {
            TaskField::CreatedBy => FieldValue::Int(self.created_by.value()),
            TaskField::Admin => FieldValue::Int(self.admin.value()),
            TaskField::Executor => FieldValue::Int(self.executor.value()),
            TaskField::Status => FieldValue::from(self.status),
            TaskField::Priority => FieldValue::from(self.priority),
            TaskField::Progress => FieldValue::from(self.progress),
        })
    }
}

impl HasAttachments for Task {
    fn files(&self) -> Option<&[RecordId]> {
        self.files.as_deref()
    }

    fn append_files(&mut self, file_ids: Vec<RecordId>) {
        self.files.get_or_insert_with(Vec::new).extend(file_ids);
    }
}
