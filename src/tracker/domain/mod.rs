//! Domain model for the task tracker.
//!
//! Every persisted record type is described by the [`Entity`] trait, which
//! binds its read schema to its create and partial-update schemas and to the
//! allow-list of fields it may be filtered on. Schemas carry their own
//! validation; nothing in this module touches storage.

mod entity;
mod error;
mod file;
mod filter;
mod history;
mod ids;
mod project;
mod task;
mod user;

pub use entity::{Entity, EntityKind, HasAttachments, NoChanges, Validate};
pub use error::ValidationError;
pub use file::{FileField, FileRecord, NewFile, validate_file_name};
pub use filter::{FieldFilter, FieldKind, FieldValue, FilterField};
pub use history::{HistoryElement, HistoryField, HistoryPatch, NewHistoryElement};
pub use ids::RecordId;
pub use project::{NewProject, Project, ProjectField, ProjectPatch};
pub use task::{DEFAULT_CODE, NewTask, Task, TaskField, TaskPatch};
pub use user::{NewUser, User, UserField, UserPatch};
