//! Task repository.

use std::ops::Deref;
use std::sync::Arc;

use super::{AttachmentIngestion, Repository, TrackerResult};
use crate::tracker::{
    domain::{FileRecord, RecordId, Task},
    ports::{AttachmentStore, RecordStore, UploadedFile},
};

/// Generic task operations plus attachment ingestion.
///
/// Dereferences to the generic [`Repository`] for CRUD and filtering.
pub struct TaskRepository<S, F, A>
where
    S: RecordStore<Task>,
    F: RecordStore<FileRecord>,
    A: AttachmentStore,
{
    repository: Repository<Task, S>,
    attachments: AttachmentIngestion<Task, S, F, A>,
}

impl<S, F, A> TaskRepository<S, F, A>
where
    S: RecordStore<Task>,
    F: RecordStore<FileRecord>,
    A: AttachmentStore,
{
    /// Creates the repository over injected store handles.
    #[must_use]
    pub fn new(tasks: Arc<S>, files: Arc<F>, storage: Arc<A>) -> Self {
        Self {
            repository: Repository::new(Arc::clone(&tasks)),
            attachments: AttachmentIngestion::new(tasks, files, storage),
        }
    }

    /// Attaches uploads to a task.
    ///
    /// Returns `false` when the task does not exist.
    ///
    /// # Errors
    ///
    /// See [`AttachmentIngestion::ingest`].
    pub async fn add_files(
        &self,
        task_id: RecordId,
        uploads: Vec<UploadedFile>,
    ) -> TrackerResult<bool> {
        self.attachments.ingest(task_id, uploads).await
    }
}

impl<S, F, A> Deref for TaskRepository<S, F, A>
where
    S: RecordStore<Task>,
    F: RecordStore<FileRecord>,
    A: AttachmentStore,
{
    type Target = Repository<Task, S>;

    fn deref(&self) -> &Self::Target {
        &self.repository
    }
}

impl<S, F, A> Clone for TaskRepository<S, F, A>
where
    S: RecordStore<Task>,
    F: RecordStore<FileRecord>,
    A: AttachmentStore,
{
    fn clone(&self) -> Self {
        Self {
            repository: self.repository.clone(),
            attachments: self.attachments.clone(),
        }
    }
}

impl<S, F, A> std::fmt::Debug for TaskRepository<S, F, A>
where
    S: RecordStore<Task>,
    F: RecordStore<FileRecord>,
    A: AttachmentStore,
{
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("TaskRepository")
            .field("repository", &self.repository)
            .finish_non_exhaustive()
    }
}
