//! History element repository.

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;
use tracing::debug;

use super::{AttachmentIngestion, Repository, TrackerResult};
use crate::tracker::{
    domain::{FieldFilter, FieldValue, FileRecord, HistoryElement, HistoryField, RecordId},
    ports::{AttachmentStore, RecordStore, UploadedFile},
};

/// Generic history operations plus batch lookup, author lookup and
/// attachment ingestion.
///
/// Dereferences to the generic [`Repository`] for CRUD and filtering.
pub struct HistoryRepository<S, F, A>
where
    S: RecordStore<HistoryElement>,
    F: RecordStore<FileRecord>,
    A: AttachmentStore,
{
    repository: Repository<HistoryElement, S>,
    attachments: AttachmentIngestion<HistoryElement, S, F, A>,
}

impl<S, F, A> HistoryRepository<S, F, A>
where
    S: RecordStore<HistoryElement>,
    F: RecordStore<FileRecord>,
    A: AttachmentStore,
{
    /// Creates the repository over injected store handles.
    #[must_use]
    pub fn new(history: Arc<S>, files: Arc<F>, storage: Arc<A>) -> Self {
        Self {
            repository: Repository::new(Arc::clone(&history)),
            attachments: AttachmentIngestion::new(history, files, storage),
        }
    }

    /// Returns the elements whose ids appear in `ids`.
    ///
    /// Unknown ids are skipped, so the result may be shorter than `ids`.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Store`](super::TrackerError::Store) when the
    /// query fails.
    pub async fn find_by_id_array(&self, ids: &[RecordId]) -> TrackerResult<Vec<HistoryElement>> {
        let elements = self.repository.store().list_by_ids(ids).await?;
        debug!(
            requested = ids.len(),
            found = elements.len(),
            "history batch lookup"
        );
        Ok(elements)
    }

    /// Returns the elements authored by `user_id`.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Store`](super::TrackerError::Store) when the
    /// query fails.
    pub async fn get_by_user_id(&self, user_id: RecordId) -> TrackerResult<Vec<HistoryElement>> {
        let filter = FieldFilter::new(HistoryField::ByUser, FieldValue::Int(user_id.value()))?;
        self.repository.list_by_filter(&filter).await
    }

    /// Attaches uploads to a history element.
    ///
    /// Returns `false` when the element does not exist.
    ///
    /// # Errors
    ///
    /// See [`AttachmentIngestion::ingest`].
    pub async fn add_files(
        &self,
        history_id: RecordId,
        uploads: Vec<UploadedFile>,
    ) -> TrackerResult<bool> {
        self.attachments.ingest(history_id, uploads).await
    }
}

impl<S, F, A> Deref for HistoryRepository<S, F, A>
where
    S: RecordStore<HistoryElement>,
    F: RecordStore<FileRecord>,
    A: AttachmentStore,
{
    type Target = Repository<HistoryElement, S>;

    fn deref(&self) -> &Self::Target {
        &self.repository
    }
}

impl<S, F, A> Clone for HistoryRepository<S, F, A>
where
    S: RecordStore<HistoryElement>,
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

impl<S, F, A> fmt::Debug for HistoryRepository<S, F, A>
where
    S: RecordStore<HistoryElement>,
    F: RecordStore<FileRecord>,
    A: AttachmentStore,
{
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("HistoryRepository")
            .field("repository", &self.repository)
            .finish_non_exhaustive()
    }
}
