//! Attachment ingestion for entities that own a file list.
//!
//! Each upload is written under `<segment>/<filename>`, where the segment is
//! eight random alphanumeric characters. Bytes are written before the file
//! record is inserted, and the owner's list is only extended once every
//! upload in the batch succeeded. A failure part-way leaves earlier bytes
//! and file records in place.

use camino::Utf8PathBuf;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::TrackerResult;
use crate::tracker::{
    domain::{FileRecord, HasAttachments, NewFile, RecordId, Validate, validate_file_name},
    ports::{AttachmentStore, RecordStore, UploadedFile},
};

/// Length of the random directory segment placed before each file name.
pub const SEGMENT_LEN: usize = 8;

/// Returns a fresh random path segment of [`SEGMENT_LEN`] alphanumeric
/// characters.
#[must_use]
pub fn random_segment() -> String {
    let mut segment = Uuid::new_v4().simple().to_string();
    segment.truncate(SEGMENT_LEN);
    segment
}

/// Writes uploads, records their metadata and links them to an owner `O`.
pub struct AttachmentIngestion<O, S, F, A>
where
    O: HasAttachments,
    S: RecordStore<O>,
    F: RecordStore<FileRecord>,
    A: AttachmentStore,
{
    owners: Arc<S>,
    files: Arc<F>,
    storage: Arc<A>,
    owner: PhantomData<fn() -> O>,
}

impl<O, S, F, A> AttachmentIngestion<O, S, F, A>
where
    O: HasAttachments,
    S: RecordStore<O>,
    F: RecordStore<FileRecord>,
    A: AttachmentStore,
{
    /// Creates an ingestion pipeline over injected store handles.
    #[must_use]
    pub const fn new(owners: Arc<S>, files: Arc<F>, storage: Arc<A>) -> Self {
        Self {
            owners,
            files,
            storage,
            owner: PhantomData,
        }
    }

    /// Ingests `uploads` and appends the new file ids to the owner's list.
    ///
    /// Returns `false` when the owner does not exist; nothing is written in
    /// that case.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Validation`](super::TrackerError::Validation)
    /// when an upload name is not a plain file name,
    /// [`TrackerError::Io`](super::TrackerError::Io) when bytes cannot be
    /// written, or [`TrackerError::Store`](super::TrackerError::Store) when a
    /// record cannot be read or saved.
    pub async fn ingest(
        &self,
        owner_id: RecordId,
        uploads: Vec<UploadedFile>,
    ) -> TrackerResult<bool> {
        for upload in &uploads {
            validate_file_name(upload.filename())?;
        }

        if self.owners.get(owner_id).await?.is_none() {
            warn!(owner = %O::KIND, id = %owner_id, "attachment owner not found");
            return Ok(false);
        }

        let mut file_ids = Vec::with_capacity(uploads.len());
        for upload in uploads {
            let name = upload.filename().to_owned();
            let relative_path = Utf8PathBuf::from(random_segment()).join(&name);
            let stored = self.storage.write(&relative_path, upload).await?;
            let draft = NewFile {
                name,
                path: stored.path.into_string(),
                size: stored.size,
            };
            draft.validate()?;
            let file_id = self.files.insert(draft).await?;
            debug!(
                owner = %O::KIND,
                %owner_id,
                %file_id,
                size = stored.size,
                "attachment stored"
            );
            file_ids.push(file_id);
        }

        let count = file_ids.len();
        let updated = self
            .owners
            .modify(
                owner_id,
                Box::new(move |owner: &mut O| {
                    owner.append_files(file_ids);
                    Ok(())
                }),
            )
            .await?;
        if updated.is_none() {
            warn!(owner = %O::KIND, id = %owner_id, "attachment owner vanished during ingestion");
            return Ok(false);
        }
        info!(owner = %O::KIND, id = %owner_id, count, "attachments ingested");
        Ok(true)
    }
}

impl<O, S, F, A> Clone for AttachmentIngestion<O, S, F, A>
where
    O: HasAttachments,
    S: RecordStore<O>,
    F: RecordStore<FileRecord>,
    A: AttachmentStore,
{
    fn clone(&self) -> Self {
        Self::new(
            Arc::clone(&self.owners),
            Arc::clone(&self.files),
            Arc::clone(&self.storage),
        )
    }
}

impl<O, S, F, A> fmt::Debug for AttachmentIngestion<O, S, F, A>
where
    O: HasAttachments,
    S: RecordStore<O>,
    F: RecordStore<FileRecord>,
    A: AttachmentStore,
{
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("AttachmentIngestion")
            .field("owner", &O::KIND)
            .finish_non_exhaustive()
    }
}
