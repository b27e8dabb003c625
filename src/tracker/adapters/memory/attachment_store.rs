//! In-memory attachment byte storage.

use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};
use std::collections::HashMap;
use std::io::Read;
use std::sync::{Arc, RwLock};

use crate::tracker::ports::{
    AttachmentStore, AttachmentStoreError, AttachmentStoreResult, StoredAttachment, UploadedFile,
};

/// Thread-safe attachment store keeping payloads in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAttachmentStore {
    blobs: Arc<RwLock<HashMap<Utf8PathBuf, Vec<u8>>>>,
}

impl InMemoryAttachmentStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the bytes stored at `path`, if any.
    #[must_use]
    pub fn read(&self, path: &Utf8Path) -> Option<Vec<u8>> {
        self.blobs
            .read()
            .ok()
            .and_then(|blobs| blobs.get(path).cloned())
    }

    /// Returns the number of stored payloads.
    #[must_use]
    pub fn len(&self) -> usize {
        self.blobs.read().map_or(0, |blobs| blobs.len())
    }

    /// Returns `true` when nothing has been stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl AttachmentStore for InMemoryAttachmentStore {
    async fn write(
        &self,
        relative_path: &Utf8Path,
        upload: UploadedFile,
    ) -> AttachmentStoreResult<StoredAttachment> {
        let mut bytes = Vec::new();
        upload
            .into_content()
            .read_to_end(&mut bytes)
            .map_err(|err| AttachmentStoreError::io(relative_path, err))?;
        let size = u64::try_from(bytes.len())
            .map_err(|err| AttachmentStoreError::io(relative_path, std::io::Error::other(err)))?;

        let mut blobs = self.blobs.write().map_err(|err| {
            AttachmentStoreError::io(relative_path, std::io::Error::other(err.to_string()))
        })?;
        blobs.insert(relative_path.to_owned(), bytes);
        Ok(StoredAttachment {
            path: relative_path.to_owned(),
            size,
        })
    }
}
