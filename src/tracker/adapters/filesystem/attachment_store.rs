//! Capability-scoped filesystem storage for attachment bytes.
//!
//! All writes go through a [`cap_std::fs_utf8::Dir`] opened on the media
//! root, so a relative path can never resolve outside of it.

use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use std::io;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::tracker::ports::{
    AttachmentStore, AttachmentStoreError, AttachmentStoreResult, StoredAttachment, UploadedFile,
};

/// Attachment store writing payloads beneath a media root directory.
///
/// Recorded paths are the media root joined with the relative path, e.g.
/// `media/3fa94c1b/report.pdf`.
#[derive(Debug, Clone)]
pub struct FilesystemAttachmentStore {
    root: Utf8PathBuf,
    dir: Arc<Dir>,
}

impl FilesystemAttachmentStore {
    /// Opens the media root, creating it when missing.
    ///
    /// # Errors
    ///
    /// Returns an I/O error when the directory cannot be created or opened.
    pub fn open(root: impl AsRef<Utf8Path>) -> io::Result<Self> {
        let root_path = root.as_ref();
        Dir::create_ambient_dir_all(root_path, ambient_authority())?;
        let dir = Dir::open_ambient_dir(root_path, ambient_authority())?;
        Ok(Self {
            root: root_path.to_owned(),
            dir: Arc::new(dir),
        })
    }

    /// Returns the media root path.
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }
}

#[async_trait]
impl AttachmentStore for FilesystemAttachmentStore {
    async fn write(
        &self,
        relative_path: &Utf8Path,
        upload: UploadedFile,
    ) -> AttachmentStoreResult<StoredAttachment> {
        let dir = Arc::clone(&self.dir);
        let relative = relative_path.to_owned();
        debug!(path = %relative, "writing attachment");

        let size = tokio::task::spawn_blocking(move || copy_into(&dir, &relative, upload))
            .await
            .map_err(|err| AttachmentStoreError::Interrupted(err.to_string()))?
            .inspect_err(|err| warn!(error = %err, "attachment write failed"))?;

        Ok(StoredAttachment {
            path: self.root.join(relative_path),
            size,
        })
    }
}

fn copy_into(dir: &Dir, relative: &Utf8Path, upload: UploadedFile) -> AttachmentStoreResult<u64> {
    let io_failure = |err: io::Error| AttachmentStoreError::io(relative, err);

    if let Some(parent) = relative.parent().filter(|path| !path.as_str().is_empty()) {
        dir.create_dir_all(parent).map_err(io_failure)?;
    }
    let mut file = dir.create(relative).map_err(io_failure)?;
    let mut content = upload.into_content();
    io::copy(&mut content, &mut file).map_err(io_failure)?;
    file.sync_all().map_err(io_failure)?;
    let metadata = file.metadata().map_err(io_failure)?;
    Ok(metadata.len())
}
