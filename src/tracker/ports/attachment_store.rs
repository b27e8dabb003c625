//! Byte-storage port for uploaded attachments.

use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};
use std::fmt;
use std::io::{Cursor, Read};
use std::sync::Arc;
use thiserror::Error;

/// Result type for attachment store operations.
pub type AttachmentStoreResult<T> = Result<T, AttachmentStoreError>;

/// An uploaded payload: its original file name and a readable byte stream.
pub struct UploadedFile {
    filename: String,
    content: Box<dyn Read + Send>,
}

impl UploadedFile {
    /// Wraps a byte stream under the given file name.
    #[must_use]
    pub fn new(filename: impl Into<String>, content: impl Read + Send + 'static) -> Self {
        Self {
            filename: filename.into(),
            content: Box::new(content),
        }
    }

    /// Wraps an in-memory payload.
    #[must_use]
    pub fn from_bytes(filename: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self::new(filename, Cursor::new(bytes.into()))
    }

    /// Returns the original file name.
    #[must_use]
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Consumes the upload and returns its byte stream.
    #[must_use]
    pub fn into_content(self) -> Box<dyn Read + Send> {
        self.content
    }
}

impl fmt::Debug for UploadedFile {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("UploadedFile")
            .field("filename", &self.filename)
            .finish_non_exhaustive()
    }
}

/// Location and size of a written attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredAttachment {
    /// Path recorded in the file metadata.
    pub path: Utf8PathBuf,
    /// Size on disk in bytes.
    pub size: u64,
}

/// Durable storage for attachment bytes.
#[async_trait]
pub trait AttachmentStore: Send + Sync {
    /// Copies the upload's byte stream to `relative_path`, creating parent
    /// directories as needed.
    ///
    /// # Errors
    ///
    /// Returns [`AttachmentStoreError`] when the bytes cannot be written.
    async fn write(
        &self,
        relative_path: &Utf8Path,
        upload: UploadedFile,
    ) -> AttachmentStoreResult<StoredAttachment>;
}

/// Errors returned by attachment store implementations.
#[derive(Debug, Clone, Error)]
pub enum AttachmentStoreError {
    /// Writing the payload failed.
    #[error("failed to write attachment {path}: {source}")]
    Io {
        /// Relative path being written.
        path: Utf8PathBuf,
        /// Underlying I/O failure.
        source: Arc<std::io::Error>,
    },

    /// The blocking write task did not complete.
    #[error("attachment write task failed: {0}")]
    Interrupted(String),
}

impl AttachmentStoreError {
    /// Wraps an I/O failure for `path`.
    pub fn io(path: &Utf8Path, err: std::io::Error) -> Self {
        Self::Io {
            path: path.to_owned(),
            source: Arc::new(err),
        }
    }
}
