//! Filesystem adapter for attachment bytes.

mod attachment_store;

pub use attachment_store::FilesystemAttachmentStore;
