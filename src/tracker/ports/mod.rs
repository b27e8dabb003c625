//! Port contracts for tracker persistence.
//!
//! Ports define infrastructure-agnostic interfaces consumed by the
//! repository services.

pub mod attachment_store;
pub mod record_store;

pub use attachment_store::{
    AttachmentStore, AttachmentStoreError, AttachmentStoreResult, StoredAttachment, UploadedFile,
};
pub use record_store::{RecordChange, RecordStore, StoreError, StoreResult};
