//! In-memory adapters for tracker persistence.

mod attachment_store;
mod record_store;

pub use attachment_store::InMemoryAttachmentStore;
pub use record_store::InMemoryRecordStore;
