//! Repository services for the tracker entities.

mod attachments;
mod error;
mod history;
mod repository;
mod task;

pub use attachments::{AttachmentIngestion, SEGMENT_LEN, random_segment};
pub use error::{TrackerError, TrackerResult};
pub use history::HistoryRepository;
pub use repository::{FileRepository, ProjectRepository, Repository, UserRepository};
pub use task::TaskRepository;
