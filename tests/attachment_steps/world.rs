//! Shared world state for attachment ingestion BDD scenarios.

use std::sync::Arc;

use rstest::fixture;
use tasktrack::tracker::{
    adapters::memory::{InMemoryAttachmentStore, InMemoryRecordStore},
    domain::{FileRecord, HistoryElement, RecordId, Task},
    services::{FileRepository, HistoryRepository, TaskRepository, TrackerResult},
};

/// Task repository used by the BDD world.
pub type TestTasks = TaskRepository<
    InMemoryRecordStore<Task>,
    InMemoryRecordStore<FileRecord>,
    InMemoryAttachmentStore,
>;

/// History repository used by the BDD world.
pub type TestHistory = HistoryRepository<
    InMemoryRecordStore<HistoryElement>,
    InMemoryRecordStore<FileRecord>,
    InMemoryAttachmentStore,
>;

/// Scenario world for attachment ingestion behaviour tests.
pub struct AttachmentWorld {
    pub tasks: TestTasks,
    pub history: TestHistory,
    pub files: FileRepository<InMemoryRecordStore<FileRecord>>,
    pub storage: Arc<InMemoryAttachmentStore>,
    pub task_id: Option<RecordId>,
    pub history_id: Option<RecordId>,
    pub uploaded: Vec<(String, usize)>,
    pub last_result: Option<TrackerResult<bool>>,
}

impl AttachmentWorld {
    /// Creates a world with empty stores and no pending scenario state.
    #[must_use]
    pub fn new() -> Self {
        let files = Arc::new(InMemoryRecordStore::new());
        let storage = Arc::new(InMemoryAttachmentStore::new());
        Self {
            tasks: TaskRepository::new(
                Arc::new(InMemoryRecordStore::new()),
                Arc::clone(&files),
                Arc::clone(&storage),
            ),
            history: HistoryRepository::new(
                Arc::new(InMemoryRecordStore::new()),
                Arc::clone(&files),
                Arc::clone(&storage),
            ),
            files: FileRepository::new(files),
            storage,
            task_id: None,
            history_id: None,
            uploaded: Vec::new(),
            last_result: None,
        }
    }
}

impl Default for AttachmentWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> AttachmentWorld {
    AttachmentWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
