//! Composition root wiring the `PostgreSQL` and filesystem adapters into the
//! tracker repositories.

use diesel::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

use crate::config::TrackerConfig;
use crate::tracker::{
    adapters::{
        filesystem::FilesystemAttachmentStore,
        postgres::{PgPool, PostgresRecordStore},
    },
    domain::{FileRecord, HistoryElement, Project, Task, User},
    services::{
        FileRepository, HistoryRepository, ProjectRepository, TaskRepository, UserRepository,
    },
};

/// Task repository backed by `PostgreSQL` and the media directory.
pub type PgTaskRepository = TaskRepository<
    PostgresRecordStore<Task>,
    PostgresRecordStore<FileRecord>,
    FilesystemAttachmentStore,
>;

/// History repository backed by `PostgreSQL` and the media directory.
pub type PgHistoryRepository = HistoryRepository<
    PostgresRecordStore<HistoryElement>,
    PostgresRecordStore<FileRecord>,
    FilesystemAttachmentStore,
>;

/// Every tracker repository, sharing one pool and one media root.
#[derive(Debug, Clone)]
pub struct TrackerRepositories {
    /// User repository.
    pub users: UserRepository<PostgresRecordStore<User>>,
    /// Project repository.
    pub projects: ProjectRepository<PostgresRecordStore<Project>>,
    /// Task repository.
    pub tasks: PgTaskRepository,
    /// History repository.
    pub history: PgHistoryRepository,
    /// File metadata repository.
    pub files: FileRepository<PostgresRecordStore<FileRecord>>,
}

impl TrackerRepositories {
    /// Builds the repositories from an existing pool and attachment store.
    #[must_use]
    pub fn from_parts(pool: &PgPool, attachment_store: FilesystemAttachmentStore) -> Self {
        let storage = Arc::new(attachment_store);
        let files = Arc::new(PostgresRecordStore::<FileRecord>::new(pool.clone()));
        let tasks = Arc::new(PostgresRecordStore::<Task>::new(pool.clone()));
        let history = Arc::new(PostgresRecordStore::<HistoryElement>::new(pool.clone()));
        Self {
            users: UserRepository::new(Arc::new(PostgresRecordStore::new(pool.clone()))),
            projects: ProjectRepository::new(Arc::new(PostgresRecordStore::new(pool.clone()))),
            tasks: TaskRepository::new(tasks, Arc::clone(&files), Arc::clone(&storage)),
            history: HistoryRepository::new(history, Arc::clone(&files), storage),
            files: FileRepository::new(files),
        }
    }
}

/// Errors raised while assembling the repositories.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// The connection pool could not be built.
    #[error("failed to build connection pool: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),

    /// The media root could not be opened.
    #[error("failed to open media root {path}: {source}")]
    Storage {
        /// Media root path.
        path: camino::Utf8PathBuf,
        /// Underlying I/O failure.
        source: std::io::Error,
    },
}

/// Connects to the database and media root described by `config`.
///
/// # Errors
///
/// Returns [`BootstrapError`] when the pool cannot be built or the media root
/// cannot be opened.
pub fn connect(config: &TrackerConfig) -> Result<TrackerRepositories, BootstrapError> {
    let manager = ConnectionManager::<PgConnection>::new(&config.database_url);
    let pool = Pool::builder()
        .max_size(config.pool_max_size)
        .build(manager)?;
    let storage = FilesystemAttachmentStore::open(&config.media_root).map_err(|source| {
        BootstrapError::Storage {
            path: config.media_root.clone(),
            source,
        }
    })?;
    info!(
        media_root = %config.media_root,
        pool_max_size = config.pool_max_size,
        "tracker repositories ready"
    );
    Ok(TrackerRepositories::from_parts(&pool, storage))
}
