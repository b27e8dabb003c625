//! Shared test helpers for `PostgreSQL` integration tests.
//!
//! Every test gets its own database, copied from a template that carries the
//! tracker schema, on the embedded cluster shared by the test process.

pub use super::cluster::{BoxError, PostgresCluster, postgres_cluster};
use camino::Utf8PathBuf;
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use tasktrack::tracker::{
    adapters::{filesystem::FilesystemAttachmentStore, postgres::PgPool},
    bootstrap::TrackerRepositories,
};
use tempfile::TempDir;
use uuid::Uuid;

/// SQL creating the tracker tables.
pub const CREATE_SCHEMA_SQL: &str =
    include_str!("../../migrations/2026-10-01-000000_create_tracker_tables/up.sql");

/// Template database holding the migrated schema.
pub const TEMPLATE_DB: &str = "tasktrack_test_template";

/// A per-test database, dropped when the guard goes out of scope.
pub struct TestDatabase {
    cluster: PostgresCluster,
    name: String,
}

impl TestDatabase {
    /// Copies the template into a freshly named database.
    pub fn create(cluster: PostgresCluster) -> Result<Self, BoxError> {
        cluster.ensure_template(TEMPLATE_DB, apply_schema)?;
        let name = format!("tasktrack_{}", Uuid::new_v4().simple());
        cluster.create_database_from(&name, TEMPLATE_DB)?;
        Ok(Self { cluster, name })
    }

    /// Returns the connection URL of this database.
    #[must_use]
    pub fn url(&self) -> String {
        self.cluster.database_url(&self.name)
    }
}

impl Drop for TestDatabase {
    fn drop(&mut self) {
        drop(self.cluster.drop_database(&self.name));
    }
}

/// Repositories over a per-test database plus the media root backing them.
///
/// Fields drop in declaration order, so every pooled connection is released
/// before the database itself is dropped.
pub struct PostgresContext {
    pub repositories: TrackerRepositories,
    pub pool: PgPool,
    pub media_root: Utf8PathBuf,
    _media: TempDir,
    _database: TestDatabase,
}

fn apply_schema(url: &str) -> Result<(), BoxError> {
    let mut connection = PgConnection::establish(url)?;
    connection.batch_execute(CREATE_SCHEMA_SQL)?;
    Ok(())
}

/// Creates a database on `cluster` and wires the repositories to it.
///
/// # Errors
///
/// Returns an error if the cluster is unavailable, the database cannot be
/// created, or the pool or media root cannot be set up.
pub fn postgres_context(
    cluster: Result<PostgresCluster, BoxError>,
) -> Result<PostgresContext, BoxError> {
    tasktrack::logging::init_test();
    let database = TestDatabase::create(cluster?)?;
    let pool = Pool::builder()
        .max_size(4)
        .build(ConnectionManager::<PgConnection>::new(database.url()))?;
    let media = TempDir::new()?;
    let media_root = Utf8PathBuf::from_path_buf(media.path().join("media"))
        .map_err(|path| format!("non UTF-8 temp path {}", path.display()))?;
    let storage = FilesystemAttachmentStore::open(&media_root)?;
    Ok(PostgresContext {
        repositories: TrackerRepositories::from_parts(&pool, storage),
        pool,
        media_root,
        _media: media,
        _database: database,
    })
}
