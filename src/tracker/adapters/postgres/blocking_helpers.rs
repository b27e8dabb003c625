//! Blocking operation helpers for the `PostgreSQL` record stores.
//!
//! Diesel connections are synchronous, so every store call is moved onto
//! the blocking thread pool together with a pooled connection.

use diesel::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool};

use crate::tracker::ports::{StoreError, StoreResult};

/// `PostgreSQL` connection pool type shared by the tracker stores.
pub type PgPool = Pool<ConnectionManager<PgConnection>>;

/// Runs `operation` with a pooled connection on the blocking thread pool.
///
/// The connection is returned to the pool when the closure finishes.
pub(super) async fn run_blocking<F, T>(pool: &PgPool, operation: F) -> StoreResult<T>
where
    F: FnOnce(&mut PgConnection) -> StoreResult<T> + Send + 'static,
    T: Send + 'static,
{
    let shared_pool = pool.clone();
    tokio::task::spawn_blocking(move || {
        let mut connection = shared_pool.get().map_err(StoreError::persistence)?;
        operation(&mut connection)
    })
    .await
    .map_err(StoreError::persistence)?
}

impl From<diesel::result::Error> for StoreError {
    fn from(err: diesel::result::Error) -> Self {
        Self::persistence(err)
    }
}
