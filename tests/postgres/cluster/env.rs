//! Environment overrides applied while the cluster bootstraps.

use super::BoxError;
use super::worker::stage_worker;
use crate::test_helpers::locate_pg_worker_path;
use pg_embedded_setup_unpriv::{ExecutionPrivileges, detect_execution_privileges};
use std::ffi::OsString;
use std::net::TcpListener;

/// Converts bootstrap environment pairs into the form [`EnvVarGuard`]
/// accepts.
///
/// [`EnvVarGuard`]: crate::test_helpers::EnvVarGuard
pub(super) fn to_os_pairs(vars: &[(String, Option<String>)]) -> Vec<(OsString, Option<OsString>)> {
    vars.iter()
        .map(|(name, value)| (OsString::from(name), value.as_ref().map(OsString::from)))
        .collect()
}

/// Picks a free port unless `PG_PORT` is set, and stages the worker binary
/// when the runner is root.
pub(super) fn bootstrap_env_changes() -> Result<Vec<(OsString, Option<OsString>)>, BoxError> {
    let mut changes = Vec::new();
    if std::env::var_os("PG_PORT").is_none() {
        let port = free_port()?;
        changes.push((OsString::from("PG_PORT"), Some(OsString::from(port.to_string()))));
    }

    let needs_worker = matches!(detect_execution_privileges(), ExecutionPrivileges::Root)
        && std::env::var_os("PG_EMBEDDED_WORKER").is_none();
    if needs_worker {
        let worker = locate_pg_worker_path().ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "running as root but no pg_worker binary was found",
            )
        })?;
        let staged = stage_worker(&worker)?;
        changes.push((
            OsString::from("PG_EMBEDDED_WORKER"),
            Some(OsString::from(staged.into_string())),
        ));
    }
    Ok(changes)
}

fn free_port() -> Result<u16, BoxError> {
    let listener = TcpListener::bind(("127.0.0.1", 0))?;
    Ok(listener.local_addr()?.port())
}
