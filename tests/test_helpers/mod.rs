//! Process-wide helpers shared by integration test crates.

use camino::Utf8PathBuf;
use std::env;
use std::ffi::OsString;
use std::sync::{Mutex, MutexGuard, OnceLock};

static ENV_MUTEX: OnceLock<Mutex<()>> = OnceLock::new();

/// Name of the helper binary that runs `PostgreSQL` lifecycle steps.
pub const PG_WORKER_NAME: &str = "pg_worker";

/// Scoped environment override; previous values come back on drop.
///
/// Holding the guard also holds a process-wide lock, so overrides from
/// concurrent tests never interleave.
pub struct EnvVarGuard {
    saved: Vec<(OsString, Option<OsString>)>,
    _lock: MutexGuard<'static, ()>,
}

impl EnvVarGuard {
    /// Applies `changes`, removing every variable paired with `None`.
    pub fn set_many(changes: &[(OsString, Option<OsString>)]) -> Self {
        let lock = ENV_MUTEX
            .get_or_init(|| Mutex::new(()))
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let saved = changes
            .iter()
            .map(|(name, value)| {
                let previous = env::var_os(name);
                apply(name, value.as_ref());
                (name.clone(), previous)
            })
            .collect();
        Self { saved, _lock: lock }
    }
}

impl Drop for EnvVarGuard {
    fn drop(&mut self) {
        for (name, value) in self.saved.drain(..).rev() {
            apply(&name, value.as_ref());
        }
    }
}

fn apply(name: &OsString, value: Option<&OsString>) {
    // SAFETY: every mutation happens while ENV_MUTEX is held.
    unsafe {
        match value {
            Some(new_value) => env::set_var(name, new_value),
            None => env::remove_var(name),
        }
    }
}

/// Finds the `pg_worker` binary built alongside the test executable.
///
/// Cargo's compile-time path wins, then the target directory next to the
/// running test, then `PATH`.
pub fn locate_pg_worker_path() -> Option<Utf8PathBuf> {
    option_env!("CARGO_BIN_EXE_pg_worker")
        .map(Utf8PathBuf::from)
        .filter(|path| path.is_file())
        .or_else(worker_in_target_dir)
        .or_else(worker_on_path)
}

fn worker_in_target_dir() -> Option<Utf8PathBuf> {
    let test_exe = Utf8PathBuf::try_from(env::current_exe().ok()?).ok()?;
    let profile_dir = test_exe.parent()?.parent()?;
    let candidate = profile_dir.join(PG_WORKER_NAME);
    candidate.is_file().then_some(candidate)
}

fn worker_on_path() -> Option<Utf8PathBuf> {
    let search_path = env::var_os("PATH")?;
    env::split_paths(&search_path)
        .filter_map(|dir| Utf8PathBuf::try_from(dir).ok())
        .map(|dir| dir.join(PG_WORKER_NAME))
        .find(|candidate| candidate.is_file())
}
