//! Tracing subscriber setup.
//!
//! The log filter is read from `RUST_LOG` and defaults to `info`, e.g.
//! `RUST_LOG=tasktrack=debug`.

use tracing_subscriber::{EnvFilter, fmt};

/// Error returned when a global subscriber is already installed.
pub type LoggingInitError = Box<dyn std::error::Error + Send + Sync + 'static>;

const DEFAULT_FILTER: &str = "info";

/// Installs the global fmt subscriber.
///
/// # Errors
///
/// Returns [`LoggingInitError`] when a global subscriber was already set.
///
/// # Examples
///
/// ```no_run
/// tasktrack::logging::init()?;
/// # Ok::<(), tasktrack::logging::LoggingInitError>(())
/// ```
pub fn init() -> Result<(), LoggingInitError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_line_number(true)
        .try_init()
}

/// Installs a debug-level subscriber writing through the test harness.
///
/// Repeated calls are ignored.
pub fn init_test() {
    drop(
        fmt()
            .with_env_filter(EnvFilter::new("debug"))
            .with_test_writer()
            .try_init(),
    );
}
