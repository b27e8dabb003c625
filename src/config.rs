//! Runtime configuration read from the environment.

use camino::Utf8PathBuf;
use std::env;
use thiserror::Error;

/// Variable holding the `PostgreSQL` connection URL.
pub const DATABASE_URL_VAR: &str = "TASKTRACK_DATABASE_URL";
/// Variable holding the attachment media root.
pub const MEDIA_ROOT_VAR: &str = "TASKTRACK_MEDIA_ROOT";
/// Variable holding the connection pool size.
pub const POOL_SIZE_VAR: &str = "TASKTRACK_POOL_SIZE";

/// Media root used when [`MEDIA_ROOT_VAR`] is unset.
pub const DEFAULT_MEDIA_ROOT: &str = "media";
/// Pool size used when [`POOL_SIZE_VAR`] is unset.
pub const DEFAULT_POOL_SIZE: u32 = 8;

/// Settings needed to assemble the tracker repositories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerConfig {
    /// `PostgreSQL` connection URL.
    pub database_url: String,
    /// Directory attachment bytes are written under.
    pub media_root: Utf8PathBuf,
    /// Maximum number of pooled database connections.
    pub pool_max_size: u32,
}

/// Errors raised while reading configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A required variable is not set.
    #[error("{0} is not set")]
    Missing(&'static str),

    /// A variable is set but cannot be used.
    #[error("{name} has invalid value '{value}': {reason}")]
    Invalid {
        /// Variable name.
        name: &'static str,
        /// Rejected value.
        value: String,
        /// Why the value was rejected.
        reason: &'static str,
    },
}

impl TrackerConfig {
    /// Reads the configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the database URL is missing or a value is
    /// malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Reads the configuration through `lookup`, which returns the value of a
    /// variable or `None` when it is unset.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the database URL is missing or a value is
    /// malformed.
    pub fn from_lookup<L>(lookup: L) -> Result<Self, ConfigError>
    where
        L: Fn(&str) -> Option<String>,
    {
        let database_url = lookup(DATABASE_URL_VAR)
            .filter(|url| !url.trim().is_empty())
            .ok_or(ConfigError::Missing(DATABASE_URL_VAR))?;
        let media_root = lookup(MEDIA_ROOT_VAR)
            .filter(|root| !root.trim().is_empty())
            .map_or_else(
                || Utf8PathBuf::from(DEFAULT_MEDIA_ROOT),
                Utf8PathBuf::from,
            );
        let pool_max_size = lookup(POOL_SIZE_VAR)
            .map_or(Ok(DEFAULT_POOL_SIZE), |raw| parse_pool_size(&raw))?;

        Ok(Self {
            database_url,
            media_root,
            pool_max_size,
        })
    }
}

fn parse_pool_size(raw: &str) -> Result<u32, ConfigError> {
    let invalid = |reason| ConfigError::Invalid {
        name: POOL_SIZE_VAR,
        value: raw.to_owned(),
        reason,
    };
    let size = raw
        .trim()
        .parse::<u32>()
        .map_err(|_| invalid("expected a positive integer"))?;
    if size == 0 {
        return Err(invalid("pool size must be at least 1"));
    }
    Ok(size)
}
