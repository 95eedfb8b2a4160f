// src/logging.rs

//! Logging setup for `dagdog` using `tracing` + `tracing-subscriber`.
//!
//! Priority for determining the log level:
//! 1. the level passed by the caller (e.g. from [`EngineConfig`](crate::config::EngineConfig))
//! 2. `DAGDOG_LOG` environment variable (e.g. "info", "debug")
//! 3. default to `info`
//!
//! Logs go to STDERR so that task actions keep STDOUT to themselves.

use tracing_subscriber::fmt;

use crate::errors::{DagdogError, Result};
use crate::types::LogLevel;

/// Environment variable consulted when no explicit level is given.
pub const LOG_ENV_VAR: &str = "DAGDOG_LOG";

/// Initialise the global logging subscriber.
///
/// Fails if a global subscriber has already been installed.
pub fn init_logging(level: Option<LogLevel>) -> Result<()> {
    let level = resolve_level(level, std::env::var(LOG_ENV_VAR).ok().as_deref());

    fmt()
        .with_max_level(tracing::Level::from(level))
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| DagdogError::Config(format!("failed to install logger: {e}")))
}

/// Pick the effective level from an explicit choice and the raw env value.
///
/// Unparseable env values are ignored rather than rejected.
pub fn resolve_level(explicit: Option<LogLevel>, env_value: Option<&str>) -> LogLevel {
    explicit
        .or_else(|| env_value.and_then(|s| s.parse().ok()))
        .unwrap_or_default()
}
