// src/config/model.rs

use std::path::PathBuf;

use directories::UserDirs;
use serde::Deserialize;

use crate::types::LogLevel;

/// Environment variable that overrides the default state directory.
pub const STATE_DIR_ENV_VAR: &str = "DAGDOG_STATE_DIR";

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [config]
/// state_dir = ".dagdog"
/// log_level = "debug"
/// ```
///
/// Every key is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfigFile {
    #[serde(default)]
    pub config: ConfigSection,
}

/// `[config]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigSection {
    /// Directory holding one cache file per DAG name.
    ///
    /// Relative paths are resolved against the directory of the config file.
    #[serde(default)]
    pub state_dir: Option<PathBuf>,

    /// Log level; if `None`, `DAGDOG_LOG` or `info` is used.
    #[serde(default)]
    pub log_level: Option<LogLevel>,
}

/// Resolved engine settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Base directory for execution caches.
    pub state_dir: PathBuf,
    pub log_level: Option<LogLevel>,
}

impl EngineConfig {
    pub fn with_state_dir(state_dir: impl Into<PathBuf>) -> Self {
        Self {
            state_dir: state_dir.into(),
            log_level: None,
        }
    }
}

impl Default for EngineConfig {
    /// `$DAGDOG_STATE_DIR`, else `~/.dagdog/state`, else `.dagdog/state`.
    fn default() -> Self {
        Self {
            state_dir: default_state_dir(),
            log_level: None,
        }
    }
}

pub fn default_state_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os(STATE_DIR_ENV_VAR).filter(|v| !v.is_empty()) {
        return PathBuf::from(dir);
    }

    let base = UserDirs::new()
        .map(|u| u.home_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."));
    base.join(".dagdog").join("state")
}
