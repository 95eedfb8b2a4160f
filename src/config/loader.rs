// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::model::{EngineConfig, RawConfigFile, default_state_dir};
use crate::errors::{DagdogError, Result};

/// Read a config file and return the raw `RawConfigFile`.
///
/// This only performs TOML deserialization; paths are left as written.
pub fn load_raw_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let contents = fs::read_to_string(path.as_ref())?;
    let raw: RawConfigFile = toml::from_str(&contents)?;
    Ok(raw)
}

/// Load a config file and resolve it into an [`EngineConfig`].
///
/// - A relative `state_dir` is joined onto the config file's directory.
/// - A missing `state_dir` falls back to [`default_state_dir`].
pub fn load_from_path(path: impl AsRef<Path>) -> Result<EngineConfig> {
    let path = path.as_ref();
    let raw = load_raw_from_path(path)?;

    let state_dir = match raw.config.state_dir {
        Some(dir) if dir.as_os_str().is_empty() => {
            return Err(DagdogError::Config(
                "[config].state_dir must not be empty".to_string(),
            ));
        }
        Some(dir) if dir.is_absolute() => dir,
        Some(dir) => config_root_dir(path).join(dir),
        None => default_state_dir(),
    };

    Ok(EngineConfig {
        state_dir,
        log_level: raw.config.log_level,
    })
}

/// Default config location: `dagdog.toml` in the working directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("dagdog.toml")
}

fn config_root_dir(config_path: &Path) -> PathBuf {
    match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
