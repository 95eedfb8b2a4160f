// src/config/mod.rs

//! Configuration for the dagdog engine.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk and resolve it into an [`EngineConfig`]
//!   (`loader.rs`).

pub mod loader;
pub mod model;

pub use loader::{default_config_path, load_from_path, load_raw_from_path};
pub use model::{ConfigSection, EngineConfig, RawConfigFile};
