// src/config/mod.rs

//! Configuration loading and validation for jobwire.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk (`loader.rs`).
//! - Validate it into the engine's read-only [`ProjectConfig`] (`validate.rs`).
//! - Resolve fired triggers to jobs (`project.rs`).

pub mod loader;
pub mod model;
pub mod project;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_from_path, load_from_str};
pub use model::{RawConfigFile, RawJob, RawTrigger};
pub use project::{Job, ProjectConfig};
pub use validate::validate_config;
