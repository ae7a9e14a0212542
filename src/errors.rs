// src/errors.rs

//! Crate-wide error aliases and helpers.

use thiserror::Error;

use crate::types::RunId;

#[derive(Error, Debug)]
pub enum JobwireError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Dispatch failed for job '{job}': {reason}")]
    DispatchFailed { job: String, reason: String },

    #[error("Run not found: {0}")]
    RunNotFound(RunId),

    #[error("Run actor is no longer running: {0}")]
    RunGone(RunId),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl JobwireError {
    pub(crate) fn dispatch_failed(job: &str, reason: impl Into<String>) -> Self {
        JobwireError::DispatchFailed {
            job: job.to_string(),
            reason: reason.into(),
        }
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, JobwireError>;
