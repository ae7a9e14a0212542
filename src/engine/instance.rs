// src/engine/instance.rs

//! Engine bootstrap and the API surface toward embedding code.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::config::{ProjectConfig, load_and_validate, validate_config};
use crate::errors::{JobwireError, Result};
use crate::exec::ExecutorBackend;
use crate::run::RunHandle;
use crate::trigger::{CronTrigger, Message};
use crate::types::RunId;

use super::broadcaster::Broadcaster;
use super::dispatcher::{DEFAULT_START_TIMEOUT, Dispatcher};
use super::registry::{DEFAULT_SHARDS, RunRegistry};

/// Where the project configuration comes from.
#[derive(Debug, Clone)]
pub enum ConfigSource {
    Inline(ProjectConfig),
    Path(PathBuf),
}

impl ConfigSource {
    fn resolve(self) -> Result<ProjectConfig> {
        match self {
            ConfigSource::Inline(cfg) => {
                validate_config(&cfg)?;
                Ok(cfg)
            }
            ConfigSource::Path(path) => load_and_validate(path),
        }
    }
}

impl From<ProjectConfig> for ConfigSource {
    fn from(cfg: ProjectConfig) -> Self {
        ConfigSource::Inline(cfg)
    }
}

impl From<PathBuf> for ConfigSource {
    fn from(path: PathBuf) -> Self {
        ConfigSource::Path(path)
    }
}

/// Bootstrap options. `name` and `project_config` are required.
#[derive(Debug, Clone)]
pub struct EngineOptions {
    pub name: Option<String>,
    pub project_config: Option<ConfigSource>,
    /// Upper bound on a run actor's start-up during dispatch.
    pub start_timeout: Duration,
    /// Number of independently locked registry shards.
    pub registry_shards: usize,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            name: None,
            project_config: None,
            start_timeout: DEFAULT_START_TIMEOUT,
            registry_shards: DEFAULT_SHARDS,
        }
    }
}

impl EngineOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn project_config(mut self, source: impl Into<ConfigSource>) -> Self {
        self.project_config = Some(source.into());
        self
    }

    pub fn start_timeout(mut self, start_timeout: Duration) -> Self {
        self.start_timeout = start_timeout;
        self
    }

    pub fn registry_shards(mut self, shards: usize) -> Self {
        self.registry_shards = shards;
        self
    }
}

/// One engine instance: a fixed project config plus the registry,
/// dispatcher and broadcaster built around it.
///
/// Cheap to clone; clones share all state.
#[derive(Debug, Clone)]
pub struct Engine {
    name: Arc<str>,
    config: Arc<ProjectConfig>,
    registry: Arc<RunRegistry>,
    broadcaster: Broadcaster,
}

impl Engine {
    /// Validate `options` and build the engine.
    ///
    /// Fails with a configuration error if `name` or `project_config` is
    /// missing or the config does not validate.
    pub fn start(options: EngineOptions, executor: Arc<dyn ExecutorBackend>) -> Result<Self> {
        let name = match options.name {
            Some(name) if !name.trim().is_empty() => name,
            _ => {
                return Err(JobwireError::ConfigError(
                    "engine option `name` is required".to_string(),
                ));
            }
        };
        let source = options.project_config.ok_or_else(|| {
            JobwireError::ConfigError("engine option `project_config` is required".to_string())
        })?;
        let config = Arc::new(source.resolve()?);

        let registry = Arc::new(RunRegistry::new(options.registry_shards));
        let dispatcher = Arc::new(
            Dispatcher::new(Arc::clone(&registry), executor)
                .with_start_timeout(options.start_timeout),
        );
        let broadcaster = Broadcaster::new(Arc::clone(&config), dispatcher);

        info!(
            engine = %name,
            jobs = config.jobs.len(),
            triggers = config.triggers.len(),
            "engine started"
        );

        Ok(Self {
            name: name.into(),
            config,
            registry,
            broadcaster,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &ProjectConfig {
        &self.config
    }

    pub async fn handle_message(&self, message: Message) -> Vec<Result<RunId>> {
        self.broadcaster.handle_message(&message).await
    }

    /// Entry point for an external cron source.
    pub async fn handle_trigger(
        &self,
        config: &ProjectConfig,
        trigger: &CronTrigger,
    ) -> Vec<Result<RunId>> {
        self.broadcaster.handle_trigger(config, trigger).await
    }

    pub fn resolve(&self, id: &RunId) -> Result<RunHandle> {
        self.registry.resolve(id)
    }

    /// Drop the registry's handle for `id`. The actor stops once no other
    /// handle remains.
    pub fn release(&self, id: &RunId) -> bool {
        self.registry.remove(id).is_some()
    }

    /// Number of registered runs.
    pub fn live_runs(&self) -> usize {
        self.registry.len()
    }

    pub fn run_ids(&self) -> Vec<RunId> {
        self.registry.ids()
    }
}
