#![allow(dead_code)]

use jobwire::config::{Job, ProjectConfig, validate_config};
use jobwire::trigger::{CriteriaTrigger, CronTrigger, Trigger};
use serde_json::Value;

/// Builder for `ProjectConfig` to simplify test setup.
pub struct ProjectConfigBuilder {
    config: ProjectConfig,
}

impl ProjectConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: ProjectConfig::default(),
        }
    }

    pub fn with_job(mut self, job: Job) -> Self {
        self.config.jobs.push(job);
        self
    }

    /// Add a criteria trigger. `criteria` must be a JSON object.
    pub fn with_criteria_trigger(mut self, name: &str, criteria: Value) -> Self {
        let criteria = match criteria {
            Value::Object(map) => map,
            other => panic!("criteria for trigger '{name}' must be an object, got {other}"),
        };
        self.config
            .triggers
            .push(Trigger::Criteria(CriteriaTrigger::new(name, criteria)));
        self
    }

    pub fn with_cron_trigger(mut self, name: &str, cron: &str) -> Self {
        self.config
            .triggers
            .push(Trigger::Cron(CronTrigger::new(name, cron)));
        self
    }

    pub fn build(self) -> ProjectConfig {
        validate_config(&self.config).expect("Failed to build valid config from builder");
        self.config
    }
}

impl Default for ProjectConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `Job`.
pub struct JobBuilder {
    job: Job,
}

impl JobBuilder {
    /// A `shell` job running `true`, attached to `trigger`.
    pub fn new(name: &str, trigger: &str) -> Self {
        Self {
            job: Job::new(name, "true", "shell", trigger),
        }
    }

    pub fn expression(mut self, expression: &str) -> Self {
        self.job.expression = expression.to_string();
        self
    }

    pub fn language_pack(mut self, language_pack: &str) -> Self {
        self.job.language_pack = language_pack.to_string();
        self
    }

    pub fn credential(mut self, credential: Value) -> Self {
        self.job.credential = Some(credential);
        self
    }

    pub fn build(self) -> Job {
        self.job
    }
}
