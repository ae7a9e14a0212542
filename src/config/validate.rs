// src/config/validate.rs

use tracing::warn;

use crate::config::model::{RawConfigFile, RawJob};
use crate::config::project::{Job, ProjectConfig};
use crate::errors::{JobwireError, Result};
use crate::trigger::Trigger;
use crate::trigger::schedule::parse_schedule;

impl TryFrom<RawConfigFile> for ProjectConfig {
    type Error = crate::errors::JobwireError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        let mut triggers = Vec::with_capacity(raw.triggers.len());
        for (name, entry) in raw.triggers.iter() {
            triggers.push(Trigger::from_parts(
                name,
                entry.criteria.as_deref(),
                entry.cron.as_deref(),
            )?);
        }

        let mut jobs = Vec::with_capacity(raw.jobs.len());
        for (name, entry) in raw.jobs {
            jobs.push(job_from_raw(name, entry)?);
        }

        let config = ProjectConfig::new(jobs, triggers);
        validate_config(&config)?;
        Ok(config)
    }
}

/// Semantic checks on an assembled [`ProjectConfig`].
///
/// Hard errors: empty or non URL-safe job names, empty expressions or
/// language packs, cron triggers whose schedule does not parse. A job naming a trigger that does not exist is only
/// warned about, since such a job can simply never run.
pub fn validate_config(cfg: &ProjectConfig) -> Result<()> {
    validate_job_fields(cfg)?;
    validate_cron_triggers(cfg)?;
    warn_dangling_triggers(cfg);
    Ok(())
}

fn job_from_raw(name: String, raw: RawJob) -> Result<Job> {
    let credential = raw
        .credential
        .map(serde_json::to_value)
        .transpose()
        .map_err(|e| {
            JobwireError::ConfigError(format!("job '{name}' has an unusable credential: {e}"))
        })?;

    Ok(Job {
        name,
        expression: raw.expression,
        credential,
        language_pack: raw.language_pack,
        trigger: raw.trigger,
    })
}

fn validate_job_fields(cfg: &ProjectConfig) -> Result<()> {
    for job in cfg.jobs.iter() {
        if !is_url_safe(&job.name) {
            return Err(JobwireError::ConfigError(format!(
                "job name '{}' must be non-empty and URL-safe (A-Z a-z 0-9 - _ . ~)",
                job.name
            )));
        }
        if job.expression.trim().is_empty() {
            return Err(JobwireError::ConfigError(format!(
                "job '{}' has an empty `expression`",
                job.name
            )));
        }
        if job.language_pack.trim().is_empty() {
            return Err(JobwireError::ConfigError(format!(
                "job '{}' has an empty `language_pack`",
                job.name
            )));
        }
    }
    Ok(())
}

fn validate_cron_triggers(cfg: &ProjectConfig) -> Result<()> {
    for trigger in cfg.cron_triggers() {
        parse_schedule(&trigger.cron).map_err(|e| {
            JobwireError::ConfigError(format!("trigger '{}': {e}", trigger.name))
        })?;
    }
    Ok(())
}

fn warn_dangling_triggers(cfg: &ProjectConfig) {
    for job in cfg.jobs.iter() {
        if cfg.trigger(&job.trigger).is_none() {
            warn!(
                job = %job.name,
                trigger = %job.trigger,
                "job references an unknown trigger; it will never run"
            );
        }
    }
}

fn is_url_safe(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '~'))
}
