// src/engine/broadcaster.rs

//! Single entry point for inbound events.
//!
//! Messages go through criteria matching; cron ticks skip it. Both paths
//! then resolve jobs, create one [`Run`] per job and dispatch each.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::{Value, json};
use tracing::{debug, info, warn};

use crate::config::{Job, ProjectConfig};
use crate::errors::Result;
use crate::run::Run;
use crate::trigger::{CronTrigger, Message, match_triggers};
use crate::types::RunId;

use super::dispatcher::Dispatcher;

#[derive(Debug, Clone)]
pub struct Broadcaster {
    config: Arc<ProjectConfig>,
    dispatcher: Arc<Dispatcher>,
}

impl Broadcaster {
    pub fn new(config: Arc<ProjectConfig>, dispatcher: Arc<Dispatcher>) -> Self {
        Self { config, dispatcher }
    }

    /// Match `message` against the configured criteria triggers and dispatch
    /// one run per resolved job, in job order.
    ///
    /// Returns one result per job once every dispatch has been accepted.
    /// A failed dispatch does not stop the others.
    pub async fn handle_message(&self, message: &Message) -> Vec<Result<RunId>> {
        let matched = match_triggers(self.config.criteria_triggers(), message);
        if matched.is_empty() {
            debug!("message matched no triggers");
            return Vec::new();
        }

        let trigger_names: Vec<&str> = matched.iter().map(|t| t.name.as_str()).collect();
        let jobs = self.config.jobs_for(trigger_names.iter().copied());
        debug!(triggers = ?trigger_names, jobs = jobs.len(), "message matched triggers");

        self.dispatch_jobs(&jobs, &message.body).await
    }

    /// Dispatch every job of `config` attached to `trigger`, without any
    /// message matching. Called by an external cron source.
    pub async fn handle_trigger(
        &self,
        config: &ProjectConfig,
        trigger: &CronTrigger,
    ) -> Vec<Result<RunId>> {
        let jobs = config.jobs_for([trigger.name.as_str()]);
        info!(
            trigger = %trigger.name,
            cron = %trigger.cron,
            jobs = jobs.len(),
            "cron trigger fired"
        );

        let seed = cron_seed(trigger, Utc::now());
        self.dispatch_jobs(&jobs, &seed).await
    }

    async fn dispatch_jobs(&self, jobs: &[&Job], initial_state: &Value) -> Vec<Result<RunId>> {
        let mut results = Vec::with_capacity(jobs.len());

        for job in jobs {
            let run = Run::new((*job).clone(), initial_state.clone());
            let outcome = self.dispatcher.invoke_run(run).await;
            if let Err(err) = &outcome {
                warn!(job = %job.name, error = %err, "dispatch failed");
            }
            results.push(outcome);
        }

        results
    }
}

/// Initial state for runs started by a cron tick.
pub fn cron_seed(trigger: &CronTrigger, fired_at: DateTime<Utc>) -> Value {
    json!({
        "trigger": trigger.name,
        "cron": trigger.cron,
        "fired_at": fired_at.to_rfc3339(),
    })
}
