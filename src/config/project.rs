// src/config/project.rs

//! The validated, read-only project view: jobs, triggers, and the lookup
//! from "triggers that fired" to "jobs that should run".

use serde::Serialize;
use serde_json::Value;

use crate::trigger::{CriteriaTrigger, CronTrigger, Trigger, TriggerKind};

/// A named, triggerable unit of work.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Job {
    pub name: String,
    pub expression: String,
    /// Opaque; never echoed in run snapshots.
    #[serde(skip_serializing)]
    pub credential: Option<Value>,
    pub language_pack: String,
    /// Name of the trigger that activates this job.
    pub trigger: String,
}

impl Job {
    pub fn new(
        name: impl Into<String>,
        expression: impl Into<String>,
        language_pack: impl Into<String>,
        trigger: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            expression: expression.into(),
            credential: None,
            language_pack: language_pack.into(),
            trigger: trigger.into(),
        }
    }

    pub fn with_credential(mut self, credential: Value) -> Self {
        self.credential = Some(credential);
        self
    }
}

/// Jobs and triggers, in declaration order.
///
/// Names are not deduplicated: two jobs sharing a name, or two triggers
/// sharing a name, are kept as separate entries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectConfig {
    pub jobs: Vec<Job>,
    pub triggers: Vec<Trigger>,
}

impl ProjectConfig {
    pub fn new(jobs: Vec<Job>, triggers: Vec<Trigger>) -> Self {
        Self { jobs, triggers }
    }

    /// Every job whose `trigger` names one of `triggers`, in job order.
    ///
    /// A job appears once per matching job entry; it is not repeated when
    /// several of `triggers` share its trigger name.
    pub fn jobs_for<'a, I>(&self, triggers: I) -> Vec<&Job>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let names: Vec<&str> = triggers.into_iter().collect();
        self.jobs
            .iter()
            .filter(|job| names.contains(&job.trigger.as_str()))
            .collect()
    }

    pub fn triggers_of_kind(&self, kind: TriggerKind) -> Vec<&Trigger> {
        self.triggers.iter().filter(|t| t.kind() == kind).collect()
    }

    pub fn criteria_triggers(&self) -> impl Iterator<Item = &CriteriaTrigger> {
        self.triggers.iter().filter_map(Trigger::as_criteria)
    }

    pub fn cron_triggers(&self) -> impl Iterator<Item = &CronTrigger> {
        self.triggers.iter().filter_map(Trigger::as_cron)
    }

    pub fn trigger(&self, name: &str) -> Option<&Trigger> {
        self.triggers.iter().find(|t| t.name() == name)
    }
}
