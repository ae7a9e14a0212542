// src/run/mod.rs

//! Runs: one concrete invocation of a job.
//!
//! - [`transitions`] holds the pure `(Run, op) -> Run` state machine.
//! - [`actor`] wraps a single run in a task that applies operations one at
//!   a time, in arrival order, and hands out cloneable [`RunHandle`]s.

pub mod actor;
pub mod transitions;

use serde::Serialize;
use serde_json::Value;

use crate::config::Job;
use crate::types::LineLevel;

pub use actor::{RunActor, RunHandle};
pub use transitions::{RunOp, apply};

/// Lifecycle of a run. Only ever moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Pending,
    Started,
    Finished,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogLine {
    pub level: LineLevel,
    pub text: String,
}

/// Mutable execution state of one job invocation.
///
/// `job` and `initial_state` are fixed at creation; everything else changes
/// only through [`transitions`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Run {
    pub job: Job,
    pub initial_state: Value,
    pub status: RunStatus,
    pub log: Vec<LogLine>,
    pub result: Option<Value>,
    pub run_spec: Vec<Value>,
}

impl Run {
    pub fn new(job: Job, initial_state: Value) -> Self {
        Self {
            job,
            initial_state,
            status: RunStatus::Pending,
            log: Vec::new(),
            result: None,
            run_spec: Vec::new(),
        }
    }

    pub fn is_finished(&self) -> bool {
        self.status == RunStatus::Finished
    }
}
