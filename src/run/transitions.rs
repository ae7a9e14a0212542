// src/run/transitions.rs

//! Pure state transitions for a [`Run`].
//!
//! Each function consumes the current run and returns the next one. The
//! actor is the only caller in production; tests drive these directly.

use serde_json::{Value, json};

use super::{LogLine, Run, RunStatus};
use crate::types::LineLevel;

/// A mutation that can be applied to a run.
#[derive(Debug, Clone, PartialEq)]
pub enum RunOp {
    MarkStarted,
    MarkFinished,
    SetResult(Value),
    AddLogLine { level: LineLevel, text: String },
    AddRunSpec(Value),
    /// Record a failure observed by supervision: an error log line, an
    /// error-shaped result unless one is already set, and `Finished`.
    RecordFailure(String),
}

pub fn apply(run: Run, op: RunOp) -> Run {
    match op {
        RunOp::MarkStarted => mark_started(run),
        RunOp::MarkFinished => mark_finished(run),
        RunOp::SetResult(value) => set_result(run, value),
        RunOp::AddLogLine { level, text } => add_log_line(run, level, text),
        RunOp::AddRunSpec(spec) => add_run_spec(run, spec),
        RunOp::RecordFailure(reason) => record_failure(run, reason),
    }
}

/// `Pending -> Started`. Already started or finished runs are unchanged.
pub fn mark_started(mut run: Run) -> Run {
    if run.status == RunStatus::Pending {
        run.status = RunStatus::Started;
    }
    run
}

pub fn mark_finished(mut run: Run) -> Run {
    run.status = RunStatus::Finished;
    run
}

pub fn set_result(mut run: Run, value: Value) -> Run {
    run.result = Some(value);
    run
}

pub fn add_log_line(mut run: Run, level: LineLevel, text: String) -> Run {
    run.log.push(LogLine { level, text });
    run
}

pub fn add_run_spec(mut run: Run, spec: Value) -> Run {
    run.run_spec.push(spec);
    run
}

pub fn record_failure(run: Run, reason: String) -> Run {
    let mut run = add_log_line(run, LineLevel::Error, reason.clone());
    if run.result.is_none() {
        run.result = Some(json!({ "error": reason }));
    }
    mark_finished(run)
}
