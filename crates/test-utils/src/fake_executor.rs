use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use jobwire::errors::JobwireError;
use jobwire::exec::{ExecFuture, ExecutorBackend, RunWork};
use jobwire::types::LineLevel;
use serde_json::json;

/// What the fake executor does with a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behaviour {
    /// Start, log one line, set `{"job": <name>}` as result, finish.
    Complete,
    /// Touch nothing; the run stays `Pending` for the test to drive.
    Idle,
    /// Return an error without touching the run.
    Fail,
    /// Panic without touching the run.
    Panic,
}

/// A fake executor that:
/// - records which jobs were handed to it, in order
/// - behaves per job as configured, defaulting to one behaviour.
#[derive(Clone)]
pub struct FakeExecutor {
    default: Behaviour,
    overrides: HashMap<String, Behaviour>,
    executed: Arc<Mutex<Vec<String>>>,
}

impl FakeExecutor {
    pub fn new(default: Behaviour) -> Self {
        Self {
            default,
            overrides: HashMap::new(),
            executed: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_job_behaviour(mut self, job: &str, behaviour: Behaviour) -> Self {
        self.overrides.insert(job.to_string(), behaviour);
        self
    }

    /// Names of the jobs executed so far.
    pub fn executed(&self) -> Vec<String> {
        self.executed.lock().unwrap().clone()
    }

    /// Shared view of the execution record, usable after the executor has
    /// been moved into an engine.
    pub fn executed_log(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.executed)
    }
}

impl ExecutorBackend for FakeExecutor {
    fn execute(&self, work: RunWork) -> ExecFuture {
        let behaviour = self
            .overrides
            .get(&work.job.name)
            .copied()
            .unwrap_or(self.default);
        let executed = Arc::clone(&self.executed);

        Box::pin(async move {
            executed.lock().unwrap().push(work.job.name.clone());

            match behaviour {
                Behaviour::Complete => {
                    let reporter = work.reporter;
                    reporter.mark_started().await?;
                    reporter.add_log_line(LineLevel::Info, format!("ran {}", work.job.name))?;
                    reporter.set_result(json!({ "job": work.job.name })).await?;
                    reporter.mark_finished().await?;
                    Ok(())
                }
                Behaviour::Idle => Ok(()),
                Behaviour::Fail => Err(JobwireError::Other(anyhow::anyhow!(
                    "fake executor refused job '{}'",
                    work.job.name
                ))),
                Behaviour::Panic => panic!("fake executor crashed on job '{}'", work.job.name),
            }
        })
    }
}
