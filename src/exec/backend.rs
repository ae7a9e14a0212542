// src/exec/backend.rs

//! Pluggable executor backend abstraction.
//!
//! The dispatcher hands each accepted run to an `ExecutorBackend` instead of
//! evaluating job expressions itself. This keeps the engine agnostic of what
//! a job *is*, and makes it easy to swap in a fake executor in tests.
//!
//! - [`ShellExecutor`](super::ShellExecutor) is the implementation used by
//!   the `jobwire` binary.
//! - Tests provide their own backends that, for example, record which jobs
//!   ran and report completion straight away.

use std::future::Future;
use std::pin::Pin;

use serde_json::Value;

use crate::config::Job;
use crate::errors::Result;
use crate::run::RunHandle;
use crate::types::RunId;

/// Future returned by [`ExecutorBackend::execute`].
///
/// It is spawned onto its own task, so it must own everything it touches.
pub type ExecFuture = Pin<Box<dyn Future<Output = Result<()>> + Send + 'static>>;

/// Everything an executor needs to carry out one run.
#[derive(Debug, Clone)]
pub struct RunWork {
    pub id: RunId,
    pub job: Job,
    pub initial_state: Value,
    /// Where lifecycle events (log lines, status, result) are reported.
    pub reporter: RunHandle,
}

/// Trait abstracting how a run's job is executed.
pub trait ExecutorBackend: Send + Sync {
    /// Start executing `work`.
    ///
    /// The implementation is expected to report progress through
    /// `work.reporter` and to finish the run when done. Returning an error
    /// (or panicking) is caught by supervision and recorded on the run.
    fn execute(&self, work: RunWork) -> ExecFuture;
}
