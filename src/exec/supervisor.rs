// src/exec/supervisor.rs

//! Per-run failure boundary.
//!
//! Every dispatched run gets its own supervising task. It runs the executor
//! on a separate task, so an executor error or panic is observed here and
//! recorded on the run instead of unwinding into the dispatcher. Once the
//! executor is done it keeps watching the actor task and reports if that
//! one crashed.

use std::sync::Arc;

use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, error, warn};

use super::backend::{ExecutorBackend, RunWork};
use crate::run::{Run, RunHandle};

/// Spawn the supervision scope for one run.
pub fn supervise(
    executor: Arc<dyn ExecutorBackend>,
    work: RunWork,
    actor: JoinHandle<Run>,
) -> JoinHandle<()> {
    let reporter = work.reporter.clone();
    let job = work.job.name.clone();

    tokio::spawn(async move {
        // Calling `execute` inside the task keeps a panic in the call itself
        // inside this boundary too.
        let execution = tokio::spawn(async move { executor.execute(work).await });

        match execution.await {
            Ok(Ok(())) => {
                debug!(run_id = %reporter.id(), job = %job, "executor finished");
            }
            Ok(Err(err)) => {
                warn!(run_id = %reporter.id(), job = %job, error = %err, "executor failed");
                record(&reporter, format!("executor failed: {err}")).await;
            }
            Err(join_err) => {
                let reason = describe_join_error(join_err, "executor");
                error!(run_id = %reporter.id(), job = %job, reason = %reason, "executor crashed");
                record(&reporter, reason).await;
            }
        }

        let id = reporter.id();
        // Our own handle must not keep the actor alive.
        drop(reporter);

        match actor.await {
            Ok(run) => {
                debug!(run_id = %id, job = %job, status = ?run.status, "run actor stopped");
            }
            Err(join_err) => {
                error!(
                    run_id = %id,
                    job = %job,
                    reason = %describe_join_error(join_err, "run actor"),
                    "run actor crashed"
                );
            }
        }
    })
}

async fn record(reporter: &RunHandle, reason: String) {
    if let Err(err) = reporter.record_failure(reason).await {
        warn!(
            run_id = %reporter.id(),
            error = %err,
            "could not record executor failure on run"
        );
    }
}

fn describe_join_error(err: JoinError, what: &str) -> String {
    if err.is_cancelled() {
        return format!("{what} was cancelled");
    }

    let payload = err.into_panic();
    let message = payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "non-string panic payload".to_string());
    format!("{what} panicked: {message}")
}
