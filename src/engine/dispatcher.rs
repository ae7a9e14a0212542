// src/engine/dispatcher.rs

//! Turns an accepted [`Run`] into a live, registered, supervised actor.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::errors::{JobwireError, Result};
use crate::exec::{ExecutorBackend, RunWork, supervise};
use crate::run::{Run, RunActor};
use crate::types::RunId;

use super::registry::RunRegistry;

pub const DEFAULT_START_TIMEOUT: Duration = Duration::from_secs(5);

/// Source of fresh run identities.
pub type IdAllocator = Arc<dyn Fn() -> RunId + Send + Sync>;

pub struct Dispatcher {
    registry: Arc<RunRegistry>,
    executor: Arc<dyn ExecutorBackend>,
    allocate_id: IdAllocator,
    start_timeout: Duration,
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("registry", &self.registry)
            .field("start_timeout", &self.start_timeout)
            .finish_non_exhaustive()
    }
}

impl Dispatcher {
    pub fn new(registry: Arc<RunRegistry>, executor: Arc<dyn ExecutorBackend>) -> Self {
        Self {
            registry,
            executor,
            allocate_id: Arc::new(RunId::new),
            start_timeout: DEFAULT_START_TIMEOUT,
        }
    }

    /// How long `invoke_run` waits for a new actor to come up.
    pub fn with_start_timeout(mut self, start_timeout: Duration) -> Self {
        self.start_timeout = start_timeout;
        self
    }

    /// Replace the random identity scheme (e.g. with a counter).
    pub fn with_id_allocator(mut self, allocate_id: IdAllocator) -> Self {
        self.allocate_id = allocate_id;
        self
    }

    pub fn registry(&self) -> &Arc<RunRegistry> {
        &self.registry
    }

    /// Accept `run`: allocate an identity, start its actor, register it and
    /// hand it to the executor.
    ///
    /// Returns once the run is registered and its actor is running; it does
    /// not wait for the job itself. On error no actor is left running and
    /// the executor never sees the run.
    pub async fn invoke_run(&self, run: Run) -> Result<RunId> {
        self.invoke_run_within(run, self.start_timeout).await
    }

    /// Like [`invoke_run`](Self::invoke_run) with a caller-supplied bound on
    /// actor start-up.
    pub async fn invoke_run_within(&self, run: Run, start_timeout: Duration) -> Result<RunId> {
        let id = (self.allocate_id)();
        let job = run.job.clone();
        let initial_state = run.initial_state.clone();

        if self.registry.contains(&id) {
            return Err(JobwireError::dispatch_failed(
                &job.name,
                format!("run identity {id} is already registered"),
            ));
        }

        let spawned = RunActor::spawn(id, run);

        match timeout(start_timeout, spawned.ready).await {
            Ok(Ok(())) => {}
            Ok(Err(_)) => {
                spawned.task.abort();
                return Err(JobwireError::dispatch_failed(
                    &job.name,
                    "run actor exited before it was ready",
                ));
            }
            Err(_) => {
                spawned.task.abort();
                return Err(JobwireError::dispatch_failed(
                    &job.name,
                    format!("run actor did not start within {start_timeout:?}"),
                ));
            }
        }

        // Another dispatch may have claimed the id while we were starting.
        if !self.registry.insert(spawned.handle.clone()) {
            spawned.task.abort();
            warn!(run_id = %id, job = %job.name, "run identity collision");
            return Err(JobwireError::dispatch_failed(
                &job.name,
                format!("run identity {id} is already registered"),
            ));
        }

        debug!(run_id = %id, job = %job.name, "run actor registered; handing to executor");

        let job_name = job.name.clone();
        let work = RunWork {
            id,
            job,
            initial_state,
            reporter: spawned.handle,
        };
        supervise(Arc::clone(&self.executor), work, spawned.task);

        info!(run_id = %id, job = %job_name, "run dispatched");
        Ok(id)
    }
}
