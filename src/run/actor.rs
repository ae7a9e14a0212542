// src/run/actor.rs

//! Per-run actor.
//!
//! Each run is owned by exactly one Tokio task. Every operation reaches it
//! through a single unbounded inbox, so operations are applied strictly in
//! arrival order and never overlap. Callers talk to the task through a
//! [`RunHandle`]:
//!
//! - acknowledged operations (`mark_started`, `mark_finished`, `set_result`,
//!   `add_run_spec`, `get_state`) carry a `oneshot` reply and return only once
//!   the operation has been applied;
//! - `add_log_line` only enqueues and returns immediately.
//!
//! The task exits when the last handle is dropped.

use serde_json::Value;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, trace};

use super::transitions::{self, RunOp};
use super::{Run, RunStatus};
use crate::errors::{JobwireError, Result};
use crate::types::{LineLevel, RunId};

enum RunCommand {
    Snapshot {
        reply: oneshot::Sender<Run>,
    },
    Apply {
        op: RunOp,
        /// `None` for fire-and-forget operations.
        ack: Option<oneshot::Sender<()>>,
    },
}

impl std::fmt::Debug for RunCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunCommand::Snapshot { .. } => f.write_str("Snapshot"),
            RunCommand::Apply { op, ack } => f
                .debug_struct("Apply")
                .field("op", op)
                .field("acknowledged", &ack.is_some())
                .finish(),
        }
    }
}

/// A freshly spawned actor, not yet known to anyone but its creator.
pub struct SpawnedActor {
    pub handle: RunHandle,
    /// Fires once the actor task has entered its loop.
    pub ready: oneshot::Receiver<()>,
    /// Resolves to the final run once every handle is dropped.
    pub task: JoinHandle<Run>,
}

pub struct RunActor {
    id: RunId,
    run: Run,
    inbox: mpsc::UnboundedReceiver<RunCommand>,
    status_tx: watch::Sender<RunStatus>,
}

impl RunActor {
    /// Spawn the actor task owning `run` under `id`.
    pub fn spawn(id: RunId, run: Run) -> SpawnedActor {
        let (tx, inbox) = mpsc::unbounded_channel();
        let (status_tx, status_rx) = watch::channel(run.status);
        let (ready_tx, ready) = oneshot::channel();

        let actor = RunActor {
            id,
            run,
            inbox,
            status_tx,
        };
        let task = tokio::spawn(actor.run_loop(ready_tx));

        SpawnedActor {
            handle: RunHandle {
                id,
                tx,
                status: status_rx,
            },
            ready,
            task,
        }
    }

    async fn run_loop(self, ready: oneshot::Sender<()>) -> Run {
        let RunActor {
            id,
            mut run,
            mut inbox,
            status_tx,
        } = self;

        // The dispatcher may have given up waiting; that is its call to make.
        let _ = ready.send(());
        debug!(run_id = %id, job = %run.job.name, "run actor started");

        while let Some(command) = inbox.recv().await {
            match command {
                RunCommand::Snapshot { reply } => {
                    let _ = reply.send(run.clone());
                }
                RunCommand::Apply { op, ack } => {
                    trace!(run_id = %id, ?op, "applying run operation");
                    run = transitions::apply(run, op);

                    let status = run.status;
                    status_tx.send_if_modified(|current| {
                        if *current != status {
                            *current = status;
                            true
                        } else {
                            false
                        }
                    });

                    if let Some(ack) = ack {
                        let _ = ack.send(());
                    }
                }
            }
        }

        debug!(run_id = %id, status = ?run.status, "all run handles dropped; actor exiting");
        run
    }
}

/// Cloneable address of a live run actor.
#[derive(Debug, Clone)]
pub struct RunHandle {
    id: RunId,
    tx: mpsc::UnboundedSender<RunCommand>,
    status: watch::Receiver<RunStatus>,
}

impl RunHandle {
    pub fn id(&self) -> RunId {
        self.id
    }

    /// Whether the actor task is still accepting operations.
    pub fn is_alive(&self) -> bool {
        !self.tx.is_closed()
    }

    /// Last status the actor published. Does not go through the inbox.
    pub fn status(&self) -> RunStatus {
        *self.status.borrow()
    }

    pub async fn get_state(&self) -> Result<Run> {
        let (reply, rx) = oneshot::channel();
        self.send(RunCommand::Snapshot { reply })?;
        rx.await.map_err(|_| JobwireError::RunGone(self.id))
    }

    pub async fn mark_started(&self) -> Result<()> {
        self.request(RunOp::MarkStarted).await
    }

    pub async fn mark_finished(&self) -> Result<()> {
        self.request(RunOp::MarkFinished).await
    }

    pub async fn set_result(&self, value: Value) -> Result<()> {
        self.request(RunOp::SetResult(value)).await
    }

    pub async fn add_run_spec(&self, spec: Value) -> Result<()> {
        self.request(RunOp::AddRunSpec(spec)).await
    }

    /// Fire-and-forget: enqueue a log line and return without waiting for
    /// it to be applied. Fails only if the actor is already gone.
    pub fn add_log_line(&self, level: LineLevel, text: impl Into<String>) -> Result<()> {
        self.send(RunCommand::Apply {
            op: RunOp::AddLogLine {
                level,
                text: text.into(),
            },
            ack: None,
        })
    }

    /// Record a supervision-observed failure and finish the run.
    pub async fn record_failure(&self, reason: impl Into<String>) -> Result<()> {
        self.request(RunOp::RecordFailure(reason.into())).await
    }

    /// Wait until the run reaches `Finished`.
    pub async fn wait_finished(&self) -> Result<()> {
        let mut status = self.status.clone();
        status
            .wait_for(|s| *s == RunStatus::Finished)
            .await
            .map(|_| ())
            .map_err(|_| JobwireError::RunGone(self.id))
    }

    async fn request(&self, op: RunOp) -> Result<()> {
        let (ack, rx) = oneshot::channel();
        self.send(RunCommand::Apply { op, ack: Some(ack) })?;
        rx.await.map_err(|_| JobwireError::RunGone(self.id))
    }

    fn send(&self, command: RunCommand) -> Result<()> {
        self.tx
            .send(command)
            .map_err(|_| JobwireError::RunGone(self.id))
    }
}
