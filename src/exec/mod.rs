// src/exec/mod.rs

//! Execution layer.
//!
//! The engine never evaluates a job's expression itself; it hands each run
//! to an [`ExecutorBackend`] under a per-run supervision scope.
//!
//! - [`backend`] provides the `ExecutorBackend` trait and the `RunWork`
//!   handed to it.
//! - [`supervisor`] runs the executor on its own task and records failures
//!   and panics on the run.
//! - [`shell`] is the `shell` language pack used by the `jobwire` binary.

pub mod backend;
pub mod shell;
pub mod supervisor;

pub use backend::{ExecFuture, ExecutorBackend, RunWork};
pub use shell::{SHELL_LANGUAGE_PACK, ShellExecutor};
pub use supervisor::supervise;
