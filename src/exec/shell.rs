// src/exec/shell.rs

//! Executor for the `shell` language pack.

use std::process::Stdio;

use anyhow::{Context, Result, bail};
use serde_json::json;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::Command;
use tracing::{debug, info, warn};

use super::backend::{ExecFuture, ExecutorBackend, RunWork};
use crate::run::RunHandle;
use crate::types::LineLevel;

pub const SHELL_LANGUAGE_PACK: &str = "shell";

/// Runs a job's expression with `sh -c`.
///
/// - The run's initial state is written to the process's stdin as JSON.
/// - `JOBWIRE_RUN_ID` and `JOBWIRE_JOB` are set in its environment.
/// - stdout lines become `info` log lines on the run, stderr lines `warn`.
/// - The exit status becomes the run's result: `{"exit_code", "success"}`,
///   plus `"signal"` when the process was killed by one.
///
/// Jobs with any other language pack are rejected, which supervision
/// records as a failed run.
#[derive(Debug, Clone, Default)]
pub struct ShellExecutor;

impl ShellExecutor {
    pub fn new() -> Self {
        ShellExecutor
    }
}

impl ExecutorBackend for ShellExecutor {
    fn execute(&self, work: RunWork) -> ExecFuture {
        Box::pin(async move { run_shell(work).await.map_err(Into::into) })
    }
}

async fn run_shell(work: RunWork) -> Result<()> {
    let RunWork {
        id,
        job,
        initial_state,
        reporter,
    } = work;

    if job.language_pack != SHELL_LANGUAGE_PACK {
        bail!(
            "unsupported language pack '{}' for job '{}' (expected '{}')",
            job.language_pack,
            job.name,
            SHELL_LANGUAGE_PACK
        );
    }

    reporter
        .add_run_spec(json!({
            "language_pack": SHELL_LANGUAGE_PACK,
            "program": "sh",
            "args": ["-c", job.expression],
        }))
        .await?;
    reporter.mark_started().await?;

    info!(run_id = %id, job = %job.name, expression = %job.expression, "starting job process");

    let mut child = Command::new("sh")
        .arg("-c")
        .arg(&job.expression)
        .env("JOBWIRE_RUN_ID", id.to_string())
        .env("JOBWIRE_JOB", &job.name)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .with_context(|| format!("spawning process for job '{}'", job.name))?;

    // Feed the initial state without blocking on a process that never
    // reads its stdin.
    if let Some(mut stdin) = child.stdin.take() {
        let payload = serde_json::to_vec(&initial_state)?;
        let job_name = job.name.clone();
        tokio::spawn(async move {
            if let Err(e) = stdin.write_all(&payload).await {
                debug!(job = %job_name, error = %e, "process did not consume initial state");
            }
        });
    }

    let stdout = child
        .stdout
        .take()
        .map(|out| tokio::spawn(forward_lines(out, reporter.clone(), LineLevel::Info)));
    let stderr = child
        .stderr
        .take()
        .map(|err| tokio::spawn(forward_lines(err, reporter.clone(), LineLevel::Warn)));

    let status = child
        .wait()
        .await
        .with_context(|| format!("waiting for process of job '{}'", job.name))?;

    // Every output line must be enqueued before the result and `Finished`.
    for forwarder in [stdout, stderr].into_iter().flatten() {
        if let Err(e) = forwarder.await {
            warn!(run_id = %id, error = %e, "output forwarder failed");
        }
    }

    let code = status.code().unwrap_or(-1);
    let signal = exit_signal(&status);
    info!(
        run_id = %id,
        job = %job.name,
        exit_code = code,
        signal = ?signal,
        success = status.success(),
        "job process exited"
    );

    let mut result = json!({ "exit_code": code, "success": status.success() });
    if let Some(signal) = signal {
        result["signal"] = json!(signal);
    }
    reporter.set_result(result).await?;
    reporter.mark_finished().await?;

    Ok(())
}

/// Forward `reader` line by line until EOF.
///
/// Invalid UTF-8 is replaced rather than treated as the end of output, and
/// the pipe is drained even after the run stops accepting lines, so the
/// process never writes into a closed pipe.
async fn forward_lines<R>(reader: R, reporter: RunHandle, level: LineLevel)
where
    R: tokio::io::AsyncRead + Unpin,
{
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();
    let mut accepting = true;

    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                debug!(run_id = %reporter.id(), error = %e, "stopped reading job output");
                break;
            }
        }
        if !accepting {
            continue;
        }

        let line = String::from_utf8_lossy(trim_line_end(&buf)).into_owned();
        if reporter.add_log_line(level, line).is_err() {
            accepting = false;
        }
    }
}

fn trim_line_end(mut line: &[u8]) -> &[u8] {
    if let [rest @ .., b'\n'] = line {
        line = rest;
    }
    if let [rest @ .., b'\r'] = line {
        line = rest;
    }
    line
}

#[cfg(unix)]
fn exit_signal(status: &std::process::ExitStatus) -> Option<i32> {
    use std::os::unix::process::ExitStatusExt;
    status.signal()
}

#[cfg(not(unix))]
fn exit_signal(_status: &std::process::ExitStatus) -> Option<i32> {
    None
}
