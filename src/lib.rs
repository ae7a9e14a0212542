// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod run;
pub mod trigger;
pub mod types;

use std::cell::Cell;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde_json::{Value, json};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};

use crate::cli::CliArgs;
use crate::config::ProjectConfig;
use crate::config::loader::load_and_validate;
use crate::engine::{Engine, EngineOptions};
use crate::exec::ShellExecutor;
use crate::trigger::{Message, Trigger};
use crate::types::RunId;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - the engine with the shell executor
/// - newline-delimited JSON messages from stdin
/// - Ctrl-C handling
///
/// Each dispatched run id is printed to stdout as it is accepted. Once stdin
/// closes, the runs started by this process are awaited and a JSON snapshot
/// of each is printed.
pub async fn run(args: CliArgs) -> Result<()> {
    let config_path = PathBuf::from(&args.config);
    let cfg = load_and_validate(&config_path)
        .with_context(|| format!("loading project config from {}", config_path.display()))?;

    if args.dry_run {
        print_dry_run(&cfg);
        return Ok(());
    }

    let mut options = EngineOptions::new().project_config(cfg);
    if let Some(name) = args.name.clone() {
        options = options.name(name);
    }
    let engine = Engine::start(options, Arc::new(ShellExecutor::new()))?;

    let dispatched = read_messages(&engine).await?;
    report_runs(&engine, &dispatched, ctrl_c()).await?;

    info!(engine = %engine.name(), runs = dispatched.len(), "jobwire exiting");
    Ok(())
}

/// Feed stdin lines to the engine until EOF or Ctrl-C.
async fn read_messages(engine: &Engine) -> Result<Vec<RunId>> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut dispatched = Vec::new();

    loop {
        let line = tokio::select! {
            line = lines.next_line() => line.context("reading message from stdin")?,
            signal = tokio::signal::ctrl_c() => {
                signal.context("listening for Ctrl+C")?;
                info!("Ctrl+C received; no longer accepting messages");
                break;
            }
        };

        let Some(line) = line else {
            debug!("stdin closed");
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        let body: Value = match serde_json::from_str(&line) {
            Ok(body) => body,
            Err(e) => {
                warn!(error = %e, "ignoring message that is not valid JSON");
                continue;
            }
        };

        for outcome in engine.handle_message(Message::new(body)).await {
            match outcome {
                Ok(id) => {
                    println!("{id}");
                    dispatched.push(id);
                }
                Err(e) => warn!(error = %e, "run was not dispatched"),
            }
        }
    }

    Ok(dispatched)
}

/// Wait for each of `ids` to finish, print its snapshot and release it.
///
/// Stops early, leaving the remaining runs registered, once `shutdown`
/// resolves. Returns how many runs were reported.
pub async fn report_runs<S>(engine: &Engine, ids: &[RunId], shutdown: S) -> Result<usize>
where
    S: Future<Output = ()>,
{
    let reported = Cell::new(0);
    let reporting = async {
        for id in ids {
            let handle = engine.resolve(id)?;
            handle.wait_finished().await?;
            let snapshot = handle.get_state().await?;
            println!("{}", json!({ "run_id": id, "run": snapshot }));
            engine.release(id);
            reported.set(reported.get() + 1);
        }
        Ok::<_, anyhow::Error>(())
    };

    tokio::select! {
        outcome = reporting => outcome?,
        () = shutdown => {
            warn!(
                pending = ids.len() - reported.get(),
                "shutdown requested; no longer waiting for runs"
            );
        }
    }

    Ok(reported.get())
}

/// Resolves on Ctrl-C. Never resolves if the signal cannot be listened for.
async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "cannot listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    info!("Ctrl+C received");
}

/// Simple dry-run output: print jobs and triggers.
fn print_dry_run(cfg: &ProjectConfig) {
    println!("jobwire dry-run");
    println!();

    println!("triggers ({}):", cfg.triggers.len());
    for trigger in cfg.triggers.iter() {
        match trigger {
            Trigger::Criteria(t) => {
                println!("  - {}", t.name);
                println!("      criteria: {}", Value::Object(t.criteria.clone()));
            }
            Trigger::Cron(t) => {
                println!("  - {}", t.name);
                println!("      cron: {}", t.cron);
            }
        }
    }
    println!();

    println!("jobs ({}):", cfg.jobs.len());
    for job in cfg.jobs.iter() {
        println!("  - {}", job.name);
        println!("      trigger: {}", job.trigger);
        println!("      language_pack: {}", job.language_pack);
        println!("      expression: {}", job.expression);
        if job.credential.is_some() {
            println!("      credential: <set>");
        }
    }

    debug!("dry-run complete (no engine started)");
}
