// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `jobwire`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "jobwire",
    version,
    about = "Run declared jobs in response to inbound JSON messages.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the project config file (TOML).
    #[arg(long, value_name = "PATH", default_value = "Jobwire.toml")]
    pub config: String,

    /// Unique name of this engine instance.
    #[arg(long, value_name = "NAME", env = "JOBWIRE_NAME")]
    pub name: Option<String>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `JOBWIRE_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Parse + validate, print jobs and triggers, but don't start the engine.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
