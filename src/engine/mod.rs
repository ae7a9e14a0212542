// src/engine/mod.rs

//! Orchestration engine for jobwire.
//!
//! This module ties together:
//! - the run registry (identity → actor handle)
//! - the dispatcher that starts, registers and supervises run actors
//! - the broadcaster that turns messages and cron ticks into runs
//! - the [`Engine`] facade that bootstraps all of the above from options

pub mod broadcaster;
pub mod dispatcher;
pub mod instance;
pub mod registry;

pub use broadcaster::{Broadcaster, cron_seed};
pub use dispatcher::{DEFAULT_START_TIMEOUT, Dispatcher, IdAllocator};
pub use instance::{ConfigSource, Engine, EngineOptions};
pub use registry::{DEFAULT_SHARDS, RunRegistry};
