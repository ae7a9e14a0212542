#![allow(dead_code)]

use std::sync::Arc;

use jobwire::config::ProjectConfig;
use jobwire::engine::{Engine, EngineOptions};
use jobwire::exec::ExecutorBackend;
use jobwire::run::{Run, RunHandle};
use jobwire::types::RunId;

pub use jobwire_test_utils::builders::{JobBuilder, ProjectConfigBuilder};
pub use jobwire_test_utils::fake_executor::{Behaviour, FakeExecutor};
pub use jobwire_test_utils::{init_tracing, with_timeout};

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

/// Start an engine named "test" over `cfg`.
pub fn start_engine(cfg: ProjectConfig, executor: impl ExecutorBackend + 'static) -> Engine {
    Engine::start(
        EngineOptions::new().name("test").project_config(cfg),
        Arc::new(executor),
    )
    .expect("engine should start from a valid config")
}

/// Resolve `id`, wait for it to finish and return its final state.
pub async fn finished_run(engine: &Engine, id: &RunId) -> Run {
    let handle: RunHandle = engine.resolve(id).expect("run should be registered");
    with_timeout(handle.wait_finished())
        .await
        .expect("run actor should stay alive until finished");
    handle.get_state().await.expect("run actor should answer")
}
