// tests/report_runs.rs

mod common;

use std::time::Duration;

use jobwire::errors::JobwireError;
use jobwire::report_runs;
use jobwire::types::RunId;
use serde_json::json;

use common::{
    Behaviour, FakeExecutor, JobBuilder, ProjectConfigBuilder, TestResult, init_tracing,
    start_engine, with_timeout,
};

#[tokio::test]
async fn shutdown_interrupts_waiting_on_a_hung_run() -> TestResult {
    init_tracing();
    let cfg = ProjectConfigBuilder::new()
        .with_job(JobBuilder::new("quick", "t1").build())
        .with_job(JobBuilder::new("stuck", "t1").build())
        .with_criteria_trigger("t1", json!({}))
        .build();
    let executor =
        FakeExecutor::new(Behaviour::Complete).with_job_behaviour("stuck", Behaviour::Idle);
    let engine = start_engine(cfg, executor);

    let ids = engine
        .handle_message(json!({}).into())
        .await
        .into_iter()
        .collect::<Result<Vec<RunId>, _>>()?;
    assert_eq!(ids.len(), 2);

    let reported = with_timeout(report_runs(
        &engine,
        &ids,
        tokio::time::sleep(Duration::from_millis(200)),
    ))
    .await?;
    assert_eq!(reported, 1);

    // The finished run was released; the hung one is left in place.
    assert!(matches!(
        engine.resolve(&ids[0]),
        Err(JobwireError::RunNotFound(_))
    ));
    assert!(engine.resolve(&ids[1]).is_ok());
    Ok(())
}

#[tokio::test]
async fn all_runs_are_reported_when_they_finish() -> TestResult {
    let cfg = ProjectConfigBuilder::new()
        .with_job(JobBuilder::new("a", "t1").build())
        .with_job(JobBuilder::new("b", "t1").build())
        .with_criteria_trigger("t1", json!({}))
        .build();
    let engine = start_engine(cfg, FakeExecutor::new(Behaviour::Complete));

    let ids = engine
        .handle_message(json!({}).into())
        .await
        .into_iter()
        .collect::<Result<Vec<RunId>, _>>()?;

    let reported = with_timeout(report_runs(&engine, &ids, std::future::pending())).await?;
    assert_eq!(reported, 2);
    assert_eq!(engine.live_runs(), 0);
    Ok(())
}
