// tests/config_loading.rs

mod common;

use std::error::Error;
use std::io::Write;

use jobwire::config::loader::{load_and_validate, load_from_str};
use jobwire::config::ProjectConfig;
use jobwire::errors::JobwireError;
use jobwire::trigger::{Trigger, TriggerKind};
use serde_json::json;
use tempfile::NamedTempFile;

use common::{JobBuilder, ProjectConfigBuilder, TestResult, init_tracing};

fn write_config(contents: &str) -> Result<NamedTempFile, Box<dyn Error>> {
    let mut file = NamedTempFile::new()?;
    file.write_all(contents.as_bytes())?;
    Ok(file)
}

fn parse(contents: &str) -> jobwire::errors::Result<ProjectConfig> {
    ProjectConfig::try_from(load_from_str(contents)?)
}

fn assert_config_error(result: jobwire::errors::Result<ProjectConfig>, needle: &str) {
    match result {
        Err(JobwireError::ConfigError(msg)) => {
            assert!(msg.contains(needle), "unexpected message: {msg}");
        }
        other => panic!("expected a configuration error mentioning '{needle}', got {other:?}"),
    }
}

const PROJECT: &str = r#"
[jobs.notify-signup]
expression = "echo signup"
language_pack = "shell"
trigger = "on-signup"

[jobs.audit]
expression = "echo audit"
language_pack = "shell"
trigger = "on-signup"
credential = { vault = "audit", key = "token" }

[jobs.nightly-report]
expression = "echo report"
language_pack = "shell"
trigger = "nightly"

[triggers.on-signup]
criteria = '{"type": "signup", "user": {"plan": "pro"}}'

[triggers.nightly]
cron = "0 3 * * *"
"#;

#[test]
fn loads_and_validates_a_project_file() -> TestResult {
    init_tracing();

    let file = write_config(PROJECT)?;
    let cfg = load_and_validate(file.path())?;

    let job_names: Vec<&str> = cfg.jobs.iter().map(|j| j.name.as_str()).collect();
    assert_eq!(job_names, vec!["audit", "nightly-report", "notify-signup"]);

    let on_signup = cfg
        .trigger("on-signup")
        .and_then(Trigger::as_criteria)
        .expect("on-signup should be a criteria trigger");
    assert_eq!(
        serde_json::Value::Object(on_signup.criteria.clone()),
        json!({"type": "signup", "user": {"plan": "pro"}})
    );

    let nightly = cfg
        .trigger("nightly")
        .and_then(Trigger::as_cron)
        .expect("nightly should be a cron trigger");
    assert_eq!(nightly.cron, "0 3 * * *");

    Ok(())
}

#[test]
fn credential_is_passed_through_as_json() -> TestResult {
    let cfg = parse(PROJECT)?;
    let audit = cfg
        .jobs
        .iter()
        .find(|j| j.name == "audit")
        .expect("audit job should exist");

    assert_eq!(
        audit.credential,
        Some(json!({"vault": "audit", "key": "token"}))
    );

    // Run snapshots must never echo the credential.
    let serialized = serde_json::to_value(audit)?;
    assert!(serialized.get("credential").is_none());

    Ok(())
}

#[test]
fn missing_file_is_an_io_error() {
    let result = load_and_validate("/definitely/not/here/Jobwire.toml");
    assert!(matches!(result, Err(JobwireError::IoError(_))));
}

#[test]
fn malformed_toml_is_a_toml_error() {
    let result = load_from_str("[jobs.a\nexpression = ");
    assert!(matches!(result, Err(JobwireError::TomlError(_))));
}

#[test]
fn trigger_with_neither_field_is_rejected() {
    assert_config_error(
        parse("[triggers.empty]\n"),
        "must set exactly one of `criteria` or `cron`",
    );
}

#[test]
fn trigger_with_both_fields_is_rejected() {
    let toml = r#"
[triggers.both]
criteria = '{"a": 1}'
cron = "* * * * *"
"#;
    assert_config_error(parse(toml), "not both");
}

#[test]
fn criteria_must_be_valid_json() {
    let toml = r#"
[triggers.broken]
criteria = '{"a": '
"#;
    assert_config_error(parse(toml), "not valid JSON");
}

#[test]
fn criteria_must_be_a_json_object() {
    let toml = r#"
[triggers.listy]
criteria = '[1, 2, 3]'
"#;
    assert_config_error(parse(toml), "must be a JSON object, got an array");
}

#[test]
fn cron_expression_must_parse() {
    let toml = r#"
[triggers.never]
cron = "not a schedule"
"#;
    assert_config_error(parse(toml), "invalid cron expression");
}

#[test]
fn cron_accepts_five_six_and_seven_fields() -> TestResult {
    let toml = r#"
[triggers.five]
cron = "*/5 * * * *"

[triggers.six]
cron = "30 */5 * * * *"

[triggers.seven]
cron = "0 30 */5 * * * *"
"#;
    let cfg = parse(toml)?;
    assert_eq!(cfg.cron_triggers().count(), 3);
    Ok(())
}

#[test]
fn job_names_must_be_url_safe() {
    let toml = r#"
[jobs."has space"]
expression = "true"
language_pack = "shell"
trigger = "t"
"#;
    assert_config_error(parse(toml), "URL-safe");
}

#[test]
fn job_expression_must_not_be_empty() {
    let toml = r#"
[jobs.blank]
expression = "  "
language_pack = "shell"
trigger = "t"
"#;
    assert_config_error(parse(toml), "empty `expression`");
}

#[test]
fn job_with_unknown_trigger_is_allowed() -> TestResult {
    let toml = r#"
[jobs.orphan]
expression = "true"
language_pack = "shell"
trigger = "nowhere"
"#;
    let cfg = parse(toml)?;
    assert_eq!(cfg.jobs.len(), 1);
    assert!(cfg.jobs_for(["nowhere"]).len() == 1);
    Ok(())
}

#[test]
fn jobs_for_preserves_job_order_and_keeps_duplicates() {
    let cfg = ProjectConfigBuilder::new()
        .with_job(JobBuilder::new("j1", "t1").expression("echo first").build())
        .with_job(JobBuilder::new("j2", "t2").build())
        .with_job(JobBuilder::new("j1", "t1").expression("echo second").build())
        .with_job(JobBuilder::new("j3", "t3").build())
        .with_criteria_trigger("t1", json!({"a": 1}))
        .with_criteria_trigger("t2", json!({"b": 2}))
        .with_cron_trigger("t3", "0 0 * * *")
        .build();

    let jobs = cfg.jobs_for(["t2", "t1"]);
    let described: Vec<(&str, &str)> = jobs
        .iter()
        .map(|j| (j.name.as_str(), j.expression.as_str()))
        .collect();
    assert_eq!(
        described,
        vec![("j1", "echo first"), ("j2", "true"), ("j1", "echo second")]
    );

    // Naming a trigger twice does not repeat its jobs.
    assert_eq!(cfg.jobs_for(["t3", "t3"]).len(), 1);
    assert!(cfg.jobs_for(["unknown"]).is_empty());
}

#[test]
fn triggers_are_filtered_by_kind() {
    let cfg = ProjectConfigBuilder::new()
        .with_criteria_trigger("t1", json!({"a": 1}))
        .with_cron_trigger("c1", "0 0 * * *")
        .with_criteria_trigger("t2", json!({}))
        .build();

    let criteria: Vec<&str> = cfg
        .triggers_of_kind(TriggerKind::Criteria)
        .into_iter()
        .map(Trigger::name)
        .collect();
    let cron: Vec<&str> = cfg
        .triggers_of_kind(TriggerKind::Cron)
        .into_iter()
        .map(Trigger::name)
        .collect();

    assert_eq!(criteria, vec!["t1", "t2"]);
    assert_eq!(cron, vec!["c1"]);
    assert_eq!(cfg.criteria_triggers().count(), 2);
}
