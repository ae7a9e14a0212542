// src/config/model.rs

use std::collections::BTreeMap;

use serde::Deserialize;

/// Project configuration as read from a TOML file.
///
/// ```toml
/// [jobs.notify-signup]
/// expression = "./notify.sh"
/// language_pack = "shell"
/// trigger = "on-signup"
///
/// [triggers.on-signup]
/// criteria = '{"type": "signup"}'
///
/// [triggers.nightly]
/// cron = "0 3 * * *"
/// ```
///
/// This is the unvalidated shape. Use `ProjectConfig::try_from` (or the
/// loader) to turn it into the model the engine consumes.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawConfigFile {
    /// All jobs from `[jobs.<name>]`, keyed by job name.
    #[serde(default)]
    pub jobs: BTreeMap<String, RawJob>,

    /// All triggers from `[triggers.<name>]`, keyed by trigger name.
    #[serde(default)]
    pub triggers: BTreeMap<String, RawTrigger>,
}

/// `[jobs.<name>]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct RawJob {
    /// Opaque to the engine; interpreted by the executor.
    pub expression: String,

    /// Identifies the executor module that runs `expression`.
    pub language_pack: String,

    /// Name of the trigger that activates this job.
    pub trigger: String,

    /// Opaque credential reference passed through to the executor.
    #[serde(default)]
    pub credential: Option<toml::Value>,
}

/// `[triggers.<name>]` section.
///
/// Exactly one of the two fields must be set; that is checked during
/// validation so both shapes deserialize here.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawTrigger {
    /// JSON-encoded containment map.
    #[serde(default)]
    pub criteria: Option<String>,

    /// Cron schedule expression.
    #[serde(default)]
    pub cron: Option<String>,
}
