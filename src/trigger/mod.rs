// src/trigger/mod.rs

//! Trigger model.
//!
//! A trigger is a named condition that activates every job whose `trigger`
//! field names it. There are exactly two kinds:
//!
//! - [`CriteriaTrigger`]: matches inbound messages by deep containment
//!   (see [`matcher`]).
//! - [`CronTrigger`]: fired by an external cron source; never matched
//!   against message content.

pub mod matcher;
pub mod schedule;

use serde_json::{Map, Value};

use crate::errors::{JobwireError, Result};

pub use matcher::{contains, match_triggers};

/// Nested containment pattern tested against a message body.
pub type Criteria = Map<String, Value>;

/// Inbound event: an arbitrary structured body.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub body: Value,
}

impl Message {
    pub fn new(body: Value) -> Self {
        Self { body }
    }
}

impl From<Value> for Message {
    fn from(body: Value) -> Self {
        Message { body }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CriteriaTrigger {
    pub name: String,
    pub criteria: Criteria,
}

impl CriteriaTrigger {
    pub fn new(name: impl Into<String>, criteria: Criteria) -> Self {
        Self {
            name: name.into(),
            criteria,
        }
    }

    /// Decode criteria from their JSON encoding.
    ///
    /// The encoded value must be a JSON object.
    pub fn from_json(name: impl Into<String>, encoded: &str) -> Result<Self> {
        let name = name.into();
        let value: Value = serde_json::from_str(encoded).map_err(|e| {
            JobwireError::ConfigError(format!(
                "trigger '{name}' has criteria that are not valid JSON: {e}"
            ))
        })?;

        match value {
            Value::Object(criteria) => Ok(Self { name, criteria }),
            other => Err(JobwireError::ConfigError(format!(
                "trigger '{name}' criteria must be a JSON object, got {}",
                json_kind(&other)
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CronTrigger {
    pub name: String,
    /// Schedule expression (5, 6 or 7 fields).
    pub cron: String,
}

impl CronTrigger {
    pub fn new(name: impl Into<String>, cron: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cron: cron.into(),
        }
    }
}

/// Which variant a [`Trigger`] is, for filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerKind {
    Criteria,
    Cron,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Trigger {
    Criteria(CriteriaTrigger),
    Cron(CronTrigger),
}

impl Trigger {
    /// Build a trigger from the two optional fields of a config entry.
    ///
    /// Exactly one of `criteria` and `cron` must be present.
    pub fn from_parts(name: &str, criteria: Option<&str>, cron: Option<&str>) -> Result<Self> {
        match (criteria, cron) {
            (Some(encoded), None) => Ok(Trigger::Criteria(CriteriaTrigger::from_json(
                name, encoded,
            )?)),
            (None, Some(expr)) => {
                schedule::parse_schedule(expr).map_err(|e| {
                    JobwireError::ConfigError(format!("trigger '{name}': {e}"))
                })?;
                Ok(Trigger::Cron(CronTrigger::new(name, expr)))
            }
            (Some(_), Some(_)) => Err(JobwireError::ConfigError(format!(
                "trigger '{name}' must set exactly one of `criteria` or `cron`, not both"
            ))),
            (None, None) => Err(JobwireError::ConfigError(format!(
                "trigger '{name}' must set exactly one of `criteria` or `cron`"
            ))),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Trigger::Criteria(t) => &t.name,
            Trigger::Cron(t) => &t.name,
        }
    }

    pub fn kind(&self) -> TriggerKind {
        match self {
            Trigger::Criteria(_) => TriggerKind::Criteria,
            Trigger::Cron(_) => TriggerKind::Cron,
        }
    }

    pub fn as_criteria(&self) -> Option<&CriteriaTrigger> {
        match self {
            Trigger::Criteria(t) => Some(t),
            Trigger::Cron(_) => None,
        }
    }

    pub fn as_cron(&self) -> Option<&CronTrigger> {
        match self {
            Trigger::Cron(t) => Some(t),
            Trigger::Criteria(_) => None,
        }
    }
}

impl From<CriteriaTrigger> for Trigger {
    fn from(t: CriteriaTrigger) -> Self {
        Trigger::Criteria(t)
    }
}

impl From<CronTrigger> for Trigger {
    fn from(t: CronTrigger) -> Self {
        Trigger::Cron(t)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
