//! Replay scenario models for `.pushtrack/scenarios/*.yaml`.
//!
//! A scenario scripts what the push channel does while one test is tracked:
//! which lifecycle events arrive, when the connection drops, and whether the
//! next reconnect attempt fails.

use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use ts_rs::TS;

use crate::event_models::{CorrelationId, LifecycleEvent};

/// A single scripted step.
///
/// Unit steps are written as plain strings, the others as single-key maps:
///
/// ```yaml
/// - event: { type: test.TestCompiledEvent, success: true }
/// - close
/// - delay: 250
/// - fail-next-reconnect
/// ```
#[derive(Debug, Clone, PartialEq, Eq, TS)]
#[ts(rename_all = "kebab-case")]
pub enum ScenarioStep {
    /// Push a lifecycle event for the scenario's game.
    Event(LifecycleEvent),

    /// Drop the connection, firing close handlers.
    Close,

    /// Wait the given number of milliseconds.
    Delay(u64),

    /// Make the next reconnect attempt fail.
    FailNextReconnect,
}

/// Bare-string steps. Also accepted as `close: ~`.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "kebab-case")]
enum StepMarker {
    Close,
    FailNextReconnect,
}

/// What a step looks like on disk.
///
/// serde_yaml only reads externally tagged enums from `!tag` syntax, so the
/// map forms are matched structurally instead.
#[derive(Deserialize, Debug)]
#[serde(
    untagged,
    expecting = "a scenario step: `close`, `fail-next-reconnect`, `event: {..}` or `delay: <ms>`"
)]
enum StepRepr {
    Marker(StepMarker),
    Event { event: LifecycleEvent },
    Delay { delay: u64 },
}

impl<'de> Deserialize<'de> for ScenarioStep {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match StepRepr::deserialize(deserializer)? {
            StepRepr::Marker(StepMarker::Close) => ScenarioStep::Close,
            StepRepr::Marker(StepMarker::FailNextReconnect) => ScenarioStep::FailNextReconnect,
            StepRepr::Event { event } => ScenarioStep::Event(event),
            StepRepr::Delay { delay } => ScenarioStep::Delay(delay),
        })
    }
}

impl Serialize for ScenarioStep {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            ScenarioStep::Event(event) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("event", event)?;
                map.end()
            }
            ScenarioStep::Delay(ms) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("delay", ms)?;
                map.end()
            }
            ScenarioStep::Close => serializer.serialize_str("close"),
            ScenarioStep::FailNextReconnect => serializer.serialize_str("fail-next-reconnect"),
        }
    }
}

/// A replayable scenario for one tracked test.
///
/// # Example
///
/// ```yaml
/// name: reconnect-mid-flight
/// game-id: 42
/// steps:
///   - event: { type: test.TestSubmittedEvent }
///   - event: { type: test.TestValidatedEvent, success: true }
///   - close
///   - event: { type: test.TestCompiledEvent, success: true }
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, TS)]
#[serde(rename_all = "kebab-case")]
pub struct Scenario {
    /// Unique name identifying this scenario.
    pub name: String,

    /// Game the tracked test was submitted to.
    pub game_id: CorrelationId,

    /// Free-form description shown by `pushtrack list`.
    #[serde(default)]
    pub description: String,

    /// Steps replayed in order.
    pub steps: Vec<ScenarioStep>,
}
