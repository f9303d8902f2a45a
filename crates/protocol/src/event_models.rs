//! Lifecycle events pushed by the server.
//!
//! A submitted test moves through validation, compilation, a run against the
//! original class and a run against the mutants. The server announces each
//! stage outcome as one of the events below, scoped to the game the test was
//! submitted to.

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

/// Identifies the pipeline instance an event belongs to.
///
/// On the page this is the numeric id of the game the test was submitted to.
/// It never changes for the lifetime of a tracker. As a newtype it is
/// written as the bare number.
#[derive(
    Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, TS,
)]
pub struct CorrelationId(pub u64);

impl From<u64> for CorrelationId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The kind of a lifecycle event, without its payload.
///
/// Handlers are registered on the channel per kind.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, TS)]
pub enum EventKind {
    #[serde(rename = "test.TestSubmittedEvent")]
    Submitted,
    #[serde(rename = "test.TestValidatedEvent")]
    Validated,
    #[serde(rename = "test.TestCompiledEvent")]
    Compiled,
    #[serde(rename = "test.TestTestedOriginalEvent")]
    TestedAgainstBaseline,
    #[serde(rename = "test.TestTestedMutantsEvent")]
    TestedAgainstVariants,
}

impl EventKind {
    /// Every stage event kind, in pipeline order.
    pub const ALL: [EventKind; 5] = [
        EventKind::Submitted,
        EventKind::Validated,
        EventKind::Compiled,
        EventKind::TestedAgainstBaseline,
        EventKind::TestedAgainstVariants,
    ];

    /// The event type name used on the wire.
    pub fn wire_name(self) -> &'static str {
        match self {
            EventKind::Submitted => "test.TestSubmittedEvent",
            EventKind::Validated => "test.TestValidatedEvent",
            EventKind::Compiled => "test.TestCompiledEvent",
            EventKind::TestedAgainstBaseline => "test.TestTestedOriginalEvent",
            EventKind::TestedAgainstVariants => "test.TestTestedMutantsEvent",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// A lifecycle event for one stage of the test pipeline.
///
/// Uses internally tagged serialization so the payload matches what the
/// server pushes:
/// ```json
/// { "type": "test.TestCompiledEvent", "success": true }
/// ```
///
/// Any additional payload fields sent by the server are ignored.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, TS)]
#[serde(tag = "type")]
pub enum LifecycleEvent {
    /// The test was received by the server.
    #[serde(rename = "test.TestSubmittedEvent")]
    Submitted,

    /// The test passed or failed the validation rules.
    #[serde(rename = "test.TestValidatedEvent")]
    Validated { success: bool },

    /// The test did or did not compile.
    #[serde(rename = "test.TestCompiledEvent")]
    Compiled { success: bool },

    /// The test was run against the original class under test.
    #[serde(rename = "test.TestTestedOriginalEvent")]
    TestedAgainstBaseline { success: bool },

    /// The test was run against the mutants. Always the last event.
    #[serde(rename = "test.TestTestedMutantsEvent")]
    TestedAgainstVariants,
}

impl LifecycleEvent {
    /// The kind of this event.
    pub fn kind(&self) -> EventKind {
        match self {
            LifecycleEvent::Submitted => EventKind::Submitted,
            LifecycleEvent::Validated { .. } => EventKind::Validated,
            LifecycleEvent::Compiled { .. } => EventKind::Compiled,
            LifecycleEvent::TestedAgainstBaseline { .. } => EventKind::TestedAgainstBaseline,
            LifecycleEvent::TestedAgainstVariants => EventKind::TestedAgainstVariants,
        }
    }

    /// The stage outcome, for events that carry one.
    pub fn success(&self) -> Option<bool> {
        match self {
            LifecycleEvent::Validated { success }
            | LifecycleEvent::Compiled { success }
            | LifecycleEvent::TestedAgainstBaseline { success } => Some(*success),
            LifecycleEvent::Submitted | LifecycleEvent::TestedAgainstVariants => None,
        }
    }
}

/// A lifecycle event as delivered by the channel, tagged with the game it
/// belongs to.
///
/// ```json
/// {
///   "gameId": 42,
///   "event": { "type": "test.TestValidatedEvent", "success": false }
/// }
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, TS)]
#[serde(rename_all = "camelCase")]
pub struct PushMessage {
    pub game_id: CorrelationId,
    pub event: LifecycleEvent,
}

impl PushMessage {
    pub fn new(game_id: impl Into<CorrelationId>, event: LifecycleEvent) -> Self {
        Self {
            game_id: game_id.into(),
            event,
        }
    }
}
