//! Topic subscription models.
//!
//! A subscription tells the server which events to push on the current
//! connection. Subscriptions are scoped to one connection and must be
//! re-issued after every reconnect.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::event_models::CorrelationId;

/// Topic under which test progress events are registered.
pub const REGISTRATION_TOPIC: &str = "registration.TestProgressBarRegistrationEvent";

/// Parameters scoping a subscription to one game.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, TS)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionParams {
    pub game_id: CorrelationId,
}

/// A declared interest in the events of one topic.
///
/// ```json
/// {
///   "topic": "registration.TestProgressBarRegistrationEvent",
///   "params": { "gameId": 42 }
/// }
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, TS)]
pub struct Subscription {
    pub topic: String,
    pub params: SubscriptionParams,
}

impl Subscription {
    pub fn new(topic: impl Into<String>, game_id: impl Into<CorrelationId>) -> Self {
        Self {
            topic: topic.into(),
            params: SubscriptionParams {
                game_id: game_id.into(),
            },
        }
    }

    /// Subscription to the default registration topic for a game.
    pub fn registration(game_id: impl Into<CorrelationId>) -> Self {
        Self::new(REGISTRATION_TOPIC, game_id)
    }

    pub fn game_id(&self) -> CorrelationId {
        self.params.game_id
    }
}
