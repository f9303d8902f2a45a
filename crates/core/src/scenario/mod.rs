//! Scenario replay.
//!
//! The player drives a [`LocalChannel`] through the steps of a scenario the
//! way the server and the browser would: events are pushed for the
//! scenario's game, the connection is dropped, reconnect attempts fail.
//! Trackers attached to the channel react exactly as they would live.

use crate::channel::{LocalChannel, PushChannel};
use crate::config::models::AppConfig;
use crate::tracker::PipelineTracker;
use pt_protocol::{
    CorrelationId, ProgressState, PushMessage, Scenario, ScenarioStep, TrackerConfig,
};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

/// Errors raised while preparing a replay.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScenarioError {
    /// No scenario with this name is configured.
    #[error("Unknown scenario '{name}'")]
    UnknownScenario { name: String },
}

/// Find a configured scenario by name.
pub fn find_scenario<'a>(config: &'a AppConfig, name: &str) -> Result<&'a Scenario, ScenarioError> {
    config
        .scenario(name)
        .ok_or_else(|| ScenarioError::UnknownScenario {
            name: name.to_string(),
        })
}

/// Replays scenario steps against a local channel.
pub struct ScenarioPlayer {
    channel: Arc<LocalChannel>,
    step_delay: Duration,
}

impl ScenarioPlayer {
    pub fn new(channel: Arc<LocalChannel>) -> Self {
        Self {
            channel,
            step_delay: Duration::ZERO,
        }
    }

    /// Pause between consecutive steps, on top of scripted delays.
    pub fn with_step_delay(mut self, step_delay: Duration) -> Self {
        self.step_delay = step_delay;
        self
    }

    pub fn channel(&self) -> &Arc<LocalChannel> {
        &self.channel
    }

    /// Apply one step for `game_id`.
    pub async fn apply(&self, game_id: CorrelationId, step: &ScenarioStep) {
        match step {
            ScenarioStep::Event(event) => {
                let delivered = self.channel.deliver(PushMessage::new(game_id, *event));
                debug!(%game_id, event = %event.kind(), delivered, "pushed event");
            }
            ScenarioStep::Close => {
                self.channel.close();
            }
            ScenarioStep::Delay(ms) => {
                tokio::time::sleep(Duration::from_millis(*ms)).await;
            }
            ScenarioStep::FailNextReconnect => {
                self.channel.fail_next_reconnect("scripted reconnect failure");
            }
        }
    }

    /// Apply every step of `scenario` in order.
    pub async fn play(&self, scenario: &Scenario) {
        info!(scenario = %scenario.name, game_id = %scenario.game_id, "replaying scenario");
        for (index, step) in scenario.steps.iter().enumerate() {
            if index > 0 && !self.step_delay.is_zero() {
                tokio::time::sleep(self.step_delay).await;
            }
            self.apply(scenario.game_id, step).await;
        }
    }
}

/// Track a scenario's game on a fresh channel, replay it, and return the
/// final progress.
pub async fn replay(scenario: &Scenario, config: &TrackerConfig) -> ProgressState {
    let channel = Arc::new(LocalChannel::with_topic(config.topic.as_str()));
    let tracker = PipelineTracker::new(
        scenario.game_id,
        Arc::clone(&channel) as Arc<dyn PushChannel>,
        config.clone(),
    );
    tracker.activate();

    ScenarioPlayer::new(channel).play(scenario).await;
    tracker.progress()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pt_protocol::LifecycleEvent;

    fn scenario(steps: Vec<ScenarioStep>) -> Scenario {
        Scenario {
            name: "test".to_string(),
            game_id: CorrelationId(42),
            description: String::new(),
            steps,
        }
    }

    #[tokio::test]
    async fn test_replay_success_path() {
        let scenario = scenario(vec![
            ScenarioStep::Event(LifecycleEvent::Submitted),
            ScenarioStep::Event(LifecycleEvent::Validated { success: true }),
            ScenarioStep::Event(LifecycleEvent::Compiled { success: true }),
            ScenarioStep::Event(LifecycleEvent::TestedAgainstBaseline { success: true }),
            ScenarioStep::Event(LifecycleEvent::TestedAgainstVariants),
        ]);

        let progress = replay(&scenario, &TrackerConfig::default()).await;
        assert_eq!(progress, ProgressState::new(100, "Done"));
    }

    #[tokio::test]
    async fn test_replay_with_close_and_delay() {
        let scenario = scenario(vec![
            ScenarioStep::Event(LifecycleEvent::Submitted),
            ScenarioStep::Close,
            ScenarioStep::Delay(5),
            ScenarioStep::Event(LifecycleEvent::Validated { success: true }),
        ]);

        let progress = replay(&scenario, &TrackerConfig::default()).await;
        assert_eq!(progress, ProgressState::new(50, "Compiling Test"));
    }

    #[tokio::test]
    async fn test_replay_failed_reconnect_freezes() {
        let scenario = scenario(vec![
            ScenarioStep::Event(LifecycleEvent::Submitted),
            ScenarioStep::FailNextReconnect,
            ScenarioStep::Close,
            ScenarioStep::Event(LifecycleEvent::Validated { success: true }),
        ]);

        let progress = replay(&scenario, &TrackerConfig::default()).await;
        assert_eq!(progress, ProgressState::new(33, "Validating Test"));
    }

    #[test]
    fn test_find_scenario() {
        let config = AppConfig {
            scenarios: vec![scenario(Vec::new())],
            ..AppConfig::default()
        };

        assert!(find_scenario(&config, "test").is_ok());
        assert_eq!(
            find_scenario(&config, "missing"),
            Err(ScenarioError::UnknownScenario {
                name: "missing".to_string()
            })
        );
    }
}
