//! Test fixtures for creating sample configurations and trackers.

use crate::common::recording_channel::RecordingChannel;
use pt_core::channel::PushChannel;
use pt_core::tracker::PipelineTracker;
use pt_protocol::{LifecycleEvent, TrackerConfig};
use std::sync::Arc;
use tempfile::TempDir;

/// Create an activated tracker for `game_id` on a fresh recording channel.
#[allow(dead_code)]
pub fn activated_tracker(game_id: u64) -> (Arc<RecordingChannel>, PipelineTracker) {
    activated_tracker_with(game_id, TrackerConfig::default())
}

/// Same as [`activated_tracker`] with explicit tracker settings.
#[allow(dead_code)]
pub fn activated_tracker_with(
    game_id: u64,
    config: TrackerConfig,
) -> (Arc<RecordingChannel>, PipelineTracker) {
    let channel = Arc::new(RecordingChannel::new());
    let tracker = PipelineTracker::new(
        game_id,
        Arc::clone(&channel) as Arc<dyn PushChannel>,
        config,
    );
    tracker.activate();
    (channel, tracker)
}

/// The events of a fully successful pipeline, in order.
#[allow(dead_code)]
pub fn success_sequence() -> Vec<LifecycleEvent> {
    vec![
        LifecycleEvent::Submitted,
        LifecycleEvent::Validated { success: true },
        LifecycleEvent::Compiled { success: true },
        LifecycleEvent::TestedAgainstBaseline { success: true },
        LifecycleEvent::TestedAgainstVariants,
    ]
}

/// Create a temporary project directory with .pushtrack configuration.
///
/// This creates:
/// - `.pushtrack/config.toml` re-arming the close handler
/// - `.pushtrack/scenarios/` with a reconnect and a failure scenario
///
/// Returns a TempDir that must be kept alive for the test duration.
#[allow(dead_code)]
pub fn create_test_project() -> std::io::Result<TempDir> {
    let temp_dir = tempfile::tempdir()?;
    let root = temp_dir.path();

    std::fs::create_dir_all(root.join(".pushtrack/scenarios"))?;

    std::fs::write(
        root.join(".pushtrack/config.toml"),
        "[tracker]\nrearm_close_handler = true\n",
    )?;

    let reconnect_yaml = r#"
name: reconnect-mid-flight
game-id: 42
description: Connection drops twice while the test runs
steps:
  - event: { type: test.TestSubmittedEvent }
  - event: { type: test.TestValidatedEvent, success: true }
  - close
  - event: { type: test.TestCompiledEvent, success: true }
  - close
  - delay: 1
  - event: { type: test.TestTestedOriginalEvent, success: true }
  - event: { type: test.TestTestedMutantsEvent }
"#;
    std::fs::write(
        root.join(".pushtrack/scenarios/reconnect.yaml"),
        reconnect_yaml,
    )?;

    let failure_yaml = r#"
name: baseline-failure
game-id: 7
steps:
  - event: { type: test.TestSubmittedEvent }
  - event: { type: test.TestValidatedEvent, success: true }
  - event: { type: test.TestCompiledEvent, success: true }
  - event: { type: test.TestTestedOriginalEvent, success: false }
  - event: { type: test.TestTestedMutantsEvent }
"#;
    std::fs::write(
        root.join(".pushtrack/scenarios/failure.yml"),
        failure_yaml,
    )?;

    Ok(temp_dir)
}
