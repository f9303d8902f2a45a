//! Custom assertion helpers for integration tests.

use crate::common::recording_channel::{ChannelCall, RecordingChannel};
use pt_core::tracker::PipelineTracker;
use pt_protocol::{CorrelationId, EventKind};

/// Assert the tracker shows exactly `percent` and `label`.
#[allow(dead_code)]
pub fn assert_progress(tracker: &PipelineTracker, percent: u8, label: &str) {
    let progress = tracker.progress();
    assert_eq!(
        (progress.percent, progress.label.as_str()),
        (percent, label),
        "unexpected progress for game {}",
        tracker.game_id()
    );
}

/// Assert that the tracker left nothing registered on the channel.
#[allow(dead_code)]
pub fn assert_detached(channel: &RecordingChannel, game_id: u64) {
    assert_eq!(
        channel.inner().handler_count(CorrelationId(game_id)),
        0,
        "stage handlers still registered"
    );
    assert_eq!(
        channel.inner().close_handler_count(),
        0,
        "close handler still registered"
    );
}

/// Count stage handler registrations in the recorded calls.
#[allow(dead_code)]
pub fn count_registrations(calls: &[ChannelCall]) -> usize {
    calls
        .iter()
        .filter(|c| matches!(c, ChannelCall::Register(_)))
        .count()
}

/// Assert that every stage kind was registered exactly once.
#[allow(dead_code)]
pub fn assert_registered_once(calls: &[ChannelCall]) {
    for kind in EventKind::ALL {
        let count = calls
            .iter()
            .filter(|c| **c == ChannelCall::Register(kind))
            .count();
        assert_eq!(count, 1, "{kind} registered {count} times");
    }
}
