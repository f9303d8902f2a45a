//! Progress board for a page.
//!
//! A page can follow several submitted tests at once. The board keeps one
//! tracker per game on top of the page's single shared push channel.

use crate::channel::PushChannel;
use crate::tracker::PipelineTracker;
use pt_protocol::{CorrelationId, ProgressState, TrackerConfig};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;
use tracing::debug;

/// Registry of the trackers active on one page.
pub struct ProgressBoard {
    /// The push channel shared by every tracker on the page.
    channel: Arc<dyn PushChannel>,

    /// Settings applied to every tracker created by this board.
    config: TrackerConfig,

    /// Trackers indexed by game id.
    trackers: Mutex<BTreeMap<CorrelationId, PipelineTracker>>,
}

impl ProgressBoard {
    pub fn new(channel: Arc<dyn PushChannel>, config: TrackerConfig) -> Self {
        Self {
            channel,
            config,
            trackers: Mutex::new(BTreeMap::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<CorrelationId, PipelineTracker>> {
        self.trackers.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Start tracking a game and return a receiver for its progress.
    ///
    /// A game that is already tracked keeps its existing tracker.
    pub fn track(&self, game_id: impl Into<CorrelationId>) -> watch::Receiver<ProgressState> {
        let game_id = game_id.into();
        let mut trackers = self.lock();

        if let Some(tracker) = trackers.get(&game_id) {
            debug!(%game_id, "game already tracked");
            return tracker.watch();
        }

        let tracker =
            PipelineTracker::new(game_id, Arc::clone(&self.channel), self.config.clone());
        tracker.activate();
        let rx = tracker.watch();
        trackers.insert(game_id, tracker);
        rx
    }

    /// Stop tracking a game, releasing its channel registrations.
    ///
    /// Returns `false` if the game was not tracked.
    pub fn forget(&self, game_id: impl Into<CorrelationId>) -> bool {
        self.lock().remove(&game_id.into()).is_some()
    }

    /// Current progress of a tracked game.
    pub fn progress(&self, game_id: impl Into<CorrelationId>) -> Option<ProgressState> {
        self.lock().get(&game_id.into()).map(PipelineTracker::progress)
    }

    /// Progress of every tracked game, ordered by game id.
    pub fn snapshot(&self) -> Vec<(CorrelationId, ProgressState)> {
        self.lock()
            .iter()
            .map(|(id, tracker)| (*id, tracker.progress()))
            .collect()
    }

    pub fn tracker_count(&self) -> usize {
        self.lock().len()
    }

    /// Whether every tracked pipeline reached a terminal stage.
    pub fn all_finished(&self) -> bool {
        self.lock().values().all(PipelineTracker::is_finished)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::LocalChannel;
    use pt_protocol::{LifecycleEvent, PushMessage};

    fn board_on(channel: &Arc<LocalChannel>) -> ProgressBoard {
        ProgressBoard::new(
            Arc::clone(channel) as Arc<dyn PushChannel>,
            TrackerConfig::default(),
        )
    }

    #[test]
    fn test_board_new() {
        let channel = Arc::new(LocalChannel::new());
        let board = board_on(&channel);
        assert_eq!(board.tracker_count(), 0);
        assert!(board.snapshot().is_empty());
    }

    #[test]
    fn test_track_is_idempotent() {
        let channel = Arc::new(LocalChannel::new());
        let board = board_on(&channel);

        let _first = board.track(42);
        let _second = board.track(42);

        assert_eq!(board.tracker_count(), 1);
        assert_eq!(channel.close_handler_count(), 1);
    }

    #[test]
    fn test_trackers_share_channel_without_crosstalk() {
        let channel = Arc::new(LocalChannel::new());
        let board = board_on(&channel);
        board.track(1);
        board.track(2);

        channel.deliver(PushMessage::new(2, LifecycleEvent::Submitted));
        channel.deliver(PushMessage::new(2, LifecycleEvent::Validated { success: false }));

        assert_eq!(
            board.snapshot(),
            vec![
                (CorrelationId(1), ProgressState::new(16, "Submitting Test")),
                (CorrelationId(2), ProgressState::new(100, "Test Is Not Valid")),
            ]
        );
        assert!(!board.all_finished());
    }

    #[test]
    fn test_close_repairs_every_tracker() {
        let channel = Arc::new(LocalChannel::new());
        let board = board_on(&channel);
        board.track(1);
        board.track(2);

        channel.close();

        assert!(channel.is_connected());
        let mut subscribed: Vec<CorrelationId> = channel
            .subscriptions()
            .iter()
            .map(|s| s.game_id())
            .collect();
        subscribed.sort();
        assert_eq!(subscribed, vec![CorrelationId(1), CorrelationId(2)]);

        channel.deliver(PushMessage::new(1, LifecycleEvent::Submitted));
        assert_eq!(board.progress(1), Some(ProgressState::new(33, "Validating Test")));
    }

    #[test]
    fn test_forget_releases_tracker() {
        let channel = Arc::new(LocalChannel::new());
        let board = board_on(&channel);
        board.track(5);

        assert!(board.forget(5));
        assert!(!board.forget(5));
        assert_eq!(channel.handler_count(CorrelationId(5)), 0);
        assert_eq!(board.progress(5), None);
    }
}
