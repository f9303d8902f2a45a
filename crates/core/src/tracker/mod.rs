//! Pipeline tracker.
//!
//! A tracker follows one submitted test through its pipeline by listening to
//! lifecycle events on the page's shared push channel. It owns the progress
//! model for that test and keeps its topic subscription alive when the
//! channel drops its connection.
//!
//! # Reconnect protocol
//!
//! Submitting a test can close the push connection as a side effect. The
//! tracker treats a close as transport churn, not as a pipeline failure:
//!
//! 1. `activate()` installs a one-shot close handler.
//! 2. When the connection drops the channel consumes that registration, then
//!    runs it: the tracker asks the channel to reconnect and re-issues its
//!    subscription.
//! 3. Stage handlers are left alone. They belong to the channel object and
//!    survive the reconnect; only the subscription is connection-scoped.

use crate::channel::{CloseToken, EventHandler, HandlerId, PushChannel};
use crate::progress::ProgressModel;
use pt_protocol::{
    CorrelationId, EventKind, LifecycleEvent, ProgressState, Stage, Subscription, TrackerConfig,
};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Label shown when a reconnect attempt fails and loss reporting is enabled.
pub const CONNECTION_LOST_LABEL: &str = "Connection Lost";

/// The stage a lifecycle event moves the pipeline to.
///
/// Transitions depend only on the incoming event, never on the current
/// stage, so a missed or repeated event cannot corrupt the result.
pub fn stage_after(event: LifecycleEvent) -> Stage {
    match event {
        LifecycleEvent::Submitted => Stage::Validating,
        LifecycleEvent::Validated { success: true } => Stage::Compiling,
        LifecycleEvent::Validated { success: false } => Stage::NotValid,
        LifecycleEvent::Compiled { success: true } => Stage::RunningAgainstBaseline,
        LifecycleEvent::Compiled { success: false } => Stage::DidNotCompile,
        LifecycleEvent::TestedAgainstBaseline { success: true } => Stage::RunningAgainstVariants,
        LifecycleEvent::TestedAgainstBaseline { success: false } => Stage::FailedAgainstBaseline,
        LifecycleEvent::TestedAgainstVariants => Stage::Done,
    }
}

#[derive(Default)]
struct TrackerState {
    activated: bool,
    detached: bool,
    stage: Option<Stage>,
    handlers: Vec<(EventKind, HandlerId)>,
    close_token: Option<CloseToken>,
}

struct TrackerShared {
    game_id: CorrelationId,
    channel: Arc<dyn PushChannel>,
    config: TrackerConfig,
    progress: ProgressModel,
    state: Mutex<TrackerState>,
}

/// Tracks the progress of one submitted test.
///
/// Cloning yields another handle to the same tracker. Handlers registered on
/// the channel only hold a weak reference, so dropping the last handle
/// removes every registration the tracker made.
#[derive(Clone)]
pub struct PipelineTracker {
    shared: Arc<TrackerShared>,
}

impl PipelineTracker {
    pub fn new(
        game_id: impl Into<CorrelationId>,
        channel: Arc<dyn PushChannel>,
        config: TrackerConfig,
    ) -> Self {
        Self {
            shared: Arc::new(TrackerShared {
                game_id: game_id.into(),
                channel,
                config,
                progress: ProgressModel::new(),
                state: Mutex::new(TrackerState::default()),
            }),
        }
    }

    /// Start following the pipeline.
    ///
    /// Shows the submitting waypoint, registers one handler per stage event,
    /// subscribes to the game's events and installs the close handler.
    /// Calling this again is a no-op.
    pub fn activate(&self) {
        let shared = &self.shared;
        {
            let mut state = shared.lock();
            if state.activated {
                warn!(game_id = %shared.game_id, "tracker already active; ignoring activate");
                return;
            }
            state.activated = true;
        }

        info!(game_id = %shared.game_id, topic = %shared.config.topic, "activating tracker");
        shared.show(Stage::Submitting);

        let handlers: Vec<(EventKind, HandlerId)> = EventKind::ALL
            .iter()
            .map(|&kind| {
                let weak = Arc::downgrade(shared);
                let handler: EventHandler = Arc::new(move |event: &LifecycleEvent| {
                    if let Some(shared) = weak.upgrade() {
                        shared.on_event(*event);
                    }
                });
                (kind, shared.channel.register(kind, shared.game_id, handler))
            })
            .collect();
        shared.lock().handlers = handlers;

        shared.subscribe();
        TrackerShared::arm_close_handler(shared);
    }

    pub fn game_id(&self) -> CorrelationId {
        self.shared.game_id
    }

    /// The currently displayed progress.
    pub fn progress(&self) -> ProgressState {
        self.shared.progress.state()
    }

    /// Observe progress changes.
    pub fn watch(&self) -> watch::Receiver<ProgressState> {
        self.shared.progress.watch()
    }

    /// The last stage reached, if any.
    pub fn stage(&self) -> Option<Stage> {
        self.shared.lock().stage
    }

    pub fn is_active(&self) -> bool {
        let state = self.shared.lock();
        state.activated && !state.detached
    }

    /// Whether the pipeline reached a terminal stage.
    pub fn is_finished(&self) -> bool {
        self.stage().is_some_and(Stage::is_terminal)
    }
}

impl TrackerShared {
    fn lock(&self) -> MutexGuard<'_, TrackerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn show(&self, stage: Stage) {
        let mut state = self.lock();
        self.show_locked(&mut state, stage);
    }

    /// Record and publish `stage` while the caller holds the state lock, so
    /// concurrent deliveries cannot interleave check and write.
    fn show_locked(&self, state: &mut TrackerState, stage: Stage) {
        state.stage = Some(stage);
        self.progress
            .set_progress(i32::from(stage.percent()), stage.label());
        debug!(
            game_id = %self.game_id,
            percent = stage.percent(),
            label = stage.label(),
            "progress updated"
        );
    }

    fn on_event(&self, event: LifecycleEvent) {
        let target = stage_after(event);
        {
            let mut state = self.lock();
            if state.detached {
                return;
            }
            // Stale duplicates from before a reconnect must not move backwards.
            if let Some(current) = state.stage {
                if target.percent() < current.percent() {
                    debug!(
                        game_id = %self.game_id,
                        event = %event.kind(),
                        current = ?current,
                        "ignoring stale event"
                    );
                    return;
                }
            }

            self.show_locked(&mut state, target);
            if target.is_terminal() {
                state.detached = true;
            }
        }

        if target.is_terminal() {
            info!(
                game_id = %self.game_id,
                stage = ?target,
                failed = target.is_failure(),
                "pipeline finished"
            );
            self.detach();
        }
    }

    fn on_close(this: &Arc<Self>) {
        // The channel consumed our registration before calling us.
        {
            let mut state = this.lock();
            state.close_token = None;
            if state.detached {
                return;
            }
        }

        info!(game_id = %this.game_id, "push channel closed; reconnecting");
        if let Err(error) = this.channel.reconnect() {
            warn!(game_id = %this.game_id, %error, "reconnect failed; progress is frozen");
            if this.config.report_connection_loss {
                let state = this.lock();
                if !state.detached {
                    let percent = this.progress.state().percent;
                    this.progress
                        .set_progress(i32::from(percent), CONNECTION_LOST_LABEL);
                }
            }
        }

        // Reconnect success is not awaited; subscribing right away is safe.
        this.subscribe();

        if this.config.rearm_close_handler {
            Self::arm_close_handler(this);
        }
    }

    fn subscribe(&self) {
        let subscription = Subscription::new(self.config.topic.as_str(), self.game_id);
        match self.channel.subscribe(&subscription) {
            Ok(()) => debug!(game_id = %self.game_id, topic = %subscription.topic, "subscribed"),
            Err(error) => warn!(game_id = %self.game_id, %error, "subscribe failed"),
        }
    }

    fn arm_close_handler(this: &Arc<Self>) {
        let weak: Weak<Self> = Arc::downgrade(this);
        let token = this.channel.register_close(Box::new(move || {
            if let Some(shared) = weak.upgrade() {
                Self::on_close(&shared);
            }
        }));
        this.lock().close_token = Some(token);
    }

    /// Remove every registration this tracker made.
    fn detach(&self) {
        let (handlers, close_token) = {
            let mut state = self.lock();
            state.detached = true;
            (
                std::mem::take(&mut state.handlers),
                state.close_token.take(),
            )
        };
        release(self.channel.as_ref(), handlers, close_token);
    }
}

impl Drop for TrackerShared {
    fn drop(&mut self) {
        let state = self.state.get_mut().unwrap_or_else(PoisonError::into_inner);
        let handlers = std::mem::take(&mut state.handlers);
        let close_token = state.close_token.take();
        release(self.channel.as_ref(), handlers, close_token);
    }
}

fn release(
    channel: &dyn PushChannel,
    handlers: Vec<(EventKind, HandlerId)>,
    close_token: Option<CloseToken>,
) {
    for (kind, id) in handlers {
        channel.unregister(kind, id);
    }
    if let Some(token) = close_token {
        channel.unregister_close(token);
    }
}
