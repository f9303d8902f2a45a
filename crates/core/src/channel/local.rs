//! In-memory push channel.
//!
//! `LocalChannel` behaves like the page's socket without a transport: events
//! are injected with [`LocalChannel::deliver`] and the connection is dropped
//! with [`LocalChannel::close`]. It backs the scenario player, the TUI demo
//! and the tests.

use crate::channel::{
    ChannelError, CloseHandler, CloseToken, EventHandler, HandlerId, PushChannel,
};
use pt_protocol::{CorrelationId, EventKind, PushMessage, Subscription, REGISTRATION_TOPIC};
use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, warn};

/// Call counters, useful to assert on reconnect behaviour.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChannelStats {
    /// Number of `reconnect()` calls, successful or not.
    pub reconnect_calls: usize,
    /// Number of `subscribe()` calls, successful or not.
    pub subscribe_calls: usize,
    /// Number of times the connection was dropped.
    pub closes: usize,
}

struct Registration {
    id: HandlerId,
    scope: CorrelationId,
    handler: EventHandler,
}

struct ChannelState {
    next_id: u64,
    handlers: HashMap<EventKind, Vec<Registration>>,
    close_handlers: Vec<(u64, CloseHandler)>,
    connected: bool,
    subscriptions: HashSet<Subscription>,
    fail_next_reconnect: Option<String>,
    stats: ChannelStats,
}

impl ChannelState {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

/// A push channel living entirely in process memory.
///
/// Events are routed by topic: a delivered message reaches handlers only if
/// the current connection holds a subscription to this channel's topic for
/// the message's game, and only handlers registered for that game.
pub struct LocalChannel {
    topic: String,
    state: Mutex<ChannelState>,
}

impl LocalChannel {
    /// Create a connected channel routing the default registration topic.
    pub fn new() -> Self {
        Self::with_topic(REGISTRATION_TOPIC)
    }

    /// Create a connected channel routing `topic`.
    pub fn with_topic(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            state: Mutex::new(ChannelState {
                next_id: 0,
                handlers: HashMap::new(),
                close_handlers: Vec::new(),
                connected: true,
                subscriptions: HashSet::new(),
                fail_next_reconnect: None,
                stats: ChannelStats::default(),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ChannelState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Push a message to the handlers it is routed to.
    ///
    /// Returns the number of handlers invoked. Messages arriving while
    /// disconnected, or without a matching subscription, are dropped.
    pub fn deliver(&self, message: PushMessage) -> usize {
        let kind = message.event.kind();
        let targets: Vec<EventHandler> = {
            let state = self.lock();
            if !state.connected {
                debug!(game_id = %message.game_id, event = %kind, "dropped event while disconnected");
                return 0;
            }

            let routed = state
                .subscriptions
                .iter()
                .any(|s| s.topic == self.topic && s.game_id() == message.game_id);
            if !routed {
                debug!(game_id = %message.game_id, event = %kind, "dropped event without subscription");
                return 0;
            }

            state
                .handlers
                .get(&kind)
                .map(|registrations| {
                    registrations
                        .iter()
                        .filter(|r| r.scope == message.game_id)
                        .map(|r| EventHandler::clone(&r.handler))
                        .collect()
                })
                .unwrap_or_default()
        };

        for handler in &targets {
            handler(&message.event);
        }
        targets.len()
    }

    /// Drop the connection.
    ///
    /// Subscriptions are discarded and every pending close handler is
    /// consumed and then invoked. Returns the number of close handlers fired.
    /// Closing a disconnected channel does nothing.
    pub fn close(&self) -> usize {
        let fired = {
            let mut state = self.lock();
            if !state.connected {
                return 0;
            }
            state.connected = false;
            state.subscriptions.clear();
            state.stats.closes += 1;
            std::mem::take(&mut state.close_handlers)
        };

        info!(handlers = fired.len(), "push channel closed");
        let count = fired.len();
        for (_, handler) in fired {
            handler();
        }
        count
    }

    /// Make the next `reconnect()` fail with `reason`.
    pub fn fail_next_reconnect(&self, reason: impl Into<String>) {
        self.lock().fail_next_reconnect = Some(reason.into());
    }

    pub fn is_connected(&self) -> bool {
        self.lock().connected
    }

    /// Subscriptions held by the current connection.
    pub fn subscriptions(&self) -> Vec<Subscription> {
        self.lock().subscriptions.iter().cloned().collect()
    }

    /// Number of event handlers registered for `scope`.
    pub fn handler_count(&self, scope: CorrelationId) -> usize {
        self.lock()
            .handlers
            .values()
            .flatten()
            .filter(|r| r.scope == scope)
            .count()
    }

    /// Number of close handlers that have not fired yet.
    pub fn close_handler_count(&self) -> usize {
        self.lock().close_handlers.len()
    }

    pub fn stats(&self) -> ChannelStats {
        self.lock().stats
    }
}

impl Default for LocalChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl PushChannel for LocalChannel {
    fn register(&self, kind: EventKind, scope: CorrelationId, handler: EventHandler) -> HandlerId {
        let mut state = self.lock();
        let id = HandlerId(state.next_id());
        state.handlers.entry(kind).or_default().push(Registration { id, scope, handler });
        id
    }

    fn unregister(&self, kind: EventKind, id: HandlerId) -> bool {
        let mut state = self.lock();
        let Some(registrations) = state.handlers.get_mut(&kind) else {
            return false;
        };
        let before = registrations.len();
        registrations.retain(|r| r.id != id);
        registrations.len() != before
    }

    fn register_close(&self, handler: CloseHandler) -> CloseToken {
        let mut state = self.lock();
        let id = state.next_id();
        state.close_handlers.push((id, handler));
        CloseToken(id)
    }

    fn unregister_close(&self, token: CloseToken) -> bool {
        let mut state = self.lock();
        let before = state.close_handlers.len();
        state.close_handlers.retain(|(id, _)| *id != token.0);
        state.close_handlers.len() != before
    }

    fn subscribe(&self, subscription: &Subscription) -> Result<(), ChannelError> {
        let mut state = self.lock();
        state.stats.subscribe_calls += 1;
        if !state.connected {
            return Err(ChannelError::Disconnected);
        }
        state.subscriptions.insert(subscription.clone());
        Ok(())
    }

    fn reconnect(&self) -> Result<(), ChannelError> {
        let mut state = self.lock();
        state.stats.reconnect_calls += 1;
        if let Some(reason) = state.fail_next_reconnect.take() {
            warn!(%reason, "push channel reconnect failed");
            return Err(ChannelError::ReconnectFailed { reason });
        }
        // Several trackers repair the same close; only the first reopens.
        if !state.connected {
            state.connected = true;
            info!("push channel reconnected");
        }
        Ok(())
    }
}
