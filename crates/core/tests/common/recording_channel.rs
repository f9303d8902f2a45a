//! A push channel that records every call made to it.

use pt_core::channel::{
    ChannelError, CloseHandler, CloseToken, EventHandler, HandlerId, LocalChannel, PushChannel,
};
use pt_protocol::{CorrelationId, EventKind, LifecycleEvent, PushMessage, Subscription};
use std::sync::Mutex;

/// A call observed on the channel.
#[allow(dead_code)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelCall {
    Register(EventKind),
    Unregister(EventKind),
    RegisterClose,
    UnregisterClose,
    Subscribe(CorrelationId),
    /// Carries the number of close handlers still pending when called.
    Reconnect { pending_close_handlers: usize },
}

/// Wraps a [`LocalChannel`] and logs the calls trackers make.
pub struct RecordingChannel {
    inner: LocalChannel,
    calls: Mutex<Vec<ChannelCall>>,
}

#[allow(dead_code)]
impl RecordingChannel {
    pub fn new() -> Self {
        Self {
            inner: LocalChannel::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn record(&self, call: ChannelCall) {
        self.calls.lock().unwrap().push(call);
    }

    pub fn inner(&self) -> &LocalChannel {
        &self.inner
    }

    pub fn calls(&self) -> Vec<ChannelCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    pub fn reconnect_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, ChannelCall::Reconnect { .. }))
            .count()
    }

    pub fn subscribe_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, ChannelCall::Subscribe(_)))
            .count()
    }

    /// Push an event for `game_id`; returns the number of handlers run.
    pub fn deliver(&self, game_id: u64, event: LifecycleEvent) -> usize {
        self.inner.deliver(PushMessage::new(game_id, event))
    }

    /// Drop the connection; returns the number of close handlers fired.
    pub fn close(&self) -> usize {
        self.inner.close()
    }
}

impl PushChannel for RecordingChannel {
    fn register(&self, kind: EventKind, scope: CorrelationId, handler: EventHandler) -> HandlerId {
        self.record(ChannelCall::Register(kind));
        self.inner.register(kind, scope, handler)
    }

    fn unregister(&self, kind: EventKind, id: HandlerId) -> bool {
        self.record(ChannelCall::Unregister(kind));
        self.inner.unregister(kind, id)
    }

    fn register_close(&self, handler: CloseHandler) -> CloseToken {
        self.record(ChannelCall::RegisterClose);
        self.inner.register_close(handler)
    }

    fn unregister_close(&self, token: CloseToken) -> bool {
        self.record(ChannelCall::UnregisterClose);
        self.inner.unregister_close(token)
    }

    fn subscribe(&self, subscription: &Subscription) -> Result<(), ChannelError> {
        self.record(ChannelCall::Subscribe(subscription.game_id()));
        self.inner.subscribe(subscription)
    }

    fn reconnect(&self) -> Result<(), ChannelError> {
        self.record(ChannelCall::Reconnect {
            pending_close_handlers: self.inner.close_handler_count(),
        });
        self.inner.reconnect()
    }
}
