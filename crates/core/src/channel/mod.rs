//! Push channel abstraction.
//!
//! The page owns one reconnectable push channel and shares it between all
//! trackers. Trackers only see it through the [`PushChannel`] trait so that
//! the transport can be swapped for [`LocalChannel`] in tests and replays.
//!
//! Two kinds of state live on a channel and they have different lifetimes:
//! - Handler registrations belong to the channel object and survive
//!   reconnects.
//! - Subscriptions belong to the current connection and are dropped whenever
//!   the connection closes.

pub mod local;

pub use local::LocalChannel;

use pt_protocol::{CorrelationId, EventKind, LifecycleEvent, Subscription};
use std::sync::Arc;
use thiserror::Error;

/// Callback invoked for every routed event of the kind it was registered for.
pub type EventHandler = Arc<dyn Fn(&LifecycleEvent) + Send + Sync>;

/// Callback invoked at most once, when the connection drops.
pub type CloseHandler = Box<dyn FnOnce() + Send>;

/// Identifies an event handler registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandlerId(pub(crate) u64);

/// Single-use token for a close handler registration.
///
/// The registration is consumed either when the handler fires or when the
/// token is passed back to [`PushChannel::unregister_close`], whichever
/// happens first.
#[must_use]
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct CloseToken(pub(crate) u64);

/// Errors reported by a push channel.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChannelError {
    /// The operation needs a live connection.
    #[error("push channel is not connected")]
    Disconnected,

    /// The transport could not be re-established.
    #[error("failed to reconnect push channel: {reason}")]
    ReconnectFailed { reason: String },
}

/// Contract a tracker consumes from the page's push channel.
///
/// Implementations deliver events synchronously and in emission order on a
/// single connection, and must not hold internal locks while invoking
/// handlers: handlers call back into the channel.
pub trait PushChannel: Send + Sync {
    /// Bind `handler` to events of `kind` routed for `scope`.
    fn register(&self, kind: EventKind, scope: CorrelationId, handler: EventHandler) -> HandlerId;

    /// Remove a handler. Returns `false` if it was not registered.
    fn unregister(&self, kind: EventKind, id: HandlerId) -> bool;

    /// Install a one-shot handler fired when the connection drops.
    fn register_close(&self, handler: CloseHandler) -> CloseToken;

    /// Remove a close handler that has not fired yet.
    ///
    /// Returns `false` if it already fired or was removed.
    fn unregister_close(&self, token: CloseToken) -> bool;

    /// Declare interest in a topic on the current connection.
    fn subscribe(&self, subscription: &Subscription) -> Result<(), ChannelError>;

    /// Re-establish the connection.
    ///
    /// Subscribing right after this returns is safe.
    fn reconnect(&self) -> Result<(), ChannelError>;
}
