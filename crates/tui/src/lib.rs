//! # pt-tui
//!
//! Terminal dashboard for pushtrack.
//!
//! Every configured scenario is replayed against one shared local push
//! channel while a gauge per tracked game shows its progress. The channel can
//! be dropped from the keyboard to watch trackers repair their subscriptions.

pub mod app;
pub mod event_handler;
pub mod tui;
pub mod widgets;

pub use app::{run_app, App};
pub use tui::Tui;
