//! Progress model.
//!
//! Holds the percentage and label shown for one tracked test and publishes
//! every change to whoever renders it. It knows nothing about the network.

use pt_protocol::ProgressState;
use tokio::sync::watch;

/// Renderable progress indicator state.
///
/// Renderers obtain a [`watch::Receiver`] through [`ProgressModel::watch`];
/// the latest state is always available even if nobody was listening when
/// it was set.
#[derive(Debug)]
pub struct ProgressModel {
    tx: watch::Sender<ProgressState>,
}

impl ProgressModel {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(ProgressState::default());
        Self { tx }
    }

    /// Replace the displayed percentage and label.
    ///
    /// `percent` is clamped into `[0, 100]`.
    pub fn set_progress(&self, percent: i32, label: impl Into<String>) {
        let percent = percent.clamp(0, 100) as u8;
        self.tx.send_replace(ProgressState::new(percent, label));
    }

    /// The currently displayed state.
    pub fn state(&self) -> ProgressState {
        self.tx.borrow().clone()
    }

    /// Observe future changes.
    pub fn watch(&self) -> watch::Receiver<ProgressState> {
        self.tx.subscribe()
    }
}

impl Default for ProgressModel {
    fn default() -> Self {
        Self::new()
    }
}
