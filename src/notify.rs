//! User-facing progress messages and the stock [`Notifier`] implementations.

use crate::traits::Notifier;
use crossbeam::channel::{bounded, Receiver, Sender, TrySendError};
use tracing::{debug, info};

/// A progress event of an enrollment run.
///
/// Rendered to user text through `Display`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    /// The previous swipe was rejected and another one is expected.
    BadSwipe,
    /// A swipe was accepted.
    GoodSwipe { collected: usize, required: usize },
    Success,
    /// The attempt budget ran out before enough swipes were accepted.
    NotEnoughSwipes,
    /// Enough swipes were accepted but they did not agree with each other.
    InconsistentImages,
}

/// Discards every message.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&self, _message: &str) {}
}

/// Forwards messages to the `tracing` subscriber at `info` level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, message: &str) {
        info!(target: "fprint_enroll::user", "{}", message);
    }
}

/// Queues messages on a bounded channel for another thread (typically a UI) to drain.
///
/// Never blocks: a full or disconnected channel drops the message.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    sender: Sender<String>,
}

impl ChannelNotifier {
    pub fn new(sender: Sender<String>) -> Self {
        Self { sender }
    }

    /// Creates a notifier together with the receiving end of a channel holding up to
    /// `capacity` undelivered messages.
    pub fn bounded(capacity: usize) -> (Self, Receiver<String>) {
        let (sender, receiver) = bounded(capacity);
        (Self { sender }, receiver)
    }
}

impl Notifier for ChannelNotifier {
    fn notify(&self, message: &str) {
        match self.sender.try_send(message.to_string()) {
            Ok(()) => {}
            Err(TrySendError::Full(dropped)) => {
                debug!("notification channel full, dropping: {}", dropped);
            }
            Err(TrySendError::Disconnected(_)) => {
                debug!("notification receiver dropped");
            }
        }
    }
}
