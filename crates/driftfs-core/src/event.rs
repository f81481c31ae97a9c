//! Change notifications.

use std::sync::Mutex;
use std::sync::mpsc;

use serde::{Deserialize, Serialize};

use crate::VfsPath;

/// A change to the filesystem, announced after the corresponding
/// mutation succeeded, never before.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum VfsEvent {
    /// An entry appeared.
    Added(VfsPath),
    /// An entry was removed.
    Removed(VfsPath),
    /// An entry's content or metadata changed.
    Changed(VfsPath),
}

impl VfsEvent {
    /// The path the event refers to.
    pub fn path(&self) -> &VfsPath {
        match self {
            Self::Added(p) | Self::Removed(p) | Self::Changed(p) => p,
        }
    }
}

/// Fan-out of [`VfsEvent`]s to subscribers (UI panes, cache layers).
///
/// Delivery order matches the order of the underlying mutations.
/// Subscribers that dropped their receiver are pruned on the next
/// emit.
#[derive(Debug, Default)]
pub struct EventHub {
    subscribers: Mutex<Vec<mpsc::Sender<VfsEvent>>>,
}

impl EventHub {
    /// Create an empty hub.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new subscriber.
    pub fn subscribe(&self) -> mpsc::Receiver<VfsEvent> {
        let (tx, rx) = mpsc::channel();
        self.subscribers
            .lock()
            .expect("event hub lock poisoned")
            .push(tx);
        rx
    }

    /// Deliver an event to all live subscribers.
    pub fn emit(&self, event: VfsEvent) {
        let mut subscribers = self.subscribers.lock().expect("event hub lock poisoned");
        subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }
}
