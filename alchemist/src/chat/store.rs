//! Shared, observable home of the session state.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::info;

use super::SessionState;
use crate::models::Message;

/// Owner of one [`SessionState`].
///
/// Every mutation runs under the watch channel's write lock and then notifies
/// subscribers, so readers only ever see whole states.
#[derive(Debug, Clone)]
pub struct TimelineStore {
    tx: Arc<watch::Sender<SessionState>>,
}

impl Default for TimelineStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TimelineStore {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(SessionState::new());
        Self { tx: Arc::new(tx) }
    }

    /// Clone of the current state.
    pub fn snapshot(&self) -> SessionState {
        self.tx.borrow().clone()
    }

    /// Read the current state without cloning it.
    pub fn read<R>(&self, f: impl FnOnce(&SessionState) -> R) -> R {
        f(&self.tx.borrow())
    }

    /// Receiver that is notified after every change.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.tx.subscribe()
    }

    /// Append a message at the end of the timeline.
    pub fn append(&self, message: Message) {
        self.tx.send_modify(|state| state.timeline.append(message));
    }

    /// Replace the timeline with a fresh welcome message and start the next
    /// conversation.
    pub fn reset(&self) {
        let mut index = 0;
        self.tx.send_modify(|state| {
            state.reset();
            index = state.conversation_index;
        });
        info!(conversation = index, "started new conversation");
    }

    /// Apply `f` atomically; subscribers are notified only if it returns true.
    pub(crate) fn update(&self, f: impl FnOnce(&mut SessionState) -> bool) -> bool {
        self.tx.send_if_modified(f)
    }
}
