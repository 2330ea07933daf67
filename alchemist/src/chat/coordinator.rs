//! Request lifecycle: validate, dispatch, and settle one agent call.

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::{derive_title, TimelineStore, ASSISTANT_UNAVAILABLE};
use crate::agent::AgentService;
use crate::models::Message;

/// What a call to [`Coordinator::submit`] ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Blank text, or a request was already pending. Nothing changed.
    Ignored,
    /// The agent replied and a bot message was appended.
    Answered,
    /// The agent call failed and the session error was set.
    Failed,
    /// The conversation was reset while the call was in flight; the outcome
    /// was dropped.
    Discarded,
}

/// Drives `Idle -> Pending -> Idle` against a [`TimelineStore`].
#[derive(Clone)]
pub struct Coordinator {
    store: TimelineStore,
    agent: Arc<dyn AgentService>,
}

impl Coordinator {
    pub const fn new(store: TimelineStore, agent: Arc<dyn AgentService>) -> Self {
        Self { store, agent }
    }

    /// Send `raw_text` to the agent and record the exchange.
    ///
    /// Blank text and calls made while a request is pending are silent no-ops.
    /// Failures never escape: they become the fixed session error.
    pub async fn submit(&self, raw_text: &str) -> SubmitOutcome {
        let text = raw_text.trim();
        if text.is_empty() {
            debug!("ignoring blank submission");
            return SubmitOutcome::Ignored;
        }

        let mut generation = None;
        self.store.update(|state| {
            if state.is_pending {
                return false;
            }
            state.timeline.append(Message::user(text));
            state.last_error = None;
            state.is_pending = true;
            if !state.has_title() {
                state.conversation_title = derive_title(text);
            }
            generation = Some(state.conversation_index);
            true
        });

        let Some(generation) = generation else {
            debug!("request already pending, ignoring submission");
            return SubmitOutcome::Ignored;
        };

        debug!(conversation = generation, "dispatching agent query");
        let result = self.agent.query(text).await;
        if let Err(err) = &result {
            warn!(conversation = generation, error = %err, "Failed to fetch assistant response");
        }

        let mut outcome = SubmitOutcome::Discarded;
        self.store.update(|state| {
            if state.conversation_index != generation {
                return false;
            }
            state.is_pending = false;
            match result {
                Ok(reply) => {
                    let (text, artifact) = reply.into_parts();
                    state.timeline.append(Message::bot(text, artifact));
                    outcome = SubmitOutcome::Answered;
                }
                Err(_) => {
                    state.last_error = Some(ASSISTANT_UNAVAILABLE.to_string());
                    outcome = SubmitOutcome::Failed;
                }
            }
            true
        });

        if outcome == SubmitOutcome::Discarded {
            info!(
                conversation = generation,
                "conversation was reset while waiting, dropping agent outcome"
            );
        }
        outcome
    }

    /// Clear the session error. Nothing else changes.
    pub fn dismiss_error(&self) {
        self.store.update(|state| state.last_error.take().is_some());
    }
}
