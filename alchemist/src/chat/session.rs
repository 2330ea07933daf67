//! One conversation view's worth of chat state and the operations on it.

use std::sync::Arc;

use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use super::{Coordinator, SessionState, SubmitOutcome, TimelineStore};
use crate::agent::AgentService;

/// Handle to a chat session. Clones share the same state.
///
/// Created when a chat view opens and dropped when it closes; nothing is
/// persisted.
#[derive(Clone)]
pub struct ChatSession {
    store: TimelineStore,
    coordinator: Coordinator,
}

impl ChatSession {
    pub fn new(agent: impl AgentService + 'static) -> Self {
        Self::with_shared_agent(Arc::new(agent))
    }

    pub fn with_shared_agent(agent: Arc<dyn AgentService>) -> Self {
        let store = TimelineStore::new();
        let coordinator = Coordinator::new(store.clone(), agent);
        Self { store, coordinator }
    }

    /// See [`Coordinator::submit`].
    pub async fn submit(&self, raw_text: &str) -> SubmitOutcome {
        self.coordinator.submit(raw_text).await
    }

    pub fn dismiss_error(&self) {
        self.coordinator.dismiss_error();
    }

    /// Start a new conversation. Only call this in response to a user action.
    pub fn start_new(&self) {
        self.store.reset();
    }

    pub fn display_title(&self) -> String {
        self.store.read(SessionState::display_title)
    }

    pub fn status_line(&self) -> &'static str {
        self.store.read(SessionState::status_line)
    }

    pub fn is_pending(&self) -> bool {
        self.store.read(|s| s.is_pending)
    }

    pub fn snapshot(&self) -> SessionState {
        self.store.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.store.subscribe()
    }

    /// Stream of states, starting with the current one.
    pub fn updates(&self) -> WatchStream<SessionState> {
        WatchStream::new(self.store.subscribe())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::{AgentError, AgentReply};
    use crate::chat::testing::{GatedAgent, ScriptedAgent};
    use crate::chat::{
        ASSISTANT_UNAVAILABLE, NEW_CONVERSATION_TITLE, STATUS_IDLE, STATUS_RETRY_HINT,
        STATUS_THINKING,
    };
    use crate::models::Sender;
    use tokio_stream::StreamExt;

    #[test]
    fn test_initial_load() {
        let session = ChatSession::new(ScriptedAgent::default());
        let state = session.snapshot();

        assert_eq!(state.timeline.len(), 1);
        assert_eq!(state.timeline.as_slice()[0].sender, Sender::Bot);
        assert!(!state.is_pending);
        assert!(state.last_error.is_none());
        assert_eq!(session.display_title(), "Conversation 1");
        assert_eq!(session.status_line(), STATUS_IDLE);
    }

    #[tokio::test]
    async fn test_pyrite_scenario() {
        let session = ChatSession::new(ScriptedAgent::default());

        session.submit("What is pyrite?").await;

        let state = session.snapshot();
        assert_eq!(state.timeline.len(), 3);
        assert_eq!(state.conversation_title, "What is pyrite?");
        assert_eq!(session.display_title(), "What is pyrite?");
    }

    #[tokio::test]
    async fn test_rejected_call_scenario() {
        let session = ChatSession::new(ScriptedAgent::new(vec![Err(AgentError::Status {
            status: 500,
            body: "boom".to_string(),
        })]));

        session.submit("hello").await;

        assert_eq!(session.snapshot().timeline.len(), 2);
        assert_eq!(
            session.snapshot().last_error.as_deref(),
            Some(ASSISTANT_UNAVAILABLE)
        );
        assert_eq!(session.status_line(), STATUS_RETRY_HINT);
        assert!(!session.is_pending());

        session.dismiss_error();
        assert!(session.snapshot().last_error.is_none());
        assert_eq!(session.snapshot().timeline.len(), 2);
        assert_eq!(session.status_line(), STATUS_IDLE);
    }

    #[tokio::test]
    async fn test_start_new_postconditions() {
        let session = ChatSession::new(ScriptedAgent::new(vec![
            Ok(AgentReply::PlainText("a".to_string())),
            Err(AgentError::Malformed("b".to_string())),
        ]));
        session.submit("one").await;
        session.submit("two").await;
        let before = session.snapshot().conversation_index;

        session.start_new();

        let state = session.snapshot();
        assert_eq!(state.timeline.len(), 1);
        assert!(!state.is_pending);
        assert!(state.last_error.is_none());
        assert_eq!(state.conversation_title, NEW_CONVERSATION_TITLE);
        assert_eq!(state.conversation_index, before + 1);
        assert_eq!(session.display_title(), format!("Conversation {}", before + 1));
    }

    #[tokio::test]
    async fn test_title_is_derived_again_after_start_new() {
        let session = ChatSession::new(ScriptedAgent::default());
        session.submit("first topic").await;

        session.start_new();
        session.submit("second topic").await;

        assert_eq!(session.display_title(), "second topic");
    }

    #[tokio::test]
    async fn test_status_line_while_pending() {
        let agent = GatedAgent::new(false);
        let gate = agent.gate.clone();
        let session = ChatSession::new(agent);

        let in_flight = tokio::spawn({
            let session = session.clone();
            async move { session.submit("slow one").await }
        });
        session.subscribe().wait_for(|s| s.is_pending).await.unwrap();
        assert_eq!(session.status_line(), STATUS_THINKING);

        gate.notify_one();
        in_flight.await.unwrap();
        assert_eq!(session.status_line(), STATUS_IDLE);
    }

    #[tokio::test]
    async fn test_updates_stream_follows_changes() {
        let session = ChatSession::new(ScriptedAgent::default());
        let mut updates = session.updates();

        let first = updates.next().await.unwrap();
        assert_eq!(first.timeline.len(), 1);

        session.submit("hi").await;
        let latest = updates.next().await.unwrap();
        assert_eq!(latest.timeline.len(), 3);
        assert!(!latest.is_pending);
    }

    #[tokio::test]
    async fn test_timeline_growth_over_many_sends() {
        let mut script = Vec::new();
        for i in 0..10 {
            if i % 3 == 0 {
                script.push(Err(AgentError::Unavailable("down".to_string())));
            } else {
                script.push(Ok(AgentReply::PlainText(format!("reply {i}"))));
            }
        }
        let session = ChatSession::new(ScriptedAgent::new(script));

        for i in 0..10 {
            let before = session.snapshot().timeline.len();
            let outcome = session.submit(&format!("question {i}")).await;
            let after = session.snapshot().timeline.len();
            match outcome {
                SubmitOutcome::Answered => assert_eq!(after, before + 2),
                SubmitOutcome::Failed => assert_eq!(after, before + 1),
                other => panic!("unexpected outcome {other:?}"),
            }
        }
    }
}
