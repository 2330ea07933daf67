//! Agent doubles for exercising the coordinator.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::agent::{AgentError, AgentReply, AgentService};

/// Returns queued results in order, then plain `"ok"` replies.
#[derive(Default)]
pub struct ScriptedAgent {
    results: Mutex<VecDeque<Result<AgentReply, AgentError>>>,
    queries: Mutex<Vec<String>>,
}

impl ScriptedAgent {
    pub fn new(results: Vec<Result<AgentReply, AgentError>>) -> Self {
        Self {
            results: Mutex::new(results.into()),
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl AgentService for ScriptedAgent {
    async fn query(&self, query: &str) -> Result<AgentReply, AgentError> {
        self.queries.lock().unwrap().push(query.to_string());
        self.results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(AgentReply::PlainText("ok".to_string())))
    }
}

/// Holds every call until the gate is opened once per call.
pub struct GatedAgent {
    pub gate: Arc<Notify>,
    fail: bool,
}

impl GatedAgent {
    pub fn new(fail: bool) -> Self {
        Self {
            gate: Arc::new(Notify::new()),
            fail,
        }
    }
}

#[async_trait]
impl AgentService for GatedAgent {
    async fn query(&self, query: &str) -> Result<AgentReply, AgentError> {
        self.gate.notified().await;
        if self.fail {
            Err(AgentError::Unavailable("gate closed".to_string()))
        } else {
            Ok(AgentReply::PlainText(format!("answer to {query}")))
        }
    }
}
