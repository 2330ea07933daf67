//! HTTP client for the agent backend.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{AgentError, AgentPayload, AgentQueryRequest, AgentReply, AgentService};

/// Health report from `GET /api/agent/health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentHealth {
    pub success: bool,
    pub message: String,
}

/// Agent Service backed by the `/api/agent/chat` endpoint.
///
/// The underlying client has no request timeout.
#[derive(Debug, Clone)]
pub struct HttpAgentService {
    client: reqwest::Client,
    base_url: String,
}

impl HttpAgentService {
    /// Create a client for the backend at `base_url` (e.g. `http://127.0.0.1:8000`).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Create a client reusing an existing `reqwest::Client`.
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Check whether the agent system is up.
    ///
    /// # Errors
    ///
    /// `Transport` if the request fails, `Status` for a non-success status
    /// and `Malformed` for an unexpected body.
    pub async fn health(&self) -> Result<AgentHealth, AgentError> {
        let url = format!("{}/api/agent/health", self.base_url);
        let resp = self.client.get(&url).send().await?;

        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(AgentError::Status {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|e| AgentError::Malformed(e.to_string()))
    }
}

#[async_trait]
impl AgentService for HttpAgentService {
    async fn query(&self, query: &str) -> Result<AgentReply, AgentError> {
        let url = format!("{}/api/agent/chat", self.base_url);
        debug!(%url, "sending agent query");

        let resp = self
            .client
            .post(&url)
            .json(&AgentQueryRequest {
                query: query.to_string(),
            })
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(AgentError::Status {
                status: status.as_u16(),
                body,
            });
        }

        AgentPayload::parse(&body)?.into_reply()
    }
}
