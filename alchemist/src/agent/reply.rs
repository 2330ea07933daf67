//! Agent response shapes and their normalisation.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::AgentError;
use crate::models::ArtifactRef;

/// Request body for `POST /api/agent/chat`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentQueryRequest {
    pub query: String,
}

/// Structured response body from `POST /api/agent/chat`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgentQueryResponse {
    /// Whether the agent processed the query. Missing means success.
    #[serde(default = "default_success")]
    pub success: bool,
    /// Human-readable reply or summary.
    #[serde(default)]
    pub message: String,
    /// Generated data file (download attachment, not rendered by the core).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_file_path: Option<String>,
    /// Generated plot, rendered inline as the message artifact.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plot_file_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chart_spec: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chart_data: Option<Vec<Value>>,
    /// Detailed error when `success` is false.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

const fn default_success() -> bool {
    true
}

/// Any body the agent has been observed to send.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AgentPayload {
    Text(String),
    Structured(AgentQueryResponse),
}

/// Normalised successful reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentReply {
    PlainText(String),
    TextWithArtifact { text: String, artifact: ArtifactRef },
}

impl AgentReply {
    /// Build a reply, picking the variant from whether an artifact is present.
    ///
    /// Blank artifact references are treated as absent.
    pub fn new(text: impl Into<String>, artifact: Option<String>) -> Self {
        let text = text.into();
        match artifact.filter(|a| !a.trim().is_empty()) {
            Some(artifact) => Self::TextWithArtifact {
                text,
                artifact: ArtifactRef::new(artifact),
            },
            None => Self::PlainText(text),
        }
    }

    pub fn text(&self) -> &str {
        match self {
            Self::PlainText(text) | Self::TextWithArtifact { text, .. } => text,
        }
    }

    pub const fn artifact(&self) -> Option<&ArtifactRef> {
        match self {
            Self::PlainText(_) => None,
            Self::TextWithArtifact { artifact, .. } => Some(artifact),
        }
    }

    pub fn into_parts(self) -> (String, Option<ArtifactRef>) {
        match self {
            Self::PlainText(text) => (text, None),
            Self::TextWithArtifact { text, artifact } => (text, Some(artifact)),
        }
    }
}

impl AgentPayload {
    /// Parse a raw response body.
    ///
    /// # Errors
    ///
    /// `Malformed` if the body matches neither shape.
    pub fn parse(body: &str) -> Result<Self, AgentError> {
        serde_json::from_str(body).map_err(|e| AgentError::Malformed(e.to_string()))
    }

    /// Collapse either wire shape into an [`AgentReply`].
    ///
    /// # Errors
    ///
    /// `Rejected` for `success: false`, `Malformed` for a reply with neither
    /// text nor artifact.
    pub fn into_reply(self) -> Result<AgentReply, AgentError> {
        match self {
            Self::Text(text) if text.trim().is_empty() => {
                Err(AgentError::Malformed("empty reply".to_string()))
            }
            Self::Text(text) => Ok(AgentReply::PlainText(text)),
            Self::Structured(response) => response.into_reply(),
        }
    }
}

impl AgentQueryResponse {
    fn into_reply(self) -> Result<AgentReply, AgentError> {
        if !self.success {
            let detail = self
                .error
                .filter(|e| !e.is_empty())
                .unwrap_or(self.message);
            return Err(AgentError::Rejected(detail));
        }

        let reply = AgentReply::new(self.message, self.plot_file_path);
        if reply.text().trim().is_empty() && reply.artifact().is_none() {
            return Err(AgentError::Malformed(
                "reply has neither text nor artifact".to_string(),
            ));
        }
        Ok(reply)
    }
}
