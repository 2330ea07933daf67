//! Agent Service boundary.
//!
//! The chat core talks to the remote agent only through [`AgentService`].
//! Every implementation normalises its response into an [`AgentReply`], so the
//! coordinator never sees wire shapes, and reports failures as [`AgentError`].

mod http;
mod reply;
mod simulated;

use async_trait::async_trait;
use thiserror::Error;

pub use http::{AgentHealth, HttpAgentService};
pub use reply::{AgentPayload, AgentQueryRequest, AgentQueryResponse, AgentReply};
pub use simulated::{collect_fragments, SimulatedAgent};

/// Failure of a single Agent Service call.
#[derive(Debug, Error)]
pub enum AgentError {
    /// The request never produced a response.
    #[error("agent request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered with a non-success HTTP status.
    #[error("agent service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body did not match any accepted shape.
    #[error("malformed agent response: {0}")]
    Malformed(String),

    /// The service reported `success: false`.
    #[error("agent rejected the query: {0}")]
    Rejected(String),

    /// The service is unreachable or refused to work (simulated outages).
    #[error("agent unavailable: {0}")]
    Unavailable(String),
}

/// A remote agent that answers one query at a time.
#[async_trait]
pub trait AgentService: Send + Sync {
    /// Send a trimmed, non-empty query and wait for exactly one outcome.
    ///
    /// There is no timeout: a call that never resolves keeps the caller
    /// pending.
    async fn query(&self, query: &str) -> Result<AgentReply, AgentError>;
}
