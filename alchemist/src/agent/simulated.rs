//! Offline stand-in for the agent backend.
//!
//! Replies after a fixed latency with one of a few canned templates and fails
//! a configurable fraction of calls. Also offers a simulated incremental
//! delivery mode, which is a placeholder for a real streaming transport.

use std::time::Duration;

use async_trait::async_trait;
use futures::stream::{self, Stream, StreamExt};
use rand::prelude::IndexedRandom;
use tracing::debug;

use super::{AgentError, AgentReply, AgentService};

const DEFAULT_LATENCY: Duration = Duration::from_millis(1500);
const DEFAULT_FRAGMENT_DELAY: Duration = Duration::from_millis(50);
const DEFAULT_FAILURE_RATE: f64 = 0.1;

const REPLY_TEMPLATES: &[&str] = &[
    "I received your message: \"{}\". This is a simulated response.",
    "Interesting! You said: \"{}\". Let me help you with that.",
    "Thanks for sharing: \"{}\". How can I assist further?",
    "Got it! \"{}\" is noted. What would you like to know?",
];

/// Simulated agent used for offline development and demos.
#[derive(Debug, Clone)]
pub struct SimulatedAgent {
    latency: Duration,
    fragment_delay: Duration,
    failure_rate: f64,
}

impl Default for SimulatedAgent {
    fn default() -> Self {
        Self {
            latency: DEFAULT_LATENCY,
            fragment_delay: DEFAULT_FRAGMENT_DELAY,
            failure_rate: DEFAULT_FAILURE_RATE,
        }
    }
}

impl SimulatedAgent {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    #[must_use]
    pub const fn with_fragment_delay(mut self, delay: Duration) -> Self {
        self.fragment_delay = delay;
        self
    }

    /// Fraction of calls that fail, clamped to `0.0..=1.0`.
    #[must_use]
    pub fn with_failure_rate(mut self, rate: f64) -> Self {
        self.failure_rate = rate.clamp(0.0, 1.0);
        self
    }

    fn roll_outage(&self) -> Result<(), AgentError> {
        if self.failure_rate > 0.0 && rand::random::<f64>() < self.failure_rate {
            return Err(AgentError::Unavailable("Network error".to_string()));
        }
        Ok(())
    }

    fn canned_reply(query: &str) -> String {
        let template = REPLY_TEMPLATES
            .choose(&mut rand::rng())
            .unwrap_or(&REPLY_TEMPLATES[0]);
        template.replacen("{}", query, 1)
    }

    /// Lazily produce the reply as cumulative prefixes, one character per step.
    ///
    /// The stream is finite and single-use; each item is the full text
    /// delivered so far.
    pub fn stream_reply(&self, query: &str) -> impl Stream<Item = String> + Send + 'static {
        let full = format!("Streamed response to: \"{query}\"");
        let delay = self.fragment_delay;

        stream::unfold((full, 0usize), move |(full, emitted)| async move {
            let total = full.chars().count();
            if emitted >= total {
                return None;
            }
            tokio::time::sleep(delay).await;
            let prefix: String = full.chars().take(emitted + 1).collect();
            Some((prefix, (full, emitted + 1)))
        })
    }

    /// Deliver a reply incrementally through `on_fragment`, then resolve once.
    ///
    /// # Errors
    ///
    /// `Unavailable` when the simulated outage roll fails; no fragment is
    /// delivered in that case.
    pub async fn stream_query<F>(&self, query: &str, on_fragment: F) -> Result<AgentReply, AgentError>
    where
        F: FnMut(&str),
    {
        self.roll_outage()?;
        collect_fragments(self.stream_reply(query), on_fragment)
            .await
            .map(AgentReply::PlainText)
            .ok_or_else(|| AgentError::Malformed("stream ended without output".to_string()))
    }
}

/// Drain a fragment stream into a callback, returning the last fragment seen.
pub async fn collect_fragments<S, F>(fragments: S, mut on_fragment: F) -> Option<String>
where
    S: Stream<Item = String>,
    F: FnMut(&str),
{
    futures::pin_mut!(fragments);
    let mut last = None;
    while let Some(fragment) = fragments.next().await {
        on_fragment(&fragment);
        last = Some(fragment);
    }
    last
}

#[async_trait]
impl AgentService for SimulatedAgent {
    async fn query(&self, query: &str) -> Result<AgentReply, AgentError> {
        tokio::time::sleep(self.latency).await;
        self.roll_outage()?;
        debug!("simulated agent replying");
        Ok(AgentReply::PlainText(Self::canned_reply(query)))
    }
}
