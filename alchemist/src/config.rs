//! Runtime configuration resolved from flags and environment.

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::agent::{AgentService, HttpAgentService, SimulatedAgent};
use crate::cli::Cli;

/// Backend address used when neither `--agent-url` nor the env var is set.
pub const DEFAULT_AGENT_URL: &str = "http://127.0.0.1:8000";
/// Port the development server listens on by default.
pub const DEFAULT_SERVER_PORT: u16 = 8000;

const QUIET_FILTER: &str = "alchemist=warn";
const VERBOSE_FILTER: &str = "alchemist=debug,tower_http=debug";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base URL of the agent backend (no trailing slash needed).
    pub agent_url: String,
    /// Answer from the built-in simulated agent instead of the backend.
    pub simulated: bool,
    pub verbose: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            agent_url: DEFAULT_AGENT_URL.to_string(),
            simulated: false,
            verbose: false,
        }
    }
}

impl From<&Cli> for Config {
    fn from(cli: &Cli) -> Self {
        Self {
            agent_url: cli.agent_url.clone(),
            simulated: cli.simulated,
            verbose: cli.verbose,
        }
    }
}

impl Config {
    /// The Agent Service this configuration selects.
    pub fn agent(&self) -> Arc<dyn AgentService> {
        if self.simulated {
            Arc::new(SimulatedAgent::new())
        } else {
            Arc::new(HttpAgentService::new(self.agent_url.clone()))
        }
    }

    /// Log filter: `RUST_LOG` wins, otherwise derived from `verbose`.
    pub fn log_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(if self.verbose {
                VERBOSE_FILTER
            } else {
                QUIET_FILTER
            })
        })
    }
}
