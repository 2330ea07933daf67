//! CLI argument definitions.

use clap::{Parser, Subcommand};

use crate::config::{DEFAULT_AGENT_URL, DEFAULT_SERVER_PORT};

/// Alchemist - ask the mineral data agent about your project, research, or code
#[derive(Parser, Debug)]
#[command(name = "alchemist")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Base URL of the agent backend
    #[arg(long, env = "ALCHEMIST_AGENT_URL", default_value = DEFAULT_AGENT_URL, global = true)]
    pub agent_url: String,

    /// Answer from the built-in simulated agent instead of the backend
    #[arg(long, env = "ALCHEMIST_SIMULATED", global = true)]
    pub simulated: bool,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute (defaults to `chat`)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Start an interactive conversation
    Chat,

    /// Send one message and print the reply
    Ask {
        /// Print the reply as it arrives (simulated agent only)
        #[arg(long)]
        stream: bool,

        /// Message to send
        #[arg(trailing_var_arg = true, required = true)]
        message: Vec<String>,
    },

    /// Check that the agent backend is healthy
    Health,

    /// Run the development backend
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value_t = DEFAULT_SERVER_PORT)]
        port: u16,
    },

    /// Sign in to the backend
    Login {
        #[arg(long)]
        email: String,

        #[arg(long, env = "ALCHEMIST_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Create an account on the backend
    Register {
        #[arg(long)]
        name: String,

        #[arg(long)]
        email: String,

        #[arg(long, env = "ALCHEMIST_PASSWORD", hide_env_values = true)]
        password: String,
    },
}
