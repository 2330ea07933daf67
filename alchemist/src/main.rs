//! Alchemist - chat with the mineral data agent from the terminal.
//!
//! Architecture:
//! - `chat` owns the conversation state and the request lifecycle
//! - `agent` talks to the backend (or a simulated stand-in)
//! - `serve` runs a development backend with the same endpoints

use alchemist::cli::{execute, Cli};
use alchemist::config::Config;
use anyhow::Result;
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(Config::from(&cli).log_filter())
        .with_writer(std::io::stderr)
        .init();

    execute(cli).await
}
