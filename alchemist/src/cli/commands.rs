//! CLI command execution.

use std::io::Write;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tracing::warn;

use crate::agent::{HttpAgentService, SimulatedAgent};
use crate::auth::{self, AuthContext, HttpAuthBackend};
use crate::chat::{ChatSession, SubmitOutcome, ASSISTANT_UNAVAILABLE};
use crate::config::Config;
use crate::models::User;
use crate::server;

use super::args::{Cli, Commands};
use super::render::format_message;
use super::repl;

/// Execute the CLI command.
///
/// # Errors
///
/// Returns an error if the command fails, including a failed `ask`.
pub async fn execute(cli: Cli) -> Result<()> {
    let config = Config::from(&cli);

    match cli.command.unwrap_or(Commands::Chat) {
        Commands::Chat => repl::run(ChatSession::with_shared_agent(config.agent())).await,
        Commands::Ask { stream, message } => {
            let message = message.join(" ");
            if stream {
                ask_streaming(&config, &message).await
            } else {
                ask(&config, &message).await
            }
        }
        Commands::Health => check_health(&config).await,
        Commands::Serve { port } => server::start_server(port).await,
        Commands::Login { email, password } => {
            let ctx = auth_context(&config)?;
            let user = ctx.login(&email, &password).await.context("Login failed")?;
            print_signed_in(ctx, &user).await
        }
        Commands::Register {
            name,
            email,
            password,
        } => {
            let ctx = auth_context(&config)?;
            let user = ctx
                .register(&name, &email, &password)
                .await
                .context("Registration failed")?;
            print_signed_in(ctx, &user).await
        }
    }
}

/// Submit one message through a fresh session and print the reply.
async fn ask(config: &Config, message: &str) -> Result<()> {
    if message.trim().is_empty() {
        bail!("Message is required for ask command");
    }

    let session = ChatSession::with_shared_agent(config.agent());
    let outcome = session.submit(message).await;
    let state = session.snapshot();

    if outcome != SubmitOutcome::Answered {
        let error = state
            .last_error
            .unwrap_or_else(|| ASSISTANT_UNAVAILABLE.to_string());
        bail!("{error}");
    }
    if let Some(reply) = state.timeline.last() {
        println!("{}", format_message(reply));
    }
    Ok(())
}

/// Print the simulated reply fragment by fragment.
async fn ask_streaming(config: &Config, message: &str) -> Result<()> {
    if !config.simulated {
        bail!("--stream needs the simulated agent (pass --simulated)");
    }
    let message = message.trim();
    if message.is_empty() {
        bail!("Message is required for ask command");
    }

    let mut printed = 0;
    let result = SimulatedAgent::new()
        .stream_query(message, |fragment| {
            // Fragments are cumulative, so only the new tail is printed.
            print!("{}", &fragment[printed..]);
            let _ = std::io::stdout().flush();
            printed = fragment.len();
        })
        .await;

    if let Err(err) = result {
        warn!(error = %err, "streamed query failed");
        bail!(ASSISTANT_UNAVAILABLE);
    }
    println!();
    Ok(())
}

async fn check_health(config: &Config) -> Result<()> {
    if config.simulated {
        println!("Simulated agent: healthy");
        return Ok(());
    }

    let agent = HttpAgentService::new(config.agent_url.clone());
    let health = agent
        .health()
        .await
        .with_context(|| format!("Failed to reach agent at {}", agent.base_url()))?;

    if !health.success {
        bail!("Agent at {} is unhealthy: {}", agent.base_url(), health.message);
    }
    println!("Agent at {}: {}", agent.base_url(), health.message);
    Ok(())
}

fn auth_context(config: &Config) -> Result<&'static AuthContext> {
    let backend = HttpAuthBackend::new(config.agent_url.clone())
        .context("Failed to build auth client")?;
    Ok(auth::init(Arc::new(backend)))
}

/// Confirm the new session with the backend, then report who is signed in.
async fn print_signed_in(ctx: &AuthContext, user: &User) -> Result<()> {
    match ctx.refresh().await {
        Ok(Some(current)) => println!("Signed in as {} <{}>", current.name, current.email),
        Ok(None) => bail!("Backend accepted {} but reports no session", user.email),
        Err(err) => {
            warn!(error = %err, "could not confirm session");
            println!("Signed in as {} <{}>", user.name, user.email);
        }
    }
    Ok(())
}
