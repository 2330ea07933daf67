//! Interactive chat loop.

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinHandle;
use tokio_stream::StreamExt;

use super::TimelineView;
use crate::chat::{ChatSession, SubmitOutcome};

const HELP: &str = "Commands: /new start a new conversation, /dismiss clear the error, \
/help show this list, /quit exit";

/// One line of user input, classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatInput {
    Empty,
    Message(String),
    New,
    Dismiss,
    Help,
    Quit,
    Unknown(String),
}

impl ChatInput {
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        match trimmed {
            "" => Self::Empty,
            "/new" => Self::New,
            "/dismiss" => Self::Dismiss,
            "/help" | "/?" => Self::Help,
            "/quit" | "/exit" => Self::Quit,
            cmd if cmd.starts_with('/') && !cmd.contains(char::is_whitespace) => {
                Self::Unknown(cmd.to_string())
            }
            text => Self::Message(text.to_string()),
        }
    }
}

fn refused_notice(text: &str) -> String {
    format!("Still waiting for the assistant, \"{text}\" was not sent.")
}

/// Submit in the background.
///
/// Pending is only set once the task runs, so a line typed right after
/// another can still land while a request is outstanding. Such a submission
/// comes back `Ignored` and is reported as refused here.
fn spawn_submit(session: ChatSession, text: String) -> JoinHandle<SubmitOutcome> {
    tokio::spawn(async move {
        let outcome = session.submit(&text).await;
        if outcome == SubmitOutcome::Ignored {
            println!("{}", refused_notice(&text));
        }
        outcome
    })
}

/// Run until `/quit` or end of input. Every state change is re-rendered.
pub(super) async fn run(session: ChatSession) -> Result<()> {
    let mut view = TimelineView::default();
    let mut updates = session.updates();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let stdout = std::io::stdout();

    println!("{HELP}");

    loop {
        tokio::select! {
            Some(state) = updates.next() => {
                view.render(&state, &mut stdout.lock())
                    .context("Failed to write to terminal")?;
            }
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read input")? else {
                    break;
                };
                match ChatInput::parse(&line) {
                    ChatInput::Empty => {}
                    ChatInput::Quit => break,
                    ChatInput::New => session.start_new(),
                    ChatInput::Dismiss => session.dismiss_error(),
                    ChatInput::Help => println!("{HELP}"),
                    ChatInput::Unknown(cmd) => println!("Unknown command: {cmd} (try /help)"),
                    ChatInput::Message(text) if session.is_pending() => {
                        println!("{}", refused_notice(&text));
                    }
                    ChatInput::Message(text) => {
                        spawn_submit(session.clone(), text);
                    }
                }
            }
        }
    }

    Ok(())
}
