//! Terminal front end: argument parsing, commands and rendering.

mod args;
mod commands;
mod render;
mod repl;

pub use args::{Cli, Commands};
pub use commands::execute;
pub use render::{format_message, TimelineView};
pub use repl::ChatInput;
