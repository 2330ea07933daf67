//! Chat session core.
//!
//! [`TimelineStore`] holds the single [`SessionState`] behind a watch channel,
//! [`Coordinator`] drives one agent request at a time against it, and
//! [`ChatSession`] ties both together with the conversation-level operations
//! the presentation layer calls.

mod coordinator;
mod session;
mod state;
mod store;
mod timeline;

#[cfg(test)]
pub(crate) mod testing;

pub use coordinator::{Coordinator, SubmitOutcome};
pub use session::ChatSession;
pub use state::{derive_title, SessionState};
pub use store::TimelineStore;
pub use timeline::Timeline;

/// Title of a conversation before its first user message.
pub const NEW_CONVERSATION_TITLE: &str = "New conversation";

/// Text of the synthetic bot entry every conversation starts with.
pub const WELCOME_TEXT: &str = "Hello! I’m The Alchemist. Ask me anything about your project, \
research, or code and I’ll do my best to help.";

/// The only error text the presentation layer ever sees.
pub const ASSISTANT_UNAVAILABLE: &str =
    "The assistant is unavailable right now. Please try again in a moment.";

pub const STATUS_RETRY_HINT: &str = "We hit a snag. Feel free to retry.";
pub const STATUS_THINKING: &str = "Assistant is thinking...";
pub const STATUS_IDLE: &str = "Ask about Minerals.";

/// Titles longer than this many characters are truncated.
pub const TITLE_MAX_CHARS: usize = 36;
/// Characters kept from a truncated title, before the ellipsis.
pub const TITLE_KEEP_CHARS: usize = 33;
pub const TITLE_ELLIPSIS: &str = "…";
