//! Mutable state of one chat session.

use super::{
    Timeline, NEW_CONVERSATION_TITLE, STATUS_IDLE, STATUS_RETRY_HINT, STATUS_THINKING,
    TITLE_ELLIPSIS, TITLE_KEEP_CHARS, TITLE_MAX_CHARS,
};

/// Everything the presentation layer renders from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    /// Messages of the current conversation, oldest first.
    pub timeline: Timeline,
    /// True exactly while an agent call is outstanding.
    pub is_pending: bool,
    /// User-facing error from the last failed request.
    pub last_error: Option<String>,
    /// Starts at 1; incremented once per reset.
    pub conversation_index: u32,
    /// Derived from the first user message, or the sentinel title.
    pub conversation_title: String,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            timeline: Timeline::new(),
            is_pending: false,
            last_error: None,
            conversation_index: 1,
            conversation_title: NEW_CONVERSATION_TITLE.to_string(),
        }
    }

    /// Start the next conversation in place.
    pub(crate) fn reset(&mut self) {
        self.timeline.reset();
        self.is_pending = false;
        self.last_error = None;
        self.conversation_index = self.conversation_index.saturating_add(1);
        self.conversation_title = NEW_CONVERSATION_TITLE.to_string();
    }

    /// Whether the title has been derived from a user message yet.
    pub fn has_title(&self) -> bool {
        self.conversation_title != NEW_CONVERSATION_TITLE
    }

    /// Title for the header, falling back to a numbered label.
    pub fn display_title(&self) -> String {
        if self.has_title() {
            self.conversation_title.clone()
        } else {
            format!("Conversation {}", self.conversation_index)
        }
    }

    /// One-line status. An error outranks pending, which outranks idle.
    pub const fn status_line(&self) -> &'static str {
        if self.last_error.is_some() {
            STATUS_RETRY_HINT
        } else if self.is_pending {
            STATUS_THINKING
        } else {
            STATUS_IDLE
        }
    }
}

/// Conversation title for a first user message.
///
/// Lengths count Unicode scalar values, not bytes.
pub fn derive_title(text: &str) -> String {
    if text.chars().count() > TITLE_MAX_CHARS {
        let kept: String = text.chars().take(TITLE_KEEP_CHARS).collect();
        format!("{kept}{TITLE_ELLIPSIS}")
    } else {
        text.to_string()
    }
}
