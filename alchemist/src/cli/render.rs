//! Plain-text rendering of session state for the terminal.

use std::io::{self, Write};

use crate::chat::SessionState;
use crate::models::{ArtifactKind, Message};

/// One timeline entry as printed in the transcript.
pub fn format_message(message: &Message) -> String {
    let author = if message.is_user() { "you" } else { "alchemist" };
    let line = format!("[{}] {author}: {}", message.display_time(), message.text);

    match &message.artifact {
        Some(artifact) => {
            let kind = match artifact.kind() {
                ArtifactKind::Image => "image",
                ArtifactKind::Document => "document",
            };
            format!("{line}\n    [{kind}: {artifact}]")
        }
        None => line,
    }
}

/// Incremental renderer: each call prints only what changed since the last.
///
/// A new conversation index starts the transcript over.
#[derive(Debug, Default)]
pub struct TimelineView {
    conversation: Option<u32>,
    title: String,
    shown: usize,
    status: Option<&'static str>,
    error: Option<String>,
}

impl TimelineView {
    /// # Errors
    ///
    /// Returns any error from writing to `out`.
    pub fn render(&mut self, state: &SessionState, out: &mut impl Write) -> io::Result<()> {
        if self.conversation != Some(state.conversation_index) {
            *self = Self {
                conversation: Some(state.conversation_index),
                ..Self::default()
            };
        }

        let title = state.display_title();
        if title != self.title {
            writeln!(out, "\n== {title} ==")?;
            self.title = title;
        }

        for message in state.timeline.iter().skip(self.shown) {
            writeln!(out, "{}", format_message(message))?;
        }
        self.shown = state.timeline.len();

        if state.last_error != self.error {
            if let Some(error) = &state.last_error {
                writeln!(out, "! {error} (type /dismiss to clear)")?;
            }
            self.error.clone_from(&state.last_error);
        }

        let status = state.status_line();
        if self.status != Some(status) {
            writeln!(out, "-- {status}")?;
            self.status = Some(status);
        }

        out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::{TimelineStore, ASSISTANT_UNAVAILABLE, STATUS_IDLE, STATUS_THINKING};
    use crate::models::ArtifactRef;

    fn render(view: &mut TimelineView, state: &SessionState) -> String {
        let mut out = Vec::new();
        view.render(state, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_format_user_and_bot() {
        let user = format_message(&Message::user("What is pyrite?"));
        assert!(user.ends_with("you: What is pyrite?"));
        assert!(user.starts_with('['));

        let bot = format_message(&Message::bot("Fool's gold.", None));
        assert!(bot.ends_with("alchemist: Fool's gold."));
    }

    #[test]
    fn test_format_artifact_kind() {
        let image = Message::bot("", Some(ArtifactRef::new("plots/hist.png")));
        assert!(format_message(&image).ends_with("[image: plots/hist.png]"));

        let doc = Message::bot("Report", Some(ArtifactRef::new("out/report.pdf")));
        assert!(format_message(&doc).ends_with("[document: out/report.pdf]"));
    }

    #[test]
    fn test_first_render_shows_welcome() {
        let mut view = TimelineView::default();
        let text = render(&mut view, &SessionState::new());

        assert!(text.contains("== Conversation 1 =="));
        assert!(text.contains("alchemist: Hello!"));
        assert!(text.contains(STATUS_IDLE));
    }

    #[test]
    fn test_only_changes_are_printed() {
        let store = TimelineStore::new();
        let mut view = TimelineView::default();
        render(&mut view, &store.snapshot());

        store.append(Message::user("hello"));
        store.update(|s| {
            s.is_pending = true;
            true
        });
        let text = render(&mut view, &store.snapshot());
        assert!(!text.contains("Hello!"));
        assert!(text.contains("you: hello"));
        assert!(text.contains(STATUS_THINKING));

        assert!(render(&mut view, &store.snapshot()).is_empty());
    }

    #[test]
    fn test_error_shown_once_with_hint() {
        let mut view = TimelineView::default();
        let mut state = SessionState::new();
        render(&mut view, &state);

        state.last_error = Some(ASSISTANT_UNAVAILABLE.to_string());
        let text = render(&mut view, &state);
        assert!(text.contains(ASSISTANT_UNAVAILABLE));
        assert!(text.contains("/dismiss"));

        assert!(!render(&mut view, &state).contains(ASSISTANT_UNAVAILABLE));
    }

    #[test]
    fn test_reset_starts_transcript_over() {
        let store = TimelineStore::new();
        let mut view = TimelineView::default();
        store.append(Message::user("first"));
        render(&mut view, &store.snapshot());

        store.reset();
        let text = render(&mut view, &store.snapshot());
        assert!(text.contains("== Conversation 2 =="));
        assert!(text.contains("alchemist: Hello!"));
        assert!(text.contains(STATUS_IDLE));
    }
}
