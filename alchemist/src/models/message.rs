//! Message model representing one entry in the conversation timeline.

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

use super::ArtifactRef;
use crate::ids::generate_id;

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    /// Message typed by the user.
    User,
    /// Message produced by the assistant (including the welcome entry).
    Bot,
}

impl Sender {
    /// Convert sender to its wire/display string.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Bot => "bot",
        }
    }
}

impl std::fmt::Display for Sender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single timeline entry. Never mutated once it has been appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Unique identifier, stable for the lifetime of the session.
    pub id: String,
    /// Author of the message.
    pub sender: Sender,
    /// Message body. Empty only for bot entries carrying an artifact.
    pub text: String,
    /// Creation time. Display only; timeline position is the order.
    pub timestamp: DateTime<Utc>,
    /// Generated visual asset attached to a bot reply.
    pub artifact: Option<ArtifactRef>,
}

impl Message {
    /// Create a user message. The caller is responsible for trimming.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            id: generate_id("user"),
            sender: Sender::User,
            text: text.into(),
            timestamp: Utc::now(),
            artifact: None,
        }
    }

    /// Create a bot message with an optional artifact.
    pub fn bot(text: impl Into<String>, artifact: Option<ArtifactRef>) -> Self {
        Self {
            id: generate_id("bot"),
            sender: Sender::Bot,
            text: text.into(),
            timestamp: Utc::now(),
            artifact,
        }
    }

    /// Whether this message was authored by the user.
    pub const fn is_user(&self) -> bool {
        matches!(self.sender, Sender::User)
    }

    /// Creation time formatted as local `HH:MM`.
    pub fn display_time(&self) -> String {
        self.timestamp.with_timezone(&Local).format("%H:%M").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sender_display() {
        assert_eq!(Sender::User.to_string(), "user");
        assert_eq!(Sender::Bot.to_string(), "bot");
    }

    #[test]
    fn test_constructors_use_prefixed_ids() {
        let user = Message::user("hi");
        let bot = Message::bot("", Some(ArtifactRef::new("/plots/a.png")));

        assert!(user.id.starts_with("user-"));
        assert!(user.is_user());
        assert!(bot.id.starts_with("bot-"));
        assert!(bot.artifact.is_some());
    }

    #[test]
    fn test_display_time_is_hours_and_minutes() {
        let message = Message::user("hi");
        let shown = message.display_time();
        assert_eq!(shown.len(), 5);
        assert_eq!(&shown[2..3], ":");
    }
}
