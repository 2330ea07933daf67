//! Ordered, append-only message sequence.

use crate::ids::generate_id;
use crate::models::Message;

use super::WELCOME_TEXT;

/// Insertion-ordered messages. Entries are only ever appended, or the whole
/// sequence is replaced by [`Timeline::reset`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timeline {
    messages: Vec<Message>,
}

impl Default for Timeline {
    fn default() -> Self {
        Self::new()
    }
}

impl Timeline {
    /// A fresh timeline holding only the welcome message.
    pub fn new() -> Self {
        Self {
            messages: vec![Self::welcome_message()],
        }
    }

    fn welcome_message() -> Message {
        let mut message = Message::bot(WELCOME_TEXT, None);
        message.id = generate_id("welcome");
        message
    }

    pub(crate) fn append(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub(crate) fn reset(&mut self) {
        self.messages = vec![Self::welcome_message()];
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Always false in practice; a timeline holds at least the welcome entry.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn as_slice(&self) -> &[Message] {
        &self.messages
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Message> {
        self.messages.iter()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }
}

impl<'a> IntoIterator for &'a Timeline {
    type Item = &'a Message;
    type IntoIter = std::slice::Iter<'a, Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
