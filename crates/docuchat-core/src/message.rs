//! Chat message types and session history

use serde::{Deserialize, Serialize};

/// A single chat message, tagged by role.
///
/// Modeled as a sum type with a role discriminator and text payload; the
/// role is fixed at construction and the content is immutable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", content = "content", rename_all = "snake_case")]
pub enum ChatMessage {
    System(String),
    Human(String),
    Ai(String),
}

impl ChatMessage {
    pub fn content(&self) -> &str {
        match self {
            ChatMessage::System(text) | ChatMessage::Human(text) | ChatMessage::Ai(text) => text,
        }
    }

    pub fn role(&self) -> &'static str {
        match self {
            ChatMessage::System(_) => "system",
            ChatMessage::Human(_) => "human",
            ChatMessage::Ai(_) => "ai",
        }
    }
}

/// Append-only ordered chat history with a bounded window.
///
/// The first message is expected to be the seed System message; it is always
/// retained. Beyond that, only the most recent `max_messages` entries are
/// kept, so a long-running session cannot grow a prompt without bound.
#[derive(Debug, Clone)]
pub struct ChatHistory {
    messages: Vec<ChatMessage>,
    max_messages: usize,
}

impl ChatHistory {
    pub const DEFAULT_MAX_MESSAGES: usize = 20;

    /// Create a history seeded with one System message.
    pub fn with_system(system: impl Into<String>) -> Self {
        Self {
            messages: vec![ChatMessage::System(system.into())],
            max_messages: Self::DEFAULT_MAX_MESSAGES,
        }
    }

    pub fn with_window(mut self, max_messages: usize) -> Self {
        self.max_messages = max_messages.max(1);
        self.trim();
        self
    }

    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
        self.trim();
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Render the history as a plain-text transcript, one `role: content`
    /// line per message, for inclusion in a prompt.
    pub fn as_transcript(&self) -> String {
        self.messages
            .iter()
            .map(|m| format!("{}: {}", m.role(), m.content()))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn trim(&mut self) {
        // Keep the seed system message plus the newest window.
        let system_seed = matches!(self.messages.first(), Some(ChatMessage::System(_)));
        let budget = self.max_messages + usize::from(system_seed);
        if self.messages.len() <= budget {
            return;
        }
        let drop = self.messages.len() - budget;
        let start = usize::from(system_seed);
        self.messages.drain(start..start + drop);
    }
}
