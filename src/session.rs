//! Conversation state for a single session
//!
//! A [`Session`] keeps two parallel representations of the conversation:
//! display turns (speaker, `HH:MM` timestamp, text) for rendering, and
//! role/content messages for the chat-completion payload. Both grow in
//! lockstep, one entry per utterance, and are cleared only by reset.

use chrono::Local;
use serde::Serialize;

/// Who produced an utterance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    User,
    Assistant,
}

impl Speaker {
    /// Role string used in the chat-completion payload
    #[must_use]
    pub const fn role(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// One recorded utterance, immutable once created
#[derive(Debug, Clone)]
pub struct Turn {
    /// Who spoke
    pub speaker: Speaker,

    /// Wall-clock time of the utterance, formatted `HH:MM`
    pub timestamp: String,

    /// Utterance text
    pub text: String,
}

/// One entry of the prompt history sent to the chat-completion API
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: &'static str,
    pub content: String,
}

/// Conversation state for one interactive session
///
/// Mutated only by the turn controller; everything else reads.
#[derive(Debug, Default)]
pub struct Session {
    turns: Vec<Turn>,
    history: Vec<ChatMessage>,
}

impl Session {
    /// Create an empty session
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an utterance to both representations
    pub fn push(&mut self, speaker: Speaker, text: impl Into<String>) {
        let text = text.into();
        self.turns.push(Turn {
            speaker,
            timestamp: Local::now().format("%H:%M").to_string(),
            text: text.clone(),
        });
        self.history.push(ChatMessage {
            role: speaker.role(),
            content: text,
        });
        debug_assert_eq!(self.turns.len(), self.history.len());
    }

    /// Display turns, in chronological order
    #[must_use]
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Prompt history, in chronological order
    #[must_use]
    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }

    /// Number of recorded turns
    #[must_use]
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Check whether the session has no turns
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Clear both representations
    pub fn clear(&mut self) {
        self.turns.clear();
        self.history.clear();
    }
}
