//! Bounded conversation history.

use knowbot_core::{ChatMessage, Role};
use tracing::debug;

/// Chronological buffer of the turns replayed to the chat model.
///
/// Holds at most `window` messages. Pushing past the bound evicts from the
/// front, so the most recent turns always survive even if that leaves an
/// assistant reply at the head.
#[derive(Debug, Clone)]
pub struct History {
    window: usize,
    messages: Vec<ChatMessage>,
}

impl History {
    /// Create an empty history. A zero window is treated as one.
    #[must_use]
    pub fn new(window: usize) -> Self {
        let window = window.max(1);
        Self {
            window,
            messages: Vec::with_capacity(window + 1),
        }
    }

    /// Append a message and evict the oldest entries beyond the window.
    ///
    /// Returns the number of evicted messages.
    pub fn push(&mut self, message: ChatMessage) -> usize {
        self.messages.push(message);
        let excess = self.messages.len().saturating_sub(self.window);
        if excess > 0 {
            self.messages.drain(..excess);
            debug!("Evicted {excess} message(s) from history");
        }
        excess
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    #[must_use]
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    #[must_use]
    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.messages.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    #[must_use]
    pub const fn window(&self) -> usize {
        self.window
    }

    #[must_use]
    pub fn stats(&self) -> HistoryStats {
        let total_chars: usize = self.messages.iter().map(|m| m.content.chars().count()).sum();
        let user_messages = self
            .messages
            .iter()
            .filter(|m| m.role == Role::User)
            .count();

        HistoryStats {
            total_messages: self.messages.len(),
            user_messages,
            assistant_messages: self.messages.len() - user_messages,
            total_characters: total_chars,
            estimated_tokens: total_chars / 4, // ~4 chars per token
        }
    }
}

/// Statistics about the current history window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryStats {
    pub total_messages: usize,
    pub user_messages: usize,
    pub assistant_messages: usize,
    pub total_characters: usize,
    pub estimated_tokens: usize,
}
