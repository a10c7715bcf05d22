//! Conversation history store: ordered, append-only, trimmed to a window before each request.
//!
//! Older turns beyond the window are dropped for good; the window bounds token cost
//! and latency against the provider.

use crate::message::ChatMessage;

/// Number of most recent turns sent as context.
pub const HISTORY_WINDOW: usize = 6;

/// Session-scoped conversation history.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversationHistory {
    messages: Vec<ChatMessage>,
}

impl ConversationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one turn. No deduplication, no content checks.
    pub fn append(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    /// Returns the last `window` turns (newest included) in original order.
    pub fn trimmed(&self, window: usize) -> &[ChatMessage] {
        let start = self.messages.len().saturating_sub(window);
        &self.messages[start..]
    }

    /// Returns a new history with `text` appended as a user turn and trimmed to `window`.
    ///
    /// This is what gets sent: it always ends with the newest user turn.
    pub fn with_user_turn(&self, text: impl Into<String>, window: usize) -> Self {
        let mut next = self.clone();
        next.append(ChatMessage::user(text));
        let keep = next.trimmed(window).to_vec();
        Self { messages: keep }
    }

    pub fn clear(&mut self) {
        self.messages.clear();
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

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }
}

impl From<Vec<ChatMessage>> for ConversationHistory {
    fn from(messages: Vec<ChatMessage>) -> Self {
        Self { messages }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Role;

    fn numbered(n: usize) -> ConversationHistory {
        let mut h = ConversationHistory::new();
        for i in 0..n {
            if i % 2 == 0 {
                h.append(ChatMessage::user(format!("m{}", i)));
            } else {
                h.append(ChatMessage::assistant(format!("m{}", i)));
            }
        }
        h
    }

    #[test]
    fn trimmed_keeps_everything_under_window() {
        let h = numbered(4);
        assert_eq!(h.trimmed(HISTORY_WINDOW).len(), 4);
    }

    #[test]
    fn trimmed_keeps_most_recent_in_order() {
        let h = numbered(9);
        let kept: Vec<&str> = h
            .trimmed(HISTORY_WINDOW)
            .iter()
            .map(|m| m.text.as_str())
            .collect();
        assert_eq!(kept, vec!["m3", "m4", "m5", "m6", "m7", "m8"]);
    }

    #[test]
    fn trimmed_with_zero_window_is_empty() {
        assert!(numbered(3).trimmed(0).is_empty());
    }

    #[test]
    fn with_user_turn_appends_and_caps() {
        let h = numbered(7);
        let next = h.with_user_turn("newest", HISTORY_WINDOW);
        assert_eq!(next.len(), HISTORY_WINDOW);
        let last = next.last().unwrap();
        assert_eq!(last.role, Role::User);
        assert_eq!(last.text, "newest");
        assert_eq!(next.messages()[0].text, "m2");
        // original is untouched
        assert_eq!(h.len(), 7);
    }

    #[test]
    fn clear_empties_history() {
        let mut h = numbered(3);
        h.clear();
        assert!(h.is_empty());
    }
}
