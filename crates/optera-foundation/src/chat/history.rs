//! Bounded conversation log

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// One question/answer exchange.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationEntry {
    /// RFC 3339
    pub timestamp: String,
    pub user_message: String,
    pub ai_response: String,
    /// System context the answer was generated with
    pub system_context: serde_json::Value,
}

/// Conversation history
///
/// Keeps the most recent `max_entries` exchanges; older ones are dropped.
#[derive(Debug, Clone)]
pub struct ConversationHistory {
    entries: VecDeque<ConversationEntry>,
    max_entries: usize,
}

impl ConversationHistory {
    pub const DEFAULT_MAX_ENTRIES: usize = 10;

    pub fn new() -> Self {
        Self::with_max_entries(Self::DEFAULT_MAX_ENTRIES)
    }

    pub fn with_max_entries(max_entries: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(max_entries),
            max_entries,
        }
    }

    pub fn push(&mut self, entry: ConversationEntry) {
        self.entries.push_back(entry);
        while self.entries.len() > self.max_entries {
            self.entries.pop_front();
        }
    }

    /// Up to `limit` most recent entries, oldest first.
    pub fn recent(&self, limit: usize) -> Vec<ConversationEntry> {
        let skip = self.entries.len().saturating_sub(limit);
        self.entries.iter().skip(skip).cloned().collect()
    }

    /// The last `n` exchanges rendered as `User: ...\nAssistant: ...` lines.
    pub fn transcript(&self, n: usize) -> String {
        let skip = self.entries.len().saturating_sub(n);
        self.entries
            .iter()
            .skip(skip)
            .map(|e| format!("User: {}\nAssistant: {}", e.user_message, e.ai_response))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ConversationHistory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(i: usize) -> ConversationEntry {
        ConversationEntry {
            timestamp: format!("t{i}"),
            user_message: format!("q{i}"),
            ai_response: format!("a{i}"),
            system_context: serde_json::Value::Null,
        }
    }

    #[test]
    fn drops_oldest_beyond_capacity() {
        let mut history = ConversationHistory::with_max_entries(3);
        for i in 0..5 {
            history.push(entry(i));
        }
        assert_eq!(history.len(), 3);
        let kept: Vec<_> = history.recent(10).into_iter().map(|e| e.user_message).collect();
        assert_eq!(kept, vec!["q2", "q3", "q4"]);
    }

    #[test]
    fn recent_returns_tail_in_order() {
        let mut history = ConversationHistory::new();
        for i in 0..4 {
            history.push(entry(i));
        }
        let tail: Vec<_> = history.recent(2).into_iter().map(|e| e.user_message).collect();
        assert_eq!(tail, vec!["q2", "q3"]);
        assert!(history.recent(0).is_empty());
    }

    #[test]
    fn transcript_of_last_exchanges() {
        let mut history = ConversationHistory::new();
        assert_eq!(history.transcript(2), "");
        for i in 0..3 {
            history.push(entry(i));
        }
        assert_eq!(history.transcript(2), "User: q1\nAssistant: a1\nUser: q2\nAssistant: a2");
    }

    #[test]
    fn clear_empties() {
        let mut history = ConversationHistory::new();
        history.push(entry(0));
        history.clear();
        assert!(history.is_empty());
    }
}
