//! Participant memory.
//!
//! Append-only conversational context. Every completed exchange and every
//! system notification is kept, in order, for the life of the game.

use serde::{Deserialize, Serialize};

/// Prefix marking facts injected by the orchestrator.
pub const NOTIFICATION_PREFIX: &str = "[System Notification]: ";

/// Who authored a memory entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemoryRole {
    User,
    Assistant,
}

/// A single remembered message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryEntry {
    pub role: MemoryRole,
    pub content: String,
}

impl MemoryEntry {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MemoryRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MemoryRole::Assistant,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Memory {
    entries: Vec<MemoryEntry>,
}

impl Memory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inject a fact from the orchestrator.
    pub fn notify(&mut self, content: &str) {
        self.entries
            .push(MemoryEntry::user(format!("{NOTIFICATION_PREFIX}{content}")));
    }

    /// Record a completed prompt/response pair.
    pub fn record_exchange(&mut self, prompt: impl Into<String>, response: impl Into<String>) {
        self.entries.push(MemoryEntry::user(prompt));
        self.entries.push(MemoryEntry::assistant(response));
    }

    pub fn entries(&self) -> &[MemoryEntry] {
        &self.entries
    }

    /// Notifications received so far, without the prefix.
    pub fn notifications(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(|e| e.role == MemoryRole::User)
            .filter_map(|e| e.content.strip_prefix(NOTIFICATION_PREFIX))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notify_prefixes_content() {
        let mut memory = Memory::new();
        memory.notify("You saved Eve.");

        assert_eq!(memory.len(), 1);
        assert_eq!(
            memory.entries()[0],
            MemoryEntry::user("[System Notification]: You saved Eve.")
        );
    }

    #[test]
    fn test_record_exchange_appends_pair() {
        let mut memory = Memory::new();
        memory.record_exchange("Who is suspicious?", "Bob is quiet.");

        assert_eq!(memory.entries()[0].role, MemoryRole::User);
        assert_eq!(memory.entries()[1].role, MemoryRole::Assistant);
        assert_eq!(memory.entries()[1].content, "Bob is quiet.");
    }

    #[test]
    fn test_notifications_filters_exchanges() {
        let mut memory = Memory::new();
        memory.record_exchange("prompt", "answer");
        memory.notify("You checked Alice: Werewolf.");

        let notes: Vec<_> = memory.notifications().collect();
        assert_eq!(notes, vec!["You checked Alice: Werewolf."]);
    }
}
