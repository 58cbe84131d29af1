//! Terminal rendering of the event stream.
//!
//! Thought, speech and action events arrive as fragments. They are
//! buffered per (kind, agent) and printed once a fragment looks like the
//! end of a message.

use std::collections::HashMap;
use werewolf_core::{Event, EventKind, Role};

const RULE_WIDTH: usize = 70;

pub struct Viewer {
    buffers: HashMap<(EventKind, String), String>,
    roles: HashMap<String, Role>,
    narrator: String,
    god_mode: bool,
}

impl Viewer {
    pub fn new(god_mode: bool, narrator: impl Into<String>) -> Self {
        Self {
            buffers: HashMap::new(),
            roles: HashMap::new(),
            narrator: narrator.into(),
            god_mode,
        }
    }

    /// Role mapping used for emoji in god mode.
    pub fn with_roles(mut self, roles: impl IntoIterator<Item = (String, Role)>) -> Self {
        self.roles = roles.into_iter().collect();
        self
    }

    /// Feed one event; returns text to print, if any.
    pub fn handle(&mut self, event: &Event) -> Option<String> {
        match event.kind {
            EventKind::System => Some(format!("[SYSTEM] {}", event.content)),
            EventKind::Phase => {
                let rule = "━".repeat(RULE_WIDTH);
                Some(format!("\n{rule}\n  {}\n{rule}\n", event.content))
            }
            EventKind::GameOver => Some(format!("[GAME OVER] {}", event.content)),
            EventKind::Thought | EventKind::Speech | EventKind::Action => {
                let key = (event.kind, event.agent.clone());
                let buffer = self.buffers.entry(key).or_default();
                buffer.push_str(&event.content);

                if !ends_message(&event.content) {
                    return None;
                }
                let message = std::mem::take(buffer);
                self.buffers.remove(&(event.kind, event.agent.clone()));
                let message = message.trim();
                (!message.is_empty()).then(|| self.render(event.kind, &event.agent, message))
            }
        }
    }

    /// Print whatever is still buffered, e.g. after the stream closes.
    pub fn flush(&mut self) -> Vec<String> {
        let mut pending: Vec<_> = self.buffers.drain().collect();
        pending.sort_by(|a, b| a.0 .1.cmp(&b.0 .1));
        pending
            .into_iter()
            .filter_map(|((kind, agent), text)| {
                let text = text.trim();
                (!text.is_empty()).then(|| self.render(kind, &agent, text))
            })
            .collect()
    }

    fn render(&self, kind: EventKind, agent: &str, message: &str) -> String {
        let emoji = self.emoji(agent);
        match kind {
            EventKind::Thought => format!("💭 {emoji} {agent}: ({message})"),
            EventKind::Action => format!("⚡ {emoji} {agent} → {message}"),
            _ => format!("{emoji} {agent}: {message}"),
        }
    }

    fn emoji(&self, agent: &str) -> &'static str {
        if agent == self.narrator {
            return "⚡";
        }
        if !self.god_mode {
            return "🎭";
        }
        match self.roles.get(agent) {
            Some(Role::Werewolf) => "🐺",
            Some(Role::Seer) => "🔮",
            Some(Role::Witch) => "🧙",
            Some(Role::Villager) => "👤",
            _ => "🎭",
        }
    }
}

/// A fragment ending in a newline or sentence punctuation closes a message.
fn ends_message(fragment: &str) -> bool {
    fragment.ends_with(['\n', '.', '!', '?'])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(kind: EventKind, agent: &str, content: &str) -> Event {
        Event::new(kind, agent, content)
    }

    #[test]
    fn test_buffers_until_message_ends() {
        let mut viewer = Viewer::new(false, "God");

        assert_eq!(viewer.handle(&event(EventKind::Speech, "Alice", "I trust ")), None);
        assert_eq!(viewer.handle(&event(EventKind::Speech, "Bob", "Hmm ")), None);
        assert_eq!(
            viewer.handle(&event(EventKind::Speech, "Alice", "nobody.")),
            Some("🎭 Alice: I trust nobody.".to_string())
        );
        assert_eq!(viewer.flush(), vec!["🎭 Bob: Hmm".to_string()]);
    }

    #[test]
    fn test_god_mode_shows_roles() {
        let mut viewer = Viewer::new(true, "God")
            .with_roles(vec![("Alice".to_string(), Role::Werewolf)]);

        assert_eq!(
            viewer.handle(&event(EventKind::Action, "Alice", "Eve\n")),
            Some("⚡ 🐺 Alice → Eve".to_string())
        );
        assert_eq!(
            viewer.handle(&event(EventKind::Speech, "God", "Night falls.")),
            Some("⚡ God: Night falls.".to_string())
        );
    }

    #[test]
    fn test_system_events_print_immediately() {
        let mut viewer = Viewer::new(false, "God");
        assert_eq!(
            viewer.handle(&event(EventKind::System, "System", "Game Started")),
            Some("[SYSTEM] Game Started".to_string())
        );
        let phase = viewer
            .handle(&event(EventKind::Phase, "System", "Night Phase Started"))
            .unwrap();
        assert!(phase.contains("Night Phase Started"));
    }

    #[test]
    fn test_blank_messages_are_dropped() {
        let mut viewer = Viewer::new(false, "God");
        assert_eq!(viewer.handle(&event(EventKind::Thought, "Eve", "\n")), None);
        assert!(viewer.flush().is_empty());
    }
}
