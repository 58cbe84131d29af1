//! Game configuration.
//!
//! Loaded once from a TOML file at startup and passed down explicitly.
//! Every field has a default, so a partial file only overrides what it
//! names and a missing file is not an error.

use crate::participant::Role;
use crate::prompts::Language;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// Errors from loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// How models are assigned to players.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Every player uses the single test model.
    #[default]
    Test,
    /// Each player gets a distinct model from the arena list.
    Arena,
}

/// How many players receive each role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoleCounts {
    pub werewolf: usize,
    pub seer: usize,
    pub witch: usize,
    pub villager: usize,
}

impl Default for RoleCounts {
    fn default() -> Self {
        Self {
            werewolf: 2,
            seer: 1,
            witch: 1,
            villager: 2,
        }
    }
}

impl RoleCounts {
    pub fn total(&self) -> usize {
        self.werewolf + self.seer + self.witch + self.villager
    }

    /// The role multiset, unshuffled.
    pub fn deck(&self) -> Vec<Role> {
        Role::PLAYER_ROLES
            .iter()
            .flat_map(|&role| std::iter::repeat(role).take(self.count(role)))
            .collect()
    }

    pub fn count(&self, role: Role) -> usize {
        match role {
            Role::Werewolf => self.werewolf,
            Role::Seer => self.seer,
            Role::Witch => self.witch,
            Role::Villager => self.villager,
            Role::Narrator => 0,
        }
    }
}

/// Model identifiers for each mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub test: String,
    pub arena: Vec<String>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            test: "x-ai/grok-4.1-fast:free".to_string(),
            arena: [
                "openai/gpt-5.1",
                "google/gemini-3-pro-preview",
                "anthropic/claude-sonnet-4.5",
                "x-ai/grok-4",
                "moonshotai/kimi-k2-thinking",
                "qwen/qwen3-235b-a22b-2507",
                "deepseek/deepseek-chat-v3-0324",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

/// Delays inserted between sequential generation calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PacingConfig {
    /// Between discussion speakers.
    pub speaker_delay_ms: u64,
    /// Between night actions and between day voters.
    pub action_delay_ms: u64,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            speaker_delay_ms: 1500,
            action_delay_ms: 1000,
        }
    }
}

impl PacingConfig {
    /// No delays at all. Used by tests.
    pub fn none() -> Self {
        Self {
            speaker_delay_ms: 0,
            action_delay_ms: 0,
        }
    }

    pub fn speaker_delay(&self) -> Duration {
        Duration::from_millis(self.speaker_delay_ms)
    }

    pub fn action_delay(&self) -> Duration {
        Duration::from_millis(self.action_delay_ms)
    }
}

/// Complete game configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub mode: Mode,
    pub language: Language,
    pub roles: RoleCounts,
    /// Name pool; the first `roles.total()` are dealt.
    pub player_names: Vec<String>,
    pub models: ModelConfig,
    pub narrator_name: String,
    pub narrator_model: String,
    /// Players who speak during the day discussion.
    pub discussion_speakers: usize,
    /// Stream responses fragment by fragment instead of fetching them whole.
    pub enable_streaming: bool,
    /// Relay night and vote decisions live rather than draining them silently.
    pub stream_decisions: bool,
    pub pacing: PacingConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            mode: Mode::default(),
            language: Language::default(),
            roles: RoleCounts::default(),
            player_names: ["Alice", "Bob", "Charlie", "Diana", "Eve", "Frank", "Grace", "Henry"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            models: ModelConfig::default(),
            narrator_name: "God".to_string(),
            narrator_model: "x-ai/grok-4.1-fast:free".to_string(),
            discussion_speakers: 3,
            enable_streaming: true,
            stream_decisions: true,
            pacing: PacingConfig::default(),
        }
    }
}

impl GameConfig {
    /// Load configuration from a TOML file.
    ///
    /// A missing file falls back to defaults. A file that exists but cannot
    /// be read or parsed is an error.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(path = %path.display(), "config file not found, using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.display().to_string(),
                    source,
                })
            }
        };

        let config = Self::from_toml_str(&content)?;
        debug!(path = %path.display(), ?config.mode, players = config.roles.total(), "loaded config");
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Number of players, excluding the narrator.
    pub fn num_players(&self) -> usize {
        self.roles.total()
    }

    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    pub fn with_roles(mut self, roles: RoleCounts) -> Self {
        self.roles = roles;
        self
    }

    pub fn with_pacing(mut self, pacing: PacingConfig) -> Self {
        self.pacing = pacing;
        self
    }

    pub fn with_discussion_speakers(mut self, speakers: usize) -> Self {
        self.discussion_speakers = speakers;
        self
    }

    pub fn with_stream_decisions(mut self, stream: bool) -> Self {
        self.stream_decisions = stream;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = GameConfig::default();
        assert_eq!(config.num_players(), 6);
        assert_eq!(config.narrator_name, "God");
        assert_eq!(config.discussion_speakers, 3);
        assert_eq!(config.pacing.speaker_delay_ms, 1500);
        assert_eq!(config.models.arena.len(), 7);
    }

    #[test]
    fn test_partial_file_merges_onto_defaults() {
        let config = GameConfig::from_toml_str(
            r#"
            mode = "arena"
            language = "zh"

            [roles]
            villager = 3

            [pacing]
            speaker_delay_ms = 0
            "#,
        )
        .unwrap();

        assert_eq!(config.mode, Mode::Arena);
        assert_eq!(config.language, Language::Zh);
        assert_eq!(config.roles.villager, 3);
        assert_eq!(config.roles.werewolf, 2);
        assert_eq!(config.pacing.speaker_delay_ms, 0);
        assert_eq!(config.pacing.action_delay_ms, 1000);
        assert_eq!(config.player_names.len(), 8);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = GameConfig::load(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, GameConfig::default());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "narrator_name = \"Moderator\"\ndiscussion_speakers = 2").unwrap();

        let config = GameConfig::load(file.path()).unwrap();
        assert_eq!(config.narrator_name, "Moderator");
        assert_eq!(config.discussion_speakers, 2);
    }

    #[test]
    fn test_malformed_file_is_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "mode = [").unwrap();

        assert!(matches!(
            GameConfig::load(file.path()),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_deck_matches_counts() {
        let deck = RoleCounts::default().deck();
        assert_eq!(deck.len(), 6);
        assert_eq!(deck.iter().filter(|r| **r == Role::Werewolf).count(), 2);
        assert_eq!(deck.iter().filter(|r| **r == Role::Villager).count(), 2);
    }
}
