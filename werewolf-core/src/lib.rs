//! Werewolf game orchestrator with LLM-driven participants.
//!
//! This crate provides:
//! - A phase/turn state machine alternating night and day
//! - Night and day protocols for werewolves, seer, witch and villagers
//! - Vote tallying with a first-seen tie-break
//! - An ordered event stream narrating everything that happens
//!
//! # Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use werewolf_core::{new_game, GameConfig, OpenRouterGenerator};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = GameConfig::load("game_config.toml")?;
//!     let generator = Arc::new(OpenRouterGenerator::from_env()?);
//!
//!     let (game, mut events) = new_game(config, generator, &mut rand::thread_rng())?;
//!     let handle = game.start();
//!
//!     while let Some(event) = events.recv().await {
//!         println!("{}", event.to_json());
//!     }
//!
//!     let outcome = handle.await?;
//!     println!("{} won after {} rounds", outcome.winner, outcome.rounds);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod events;
pub mod game;
pub mod generation;
pub mod participant;
pub mod prompts;
pub mod setup;
pub mod tally;
pub mod testing;

// Primary public API
pub use config::{ConfigError, GameConfig, Mode, PacingConfig, RoleCounts};
pub use events::{Event, EventBus, EventKind, EventStream, SYSTEM_AGENT};
pub use game::{Game, GameError, GameOutcome, WitchAction};
pub use generation::{
    FragmentStream, GenerationError, GenerationRequest, OpenRouterGenerator, Purpose, Relay,
    TextGenerator,
};
pub use participant::{Faction, Participant, ParticipantStatus, Role, Scene};
pub use prompts::{Language, Prompts, Task};
pub use setup::{assign_roles, build_roster, new_game, PlayerAssignment, SetupError};
pub use tally::{Ballot, Tally};
pub use testing::{FailingGenerator, ScriptedGenerator};
