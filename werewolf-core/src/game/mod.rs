//! The game state machine.
//!
//! A [`Game`] owns the roster and the alive-set and drives alternating
//! night and day phases until one faction wins. Every step is sequential:
//! each participant call runs to completion before the next begins.

mod day;
mod night;

pub use night::{WitchAction, WitchOutcome};

use crate::config::GameConfig;
use crate::events::{EventBus, EventStream};
use crate::generation::Relay;
use crate::participant::{Capabilities, Faction, Participant, Role, Scene};
use crate::prompts::Prompts;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Errors from constructing a game.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GameError {
    #[error("game must have a narrator")]
    MissingNarrator,

    #[error("game must have exactly one narrator, found {0}")]
    MultipleNarrators(usize),

    #[error("duplicate participant name: {0}")]
    DuplicateName(String),
}

/// How a finished game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameOutcome {
    pub winner: Faction,
    /// Night phases that were started.
    pub rounds: u32,
}

pub struct Game {
    participants: Vec<Participant>,
    narrator: usize,
    /// Living players in roster order. Never contains the narrator.
    alive: Vec<String>,
    bus: EventBus,
    config: GameConfig,
    intro: Arc<str>,
    /// Completed night and day cycles.
    round: u32,
    winner: Option<Faction>,
}

impl Game {
    /// Validate the roster and create the game with its event stream.
    pub fn new(
        participants: Vec<Participant>,
        config: GameConfig,
    ) -> Result<(Self, EventStream), GameError> {
        let narrators: Vec<usize> = participants
            .iter()
            .enumerate()
            .filter(|(_, p)| p.role() == Role::Narrator)
            .map(|(i, _)| i)
            .collect();
        let narrator = match narrators.as_slice() {
            [] => return Err(GameError::MissingNarrator),
            [index] => *index,
            many => return Err(GameError::MultipleNarrators(many.len())),
        };

        let mut seen = HashSet::new();
        for p in &participants {
            if !seen.insert(p.name()) {
                return Err(GameError::DuplicateName(p.name().to_string()));
            }
        }

        let alive: Vec<String> = participants
            .iter()
            .filter(|p| p.role().is_player() && p.is_alive())
            .map(|p| p.name().to_string())
            .collect();

        let intro = Prompts::new(config.language).game_intro(&alive);
        let (bus, events) = EventBus::channel();

        let game = Self {
            participants,
            narrator,
            alive,
            bus,
            config,
            intro: intro.into(),
            round: 0,
            winner: None,
        };
        Ok((game, events))
    }

    /// Spawn the game loop on the tokio runtime.
    pub fn start(mut self) -> JoinHandle<GameOutcome> {
        tokio::spawn(async move { self.run().await })
    }

    /// Run the game to completion.
    pub async fn run(&mut self) -> GameOutcome {
        info!(players = self.alive.len(), "game started");
        self.bus.system("Game Started");

        loop {
            if let Some(winner) = self.winner {
                return GameOutcome {
                    winner,
                    rounds: self.round,
                };
            }

            self.run_night().await;
            if let Some(winner) = self.evaluate_win() {
                return GameOutcome {
                    winner,
                    rounds: self.round + 1,
                };
            }

            self.run_day().await;
            self.round += 1;
            self.evaluate_win();
        }
    }

    /// Remove a player from the alive-set.
    ///
    /// Returns `false` and changes nothing if the name is not alive.
    pub fn eliminate(&mut self, name: &str) -> bool {
        let Some(pos) = self.alive.iter().position(|n| n == name) else {
            debug!(name, "elimination ignored, not alive");
            return false;
        };
        self.alive.remove(pos);

        if let Some(p) = self.participant_mut(name) {
            p.mark_dead();
        }
        info!(name, remaining = self.alive.len(), "player eliminated");
        true
    }

    /// Check whether a faction has won, ending the game if so.
    ///
    /// The `game_over` event is emitted only the first time a win is found;
    /// later calls return the same winner without side effects.
    pub fn evaluate_win(&mut self) -> Option<Faction> {
        if self.winner.is_some() {
            return self.winner;
        }

        let wolves = self.alive_with(|role| role == Role::Werewolf);
        let others = self.alive.len() - wolves;

        let winner = if wolves == 0 {
            Faction::Village
        } else if wolves >= others {
            Faction::Werewolves
        } else {
            debug!(wolves, others, "game continues");
            return None;
        };

        info!(%winner, wolves, others, "game over");
        self.winner = Some(winner);
        self.bus.game_over(winner.victory_message());
        Some(winner)
    }

    /// Living players in roster order.
    pub fn alive(&self) -> &[String] {
        &self.alive
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn participant(&self, name: &str) -> Option<&Participant> {
        self.participants.iter().find(|p| p.name() == name)
    }

    pub fn narrator(&self) -> &Participant {
        &self.participants[self.narrator]
    }

    /// True role of every player, in roster order. Privileged information.
    pub fn role_mapping(&self) -> Vec<(String, Role)> {
        self.participants
            .iter()
            .filter(|p| p.role().is_player())
            .map(|p| (p.name().to_string(), p.role()))
            .collect()
    }

    pub fn role_of(&self, name: &str) -> Option<Role> {
        self.participant(name).map(Participant::role)
    }

    pub fn is_over(&self) -> bool {
        self.winner.is_some()
    }

    pub fn winner(&self) -> Option<Faction> {
        self.winner
    }

    /// Completed night and day cycles.
    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn intro(&self) -> &str {
        &self.intro
    }

    fn participant_mut(&mut self, name: &str) -> Option<&mut Participant> {
        self.participants.iter_mut().find(|p| p.name() == name)
    }

    /// Roster indices of living players whose role grants `ability`, in
    /// roster order.
    fn living(&self, ability: impl Fn(Capabilities) -> bool) -> Vec<usize> {
        self.participants
            .iter()
            .enumerate()
            .filter(|(_, p)| p.is_alive() && ability(p.role().capabilities()))
            .map(|(i, _)| i)
            .collect()
    }

    fn alive_with(&self, pred: impl Fn(Role) -> bool) -> usize {
        self.alive
            .iter()
            .filter_map(|name| self.role_of(name))
            .filter(|role| pred(*role))
            .count()
    }

    fn is_alive(&self, name: &str) -> bool {
        self.alive.iter().any(|n| n == name)
    }

    /// Narrate `message` through the narrator, always live.
    async fn announce(&mut self, message: &str) {
        let bus = self.bus.clone();
        let narrator = self.narrator;
        self.participants[narrator]
            .announce(message, Relay::Live(&bus))
            .await;
    }

    /// Relay mode for night actions and votes.
    fn decision_bus(&self) -> Option<EventBus> {
        self.config.stream_decisions.then(|| self.bus.clone())
    }

    fn scene_intro(&self) -> Arc<str> {
        Arc::clone(&self.intro)
    }

    async fn pace(&self, delay: Duration) {
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

/// Build a relay over an optional bus.
fn relay(bus: &Option<EventBus>) -> Relay<'_> {
    match bus {
        Some(bus) => Relay::Live(bus),
        None => Relay::Silent,
    }
}

fn scene(round: u32, intro: &str) -> Scene<'_> {
    Scene {
        round: round + 1,
        intro,
    }
}
