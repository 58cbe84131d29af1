//! Role assignment and roster construction.

use crate::config::{GameConfig, Mode};
use crate::events::EventStream;
use crate::game::{Game, GameError};
use crate::generation::TextGenerator;
use crate::participant::{Participant, Role};
use crate::prompts::Prompts;
use rand::seq::SliceRandom;
use rand::Rng;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum SetupError {
    #[error("not enough player names: need {needed}, have {available}")]
    NotEnoughNames { needed: usize, available: usize },

    #[error("not enough arena models: need {needed}, have {available}")]
    NotEnoughModels { needed: usize, available: usize },

    #[error(transparent)]
    Game(#[from] GameError),
}

/// One dealt seat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerAssignment {
    pub name: String,
    pub role: Role,
    pub model: String,
}

/// Deal roles, names and models to players.
///
/// The role deck and the leading slice of the name pool are shuffled
/// independently. Arena mode hands each player a distinct model.
pub fn assign_roles<R: Rng + ?Sized>(
    config: &GameConfig,
    rng: &mut R,
) -> Result<Vec<PlayerAssignment>, SetupError> {
    let mut roles = config.roles.deck();
    let needed = roles.len();

    if config.player_names.len() < needed {
        return Err(SetupError::NotEnoughNames {
            needed,
            available: config.player_names.len(),
        });
    }

    roles.shuffle(rng);
    let mut names: Vec<String> = config.player_names[..needed].to_vec();
    names.shuffle(rng);

    let models: Vec<String> = match config.mode {
        Mode::Test => vec![config.models.test.clone(); needed],
        Mode::Arena => {
            if config.models.arena.len() < needed {
                return Err(SetupError::NotEnoughModels {
                    needed,
                    available: config.models.arena.len(),
                });
            }
            let mut pool = config.models.arena.clone();
            pool.shuffle(rng);
            pool.truncate(needed);
            pool
        }
    };

    Ok(names
        .into_iter()
        .zip(roles)
        .zip(models)
        .map(|((name, role), model)| PlayerAssignment { name, role, model })
        .collect())
}

/// Build the roster: the narrator first, then the players in dealt order.
pub fn build_roster(
    config: &GameConfig,
    assignments: &[PlayerAssignment],
    generator: Arc<dyn TextGenerator>,
) -> Vec<Participant> {
    let prompts = Prompts::new(config.language);

    let narrator = Participant::new(
        config.narrator_name.clone(),
        Role::Narrator,
        config.narrator_model.clone(),
        prompts,
        generator.clone(),
    );

    std::iter::once(narrator)
        .chain(assignments.iter().map(|a| {
            Participant::new(a.name.clone(), a.role, a.model.clone(), prompts, generator.clone())
        }))
        .collect()
}

/// Deal a fresh table and construct the game.
pub fn new_game<R: Rng + ?Sized>(
    config: GameConfig,
    generator: Arc<dyn TextGenerator>,
    rng: &mut R,
) -> Result<(Game, EventStream), SetupError> {
    let assignments = assign_roles(&config, rng)?;
    for a in &assignments {
        info!(player = %a.name, role = %a.role, model = %a.model, "dealt");
    }
    let roster = build_roster(&config, &assignments, generator);
    Ok(Game::new(roster, config)?)
}
