//! Night protocol: pack kill, seer check, witch potion, resolution.

use super::{relay, scene, Game};
use crate::tally::Tally;
use tracing::{debug, info, warn};

/// A parsed witch decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WitchAction {
    Save,
    Poison(String),
    /// Anything else, including malformed or failed output.
    Pass,
}

/// Result of applying a witch decision to the night's attack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WitchOutcome {
    pub victim: Option<String>,
    /// Memory note for the witch when a potion took effect.
    pub note: Option<String>,
}

impl WitchAction {
    /// Parse `SAVE`, `POISON <name>` or anything else.
    ///
    /// The keyword is case-insensitive; surrounding punctuation on the
    /// keyword and the name is ignored.
    pub fn parse(decision: &str) -> Self {
        let mut words = decision
            .split_whitespace()
            .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()));

        match words.next().map(str::to_uppercase).as_deref() {
            Some("SAVE") => WitchAction::Save,
            Some("POISON") => match words.next() {
                Some(target) if !target.is_empty() => WitchAction::Poison(target.to_string()),
                _ => WitchAction::Pass,
            },
            _ => WitchAction::Pass,
        }
    }

    /// Apply this action to `attack`.
    ///
    /// A save needs an attack to cancel and a poison needs a living target.
    /// Otherwise the attack stands.
    pub fn resolve(&self, attack: Option<&str>, alive: &[String]) -> WitchOutcome {
        match (self, attack) {
            (WitchAction::Save, Some(victim)) => WitchOutcome {
                victim: None,
                note: Some(format!("You saved {victim}.")),
            },
            (WitchAction::Poison(target), _) if alive.iter().any(|n| n == target) => WitchOutcome {
                victim: Some(target.clone()),
                note: Some(format!("You poisoned {target}.")),
            },
            _ => WitchOutcome {
                victim: attack.map(str::to_string),
                note: None,
            },
        }
    }
}

impl Game {
    /// Play one night. Does not check for a winner.
    pub async fn run_night(&mut self) {
        info!(round = self.round + 1, alive = self.alive.len(), "night phase started");
        self.bus.phase("Night Phase Started");
        self.announce("The night has fallen. Everyone close your eyes.")
            .await;

        let attack = self.werewolf_consensus().await;
        self.seer_investigation().await;
        let victim = self.witch_resolution(attack).await;

        let died = match victim {
            Some(victim) if self.eliminate(&victim) => Some(victim),
            Some(victim) => {
                warn!(%victim, "night victim is not alive, nobody dies");
                None
            }
            None => None,
        };

        match died {
            Some(victim) => {
                self.announce(&format!("Last night, {victim} died.")).await;
            }
            None => {
                self.announce("Last night, no one died. It was a peaceful night.")
                    .await;
            }
        }

        self.bus.phase("Night Phase Ended");
    }

    /// Ask each living werewolf in turn for a target. Each sees the votes
    /// already cast tonight.
    async fn werewolf_consensus(&mut self) -> Option<String> {
        let wolves = self.living(|c| c.can_kill);
        if wolves.is_empty() {
            return None;
        }

        let pack: Vec<String> = wolves
            .iter()
            .map(|&i| self.participants[i].name().to_string())
            .collect();
        let intro = self.scene_intro();
        let scene = scene(self.round, &intro);
        let bus = self.decision_bus();

        let mut votes: Vec<String> = Vec::with_capacity(wolves.len());
        for &i in &wolves {
            let vote = self.participants[i]
                .choose_kill(scene, &self.alive, &pack, &votes, relay(&bus))
                .await;
            debug!(wolf = %self.participants[i].name(), %vote, "pack vote");
            votes.push(vote);
            self.pace(self.config.pacing.action_delay()).await;
        }

        let target = Tally::from_votes(&votes).winner().map(str::to_string)?;
        info!(%target, "pack chose target");

        let note = format!("The pack decided to target {target}.");
        for &i in &wolves {
            self.participants[i].add_memory(&note);
        }
        Some(target)
    }

    async fn seer_investigation(&mut self) {
        let Some(&seer) = self.living(|c| c.can_investigate).first() else {
            return;
        };

        let intro = self.scene_intro();
        let scene = scene(self.round, &intro);
        let bus = self.decision_bus();

        let target = self.participants[seer]
            .investigate(scene, &self.alive, relay(&bus))
            .await;
        let role = self.role_of(&target).map_or("Unknown", |role| role.name());
        debug!(%target, role, "seer checked");

        self.participants[seer].add_memory(&format!("You checked {target}: {role}."));
        self.pace(self.config.pacing.action_delay()).await;
    }

    async fn witch_resolution(&mut self, attack: Option<String>) -> Option<String> {
        let Some(&witch) = self.living(|c| c.can_use_potion).first() else {
            return attack;
        };

        let intro = self.scene_intro();
        let scene = scene(self.round, &intro);
        let bus = self.decision_bus();

        let decision = self.participants[witch]
            .use_potion(scene, attack.as_deref(), relay(&bus))
            .await;
        let action = WitchAction::parse(&decision);
        let outcome = action.resolve(attack.as_deref(), &self.alive);
        debug!(?action, victim = ?outcome.victim, "witch resolved");

        if let Some(note) = &outcome.note {
            self.participants[witch].add_memory(note);
        }
        self.pace(self.config.pacing.action_delay()).await;
        outcome.victim
    }
}
