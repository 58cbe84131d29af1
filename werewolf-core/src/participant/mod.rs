//! Game participants.
//!
//! A [`Participant`] is one seat at the table: the narrator or a player.
//! Roles are a tag, not a type; the protocols decide what to ask whom by
//! looking at [`Role::capabilities`].

pub mod memory;
mod role;

pub use memory::{Memory, MemoryEntry, MemoryRole};
pub use role::{Capabilities, Faction, Role};

use crate::events::EventKind;
use crate::generation::{GenerationError, GenerationRequest, Purpose, Relay, TextGenerator};
use crate::prompts::{Frame, Prompts, Task};
use futures::StreamExt;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// What a participant is currently doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticipantStatus {
    Idle,
    Reasoning,
    Speaking,
    Dead,
}

/// Per-call situation passed down from the game.
#[derive(Debug, Clone, Copy)]
pub struct Scene<'a> {
    /// 1-based round currently being played.
    pub round: u32,
    pub intro: &'a str,
}

/// A seat at the table.
pub struct Participant {
    name: String,
    role: Role,
    model: String,
    persona: String,
    prompts: Prompts,
    generator: Arc<dyn TextGenerator>,
    alive: bool,
    status: ParticipantStatus,
    memory: Memory,
    /// Text produced while reasoning, fed into the following speech or decision.
    thought_process: String,
    last_message: String,
}

impl fmt::Debug for Participant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Participant")
            .field("name", &self.name)
            .field("role", &self.role)
            .field("model", &self.model)
            .field("alive", &self.alive)
            .field("status", &self.status)
            .field("memory_len", &self.memory.len())
            .finish()
    }
}

impl Participant {
    /// Create a participant with the persona for its role.
    pub fn new(
        name: impl Into<String>,
        role: Role,
        model: impl Into<String>,
        prompts: Prompts,
        generator: Arc<dyn TextGenerator>,
    ) -> Self {
        Self {
            name: name.into(),
            role,
            model: model.into(),
            persona: prompts.persona(role).to_string(),
            prompts,
            generator,
            alive: true,
            status: ParticipantStatus::Idle,
            memory: Memory::new(),
            thought_process: String::new(),
            last_message: String::new(),
        }
    }

    /// Replace the role persona with a custom system prompt.
    pub fn with_persona(mut self, persona: impl Into<String>) -> Self {
        self.persona = persona.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn persona(&self) -> &str {
        &self.persona
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn status(&self) -> ParticipantStatus {
        self.status
    }

    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    pub fn thought_process(&self) -> &str {
        &self.thought_process
    }

    pub fn last_message(&self) -> &str {
        &self.last_message
    }

    /// Inject a fact into this participant's memory.
    pub fn add_memory(&mut self, content: &str) {
        self.memory.notify(content);
    }

    /// Mark this participant dead. Only the game calls this.
    pub(crate) fn mark_dead(&mut self) {
        self.alive = false;
        self.status = ParticipantStatus::Dead;
    }

    /// Reason privately about `context`, relaying the thought live.
    pub async fn think(&mut self, scene: Scene<'_>, context: &str, relay: Relay<'_>) -> String {
        self.begin(ParticipantStatus::Reasoning);
        self.thought_process.clear();

        let prompt = self.prompts.think(self.frame(scene), context);
        let text = self
            .respond(prompt, Purpose::Think, relay, EventKind::Thought)
            .await;

        self.finish();
        text
    }

    /// Make a public statement conditioned on the most recent thought.
    pub async fn speak(&mut self, scene: Scene<'_>, context: &str, relay: Relay<'_>) -> String {
        self.begin(ParticipantStatus::Speaking);

        let prompt = self
            .prompts
            .speak(self.frame(scene), context, &self.thought_process);
        let text = self
            .respond(prompt, Purpose::Speak, relay, EventKind::Speech)
            .await;

        self.finish();
        text
    }

    /// Narrate an event. Used by the narrator.
    pub async fn announce(&mut self, message: &str, relay: Relay<'_>) -> String {
        self.begin(ParticipantStatus::Speaking);

        let prompt = self.prompts.announce(message);
        let text = self
            .respond(prompt, Purpose::Announce, relay, EventKind::Speech)
            .await;

        self.finish();
        text
    }

    /// Think about `task`, then produce a trimmed decision.
    ///
    /// Reasoning is relayed as thought events and the decision as action
    /// events. A generation failure yields `Error deciding: ...` as the
    /// decision.
    pub async fn act(
        &mut self,
        scene: Scene<'_>,
        context: &str,
        task: Task,
        relay: Relay<'_>,
    ) -> String {
        self.begin(ParticipantStatus::Reasoning);
        self.thought_process.clear();

        let think_prompt = self.prompts.act_think(self.frame(scene), context, task);
        self.respond(think_prompt, Purpose::Think, relay, EventKind::Thought)
            .await;

        self.begin(ParticipantStatus::Speaking);
        let thought = self.thought_process.clone();
        let decide_prompt = self
            .prompts
            .act_decide(self.frame(scene), context, &thought, task);
        let decision = match self
            .call_model(decide_prompt, Purpose::Decide, relay, EventKind::Action)
            .await
        {
            Ok(text) => text.trim().to_string(),
            Err(e) => {
                warn!(participant = %self.name, error = %e, "decision failed");
                let message = format!("Error deciding: {e}");
                relay.emit(EventKind::Action, &self.name, &message);
                self.last_message = message.clone();
                message
            }
        };

        debug!(participant = %self.name, ?task, %decision, "decision made");
        self.finish();
        decision
    }

    /// Name a player for the pack to kill.
    pub async fn choose_kill(
        &mut self,
        scene: Scene<'_>,
        alive: &[String],
        teammates: &[String],
        teammate_votes: &[String],
        relay: Relay<'_>,
    ) -> String {
        let mut context = format!("Alive players: {}", alive.join(", "));
        let others: Vec<&str> = teammates
            .iter()
            .map(String::as_str)
            .filter(|t| *t != self.name)
            .collect();
        if !others.is_empty() {
            context.push_str(&format!("\nYour Werewolf Teammates: {}", others.join(", ")));
        }
        if !teammate_votes.is_empty() {
            context.push_str(&format!(
                "\nOther pack members voted: {}",
                teammate_votes.join(", ")
            ));
        }
        self.act(scene, &context, Task::Kill, relay).await
    }

    /// Name a player whose role to learn.
    pub async fn investigate(&mut self, scene: Scene<'_>, alive: &[String], relay: Relay<'_>) -> String {
        let context = format!("Alive players: {}", alive.join(", "));
        self.act(scene, &context, Task::Investigate, relay).await
    }

    /// Decide `SAVE`, `POISON <name>` or `PASS` given the night's attack.
    pub async fn use_potion(
        &mut self,
        scene: Scene<'_>,
        attack_target: Option<&str>,
        relay: Relay<'_>,
    ) -> String {
        let night_info = match attack_target {
            Some(target) => format!("Target attacked: {target}."),
            None => "No attack tonight.".to_string(),
        };
        let context = format!("Night Info: {night_info}");
        self.act(scene, &context, Task::Potion, relay).await
    }

    /// Cast a day vote.
    pub async fn vote(&mut self, scene: Scene<'_>, context: &str, relay: Relay<'_>) -> String {
        self.act(scene, context, Task::Vote, relay).await
    }

    fn frame<'a>(&'a self, scene: Scene<'a>) -> Frame<'a> {
        Frame {
            round: scene.round,
            player_name: &self.name,
            intro: scene.intro,
        }
    }

    fn begin(&mut self, status: ParticipantStatus) {
        if self.alive {
            self.status = status;
        }
    }

    fn finish(&mut self) {
        if self.status != ParticipantStatus::Dead {
            self.status = ParticipantStatus::Idle;
        }
    }

    /// Generate a free-form response; failures become `Error speaking: ...`.
    async fn respond(
        &mut self,
        prompt: String,
        purpose: Purpose,
        relay: Relay<'_>,
        kind: EventKind,
    ) -> String {
        match self.call_model(prompt, purpose, relay, kind).await {
            Ok(text) => text,
            Err(e) => {
                warn!(participant = %self.name, ?purpose, error = %e, "generation failed");
                let message = format!("Error speaking: {e}");
                relay.emit(kind, &self.name, &message);
                self.last_message = message.clone();
                message
            }
        }
    }

    /// Run one generation to completion.
    ///
    /// Memory is only updated when the whole response arrives; a failure
    /// part-way leaves it untouched.
    async fn call_model(
        &mut self,
        prompt: String,
        purpose: Purpose,
        relay: Relay<'_>,
        kind: EventKind,
    ) -> Result<String, GenerationError> {
        self.last_message.clear();

        let request = GenerationRequest {
            participant: self.name.clone(),
            model: self.model.clone(),
            system: self.persona.clone(),
            history: self.memory.entries().to_vec(),
            prompt: prompt.clone(),
            purpose,
        };

        let mut fragments = self.generator.generate(request).await?;
        let mut full_response = String::new();

        while let Some(fragment) = fragments.next().await {
            let fragment = fragment?;
            if self.status == ParticipantStatus::Reasoning {
                self.thought_process.push_str(&fragment);
            }
            self.last_message.push_str(&fragment);
            full_response.push_str(&fragment);
            relay.emit(kind, &self.name, &fragment);
        }

        // Line-buffered viewers flush on newline.
        relay.emit(kind, &self.name, "\n");

        self.memory.record_exchange(prompt, full_response.clone());
        Ok(full_response)
    }
}
