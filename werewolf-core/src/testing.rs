//! Testing utilities.
//!
//! This module provides deterministic stand-ins for the LLM:
//! - `ScriptedGenerator` answers decisions from per-participant queues
//! - `FailingGenerator` fails every call
//!
//! Both let whole games run without network access.

use crate::generation::{FragmentStream, GenerationError, GenerationRequest, Purpose, TextGenerator};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Mutex, MutexGuard};

/// Reply used for decisions when a participant's queue is empty.
pub const DEFAULT_DECISION: &str = "PASS";

/// A generator that returns scripted text.
///
/// Decisions are popped from a queue keyed by participant name. Every
/// other purpose returns the default reply. Responses are split on spaces
/// so they arrive as several fragments, like a real stream.
pub struct ScriptedGenerator {
    default_reply: String,
    state: Mutex<ScriptState>,
}

#[derive(Default)]
struct ScriptState {
    decisions: HashMap<String, VecDeque<String>>,
    failing: HashSet<String>,
    requests: Vec<GenerationRequest>,
}

impl Default for ScriptedGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedGenerator {
    pub fn new() -> Self {
        Self {
            default_reply: "I have nothing to add.".to_string(),
            state: Mutex::new(ScriptState::default()),
        }
    }

    /// Text returned for thoughts, speeches and announcements.
    pub fn with_default_reply(mut self, reply: impl Into<String>) -> Self {
        self.default_reply = reply.into();
        self
    }

    /// Queue the next decision `participant` will make.
    pub fn decide(&self, participant: &str, decision: impl Into<String>) {
        self.lock()
            .decisions
            .entry(participant.to_string())
            .or_default()
            .push_back(decision.into());
    }

    /// Queue several decisions at once, in order.
    pub fn decide_all<'a>(&self, script: impl IntoIterator<Item = (&'a str, &'a str)>) {
        for (participant, decision) in script {
            self.decide(participant, decision);
        }
    }

    /// Make every call from `participant` fail.
    pub fn fail_for(&self, participant: &str) {
        self.lock().failing.insert(participant.to_string());
    }

    /// Every request received so far.
    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.lock().requests.clone()
    }

    /// Requests made by one participant, oldest first.
    pub fn requests_for(&self, participant: &str) -> Vec<GenerationRequest> {
        self.lock()
            .requests
            .iter()
            .filter(|r| r.participant == participant)
            .cloned()
            .collect()
    }

    /// Decisions still queued for `participant`.
    pub fn pending(&self, participant: &str) -> usize {
        self.lock()
            .decisions
            .get(participant)
            .map_or(0, VecDeque::len)
    }

    fn lock(&self) -> MutexGuard<'_, ScriptState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, request: GenerationRequest) -> Result<FragmentStream, GenerationError> {
        let reply = {
            let mut state = self.lock();
            let participant = request.participant.clone();
            let purpose = request.purpose;
            state.requests.push(request);

            if state.failing.contains(&participant) {
                return Err(GenerationError::Unavailable(format!(
                    "scripted failure for {participant}"
                )));
            }

            match purpose {
                Purpose::Decide => state
                    .decisions
                    .get_mut(&participant)
                    .and_then(VecDeque::pop_front)
                    .unwrap_or_else(|| DEFAULT_DECISION.to_string()),
                _ => self.default_reply.clone(),
            }
        };

        Ok(fragments(&reply))
    }
}

/// A generator whose every call fails.
pub struct FailingGenerator {
    message: String,
}

impl FailingGenerator {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[async_trait]
impl TextGenerator for FailingGenerator {
    async fn generate(&self, _request: GenerationRequest) -> Result<FragmentStream, GenerationError> {
        Err(GenerationError::Unavailable(self.message.clone()))
    }
}

fn fragments(text: &str) -> FragmentStream {
    let parts: Vec<Result<String, GenerationError>> = text
        .split_inclusive(' ')
        .map(|part| Ok(part.to_string()))
        .collect();
    Box::pin(futures::stream::iter(parts))
}
