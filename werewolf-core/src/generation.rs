//! Text-generation seam.
//!
//! Participants never talk to an LLM client directly. They go through
//! [`TextGenerator`], which turns a persona, a memory and a prompt into a
//! lazy, finite stream of text fragments.

use crate::participant::{MemoryEntry, MemoryRole};
use async_trait::async_trait;
use futures::StreamExt;
use openrouter::{ChatRequest, Message, OpenRouter, StreamEvent};
use std::pin::Pin;
use thiserror::Error;
use tokio_stream::Stream;

/// Ordered fragments of a single response.
pub type FragmentStream = Pin<Box<dyn Stream<Item = Result<String, GenerationError>> + Send>>;

/// Errors raised by a text generator.
///
/// These never escape a participant: they are turned into an in-band
/// error string that stands in for the response.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("client error: {0}")]
    Client(#[from] openrouter::Error),

    #[error("stream error: {0}")]
    Stream(String),

    #[error("generator unavailable: {0}")]
    Unavailable(String),
}

/// Why a participant is calling the generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Purpose {
    /// Private reasoning, before speaking or deciding.
    Think,
    /// A public statement during discussion.
    Speak,
    /// The final answer to a task (a name or a potion decision).
    Decide,
    /// A narrator announcement.
    Announce,
}

/// Everything a generator needs to produce one response.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// Name of the participant asking.
    pub participant: String,
    pub model: String,
    /// The participant's persona.
    pub system: String,
    /// Prior exchanges, oldest first.
    pub history: Vec<MemoryEntry>,
    pub prompt: String,
    pub purpose: Purpose,
}

impl GenerationRequest {
    /// Flatten into chat messages: persona, history, then the new prompt.
    pub fn to_messages(&self) -> Vec<Message> {
        let mut messages = Vec::with_capacity(self.history.len() + 2);
        messages.push(Message::system(&self.system));
        messages.extend(self.history.iter().map(|entry| match entry.role {
            MemoryRole::User => Message::user(&entry.content),
            MemoryRole::Assistant => Message::assistant(&entry.content),
        }));
        messages.push(Message::user(&self.prompt));
        messages
    }
}

/// Produces text for participants.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Start generating a response.
    ///
    /// Failure may surface either here or as an `Err` item in the stream.
    async fn generate(&self, request: GenerationRequest) -> Result<FragmentStream, GenerationError>;
}

/// [`TextGenerator`] backed by the OpenRouter chat-completions API.
#[derive(Clone)]
pub struct OpenRouterGenerator {
    client: OpenRouter,
    streaming: bool,
    temperature: Option<f32>,
}

impl OpenRouterGenerator {
    pub fn new(client: OpenRouter) -> Self {
        Self {
            client,
            streaming: true,
            temperature: None,
        }
    }

    /// Create a generator from the OPENROUTER_API_KEY environment variable.
    pub fn from_env() -> Result<Self, GenerationError> {
        Ok(Self::new(OpenRouter::from_env()?))
    }

    /// When disabled, each response is fetched whole and yielded as a
    /// single fragment.
    pub fn with_streaming(mut self, streaming: bool) -> Self {
        self.streaming = streaming;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    fn build_request(&self, request: &GenerationRequest) -> ChatRequest {
        let mut chat = ChatRequest::new(request.to_messages()).with_model(&request.model);
        if let Some(temp) = self.temperature {
            chat = chat.with_temperature(temp);
        }
        chat
    }
}

#[async_trait]
impl TextGenerator for OpenRouterGenerator {
    async fn generate(&self, request: GenerationRequest) -> Result<FragmentStream, GenerationError> {
        let chat = self.build_request(&request);

        if !self.streaming {
            let response = self.client.complete(chat).await?;
            return Ok(Box::pin(futures::stream::once(async move {
                Ok(response.text)
            })));
        }

        let events = self.client.stream(chat).await?;
        let fragments = events
            .take_while(|event| futures::future::ready(!matches!(event, Ok(StreamEvent::Done))))
            .filter_map(|event| {
                futures::future::ready(match event {
                    Ok(StreamEvent::TextDelta { text }) => Some(Ok(text)),
                    Ok(StreamEvent::Error { message }) => Some(Err(GenerationError::Stream(message))),
                    Ok(_) => None,
                    Err(e) => Some(Err(GenerationError::Client(e))),
                })
            });

        Ok(Box::pin(fragments))
    }
}

/// How a participant's fragments reach observers while it generates.
///
/// Both modes consume the whole response and leave the participant in the
/// same state; they differ only in whether fragments hit the event bus.
#[derive(Debug, Clone, Copy)]
pub enum Relay<'a> {
    /// Forward each fragment to the bus as it arrives.
    Live(&'a crate::events::EventBus),
    /// Drain to completion without emitting anything.
    Silent,
}

impl Relay<'_> {
    pub(crate) fn emit(&self, kind: crate::events::EventKind, agent: &str, fragment: &str) {
        if let Relay::Live(bus) = self {
            bus.emit(kind, agent, fragment);
        }
    }
}
