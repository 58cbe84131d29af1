//! The narrated event stream.
//!
//! The orchestrator's only observable output. [`EventBus`] is the sending
//! half held by the game; [`EventStream`] is the single reader. Events are
//! delivered in exactly the order they were emitted.

use serde::{Deserialize, Serialize};
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::mpsc;
use tokio_stream::Stream;
use tracing::trace;

/// Agent name used for engine-generated events.
pub const SYSTEM_AGENT: &str = "System";

/// The kind of a narrated event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    System,
    Phase,
    Thought,
    Speech,
    Action,
    GameOver,
}

/// A single narrated event.
///
/// `content` is a text fragment, not necessarily a complete message: a
/// participant's streamed response arrives as many consecutive events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub agent: String,
    pub content: String,
}

impl Event {
    pub fn new(kind: EventKind, agent: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            kind,
            agent: agent.into(),
            content: content.into(),
        }
    }

    /// Serialize as `{"type": ..., "agent": ..., "content": ...}`.
    pub fn to_json(&self) -> String {
        // Three string fields; serialization cannot fail.
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// Sending half of the event queue.
///
/// Unbounded, so emitting never suspends the game loop.
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: mpsc::UnboundedSender<Event>,
}

impl EventBus {
    /// Create a bus and its single reader.
    pub fn channel() -> (EventBus, EventStream) {
        let (tx, rx) = mpsc::unbounded_channel();
        (EventBus { tx }, EventStream { rx })
    }

    /// Append an event to the queue.
    pub fn emit(&self, kind: EventKind, agent: &str, content: impl Into<String>) {
        let event = Event::new(kind, agent, content);
        if self.tx.send(event).is_err() {
            trace!(?kind, agent, "event reader dropped, discarding event");
        }
    }

    pub fn system(&self, content: impl Into<String>) {
        self.emit(EventKind::System, SYSTEM_AGENT, content);
    }

    pub fn phase(&self, content: impl Into<String>) {
        self.emit(EventKind::Phase, SYSTEM_AGENT, content);
    }

    pub fn game_over(&self, content: impl Into<String>) {
        self.emit(EventKind::GameOver, SYSTEM_AGENT, content);
    }
}

/// The single-consumer reading half of the event queue.
///
/// Not `Clone`: one observer drains the stream at a time.
#[derive(Debug)]
pub struct EventStream {
    rx: mpsc::UnboundedReceiver<Event>,
}

impl EventStream {
    /// Wait for the next event. Returns `None` once the game has finished
    /// and every queued event has been read.
    pub async fn recv(&mut self) -> Option<Event> {
        self.rx.recv().await
    }

    /// Take the next event if one is already queued.
    pub fn try_recv(&mut self) -> Option<Event> {
        self.rx.try_recv().ok()
    }

    /// Take every event queued so far.
    pub fn drain(&mut self) -> Vec<Event> {
        let mut events = Vec::new();
        while let Some(event) = self.try_recv() {
            events.push(event);
        }
        events
    }
}

impl Stream for EventStream {
    type Item = Event;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Event>> {
        self.rx.poll_recv(cx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    #[test]
    fn test_event_json_shape() {
        let event = Event::new(EventKind::GameOver, "System", "Villagers Win!");
        let json: serde_json::Value = serde_json::from_str(&event.to_json()).unwrap();
        assert_eq!(json["type"], "game_over");
        assert_eq!(json["agent"], "System");
        assert_eq!(json["content"], "Villagers Win!");
    }

    #[test]
    fn test_events_preserve_order() {
        let (bus, mut stream) = EventBus::channel();
        bus.phase("Night Phase Started");
        bus.emit(EventKind::Thought, "Alice", "Hmm");
        bus.emit(EventKind::Action, "Alice", "Bob");
        bus.system("done");

        let kinds: Vec<_> = stream.drain().into_iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![
                EventKind::Phase,
                EventKind::Thought,
                EventKind::Action,
                EventKind::System
            ]
        );
    }

    #[test]
    fn test_emit_after_reader_dropped_is_ignored() {
        let (bus, stream) = EventBus::channel();
        drop(stream);
        bus.system("nobody is listening");
    }

    #[tokio::test]
    async fn test_stream_ends_when_bus_dropped() {
        let (bus, stream) = EventBus::channel();
        bus.emit(EventKind::Speech, "God", "The night falls.");
        drop(bus);

        let events: Vec<_> = stream.collect().await;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].agent, "God");
    }
}
