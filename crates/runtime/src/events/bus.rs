//! Topic-based event bus implementation.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use super::types::{AudioCue, MatchNotice, MatchSnapshot};

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// Full state snapshots
    State,
    /// Lifecycle notices (set finalized, match complete, ...)
    Match,
    /// Audio cues
    Audio,
}

/// Event wrapper that carries the topic and typed event
#[derive(Debug, Clone)]
pub enum Event {
    State(MatchSnapshot),
    Match(MatchNotice),
    Audio(AudioCue),
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::State(_) => Topic::State,
            Event::Match(_) => Topic::Match,
            Event::Audio(_) => Topic::Audio,
        }
    }
}

struct Channels {
    state: broadcast::Sender<Event>,
    matches: broadcast::Sender<Event>,
    audio: broadcast::Sender<Event>,
}

/// Topic-based event bus
///
/// Allows consumers to subscribe to specific topics and only receive
/// events they care about. Publishing never blocks; slow subscribers lag.
#[derive(Clone)]
pub struct EventBus {
    channels: Arc<Channels>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            channels: Arc::new(Channels {
                state: broadcast::channel(capacity).0,
                matches: broadcast::channel(capacity).0,
                audio: broadcast::channel(capacity).0,
            }),
        }
    }

    fn sender(&self, topic: Topic) -> &broadcast::Sender<Event> {
        match topic {
            Topic::State => &self.channels.state,
            Topic::Match => &self.channels.matches,
            Topic::Audio => &self.channels.audio,
        }
    }

    /// Publish an event to its corresponding topic
    pub fn publish(&self, event: Event) {
        let topic = event.topic();
        if self.sender(topic).send(event).is_err() {
            // No subscribers for this topic - this is normal, not an error
            tracing::trace!("No subscribers for topic {:?}", topic);
        }
    }

    /// Subscribe to a specific topic
    ///
    /// Returns a receiver that will only receive events for that topic.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.sender(topic).subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
