//! Cloneable façade for issuing commands to the runtime.
//!
//! [`RuntimeHandle`] hides channel plumbing and offers async helpers for
//! driving the match or streaming events from specific topics.
use tokio::sync::{broadcast, mpsc, oneshot};

use match_core::MatchCommand;

use super::errors::{Result, RuntimeError};
use super::wire;
use crate::events::{Event, EventBus, MatchSnapshot, Topic};
use crate::workers::ControllerCommand;

/// Client-facing handle to interact with the runtime
#[derive(Clone)]
pub struct RuntimeHandle {
    command_tx: mpsc::Sender<ControllerCommand>,
    event_bus: EventBus,
}

impl RuntimeHandle {
    pub(crate) fn new(command_tx: mpsc::Sender<ControllerCommand>, event_bus: EventBus) -> Self {
        Self {
            command_tx,
            event_bus,
        }
    }

    /// Apply a command and return the snapshot taken right after it.
    ///
    /// A rejected command comes back as [`RuntimeError::Rejected`]; the
    /// snapshot published for it is identical to the previous one.
    pub async fn execute(&self, command: MatchCommand) -> Result<MatchSnapshot> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(ControllerCommand::Execute {
                command,
                reply: reply_tx,
            })
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)?
    }

    /// Decode a wire envelope and apply it.
    pub async fn dispatch(&self, text: &str) -> Result<MatchSnapshot> {
        let command = wire::decode_command(text)?;
        self.execute(command).await
    }

    /// Query the current match state (read-only snapshot)
    pub async fn query_state(&self) -> Result<MatchSnapshot> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(ControllerCommand::QueryState { reply: reply_tx })
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Subscribe to events from a specific topic
    ///
    /// # Topics
    ///
    /// - `Topic::State` - Snapshot after every command and clock tick
    /// - `Topic::Match` - Set, penalty, and match lifecycle notices
    /// - `Topic::Audio` - Buzzer cues (only while sound is enabled)
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use runtime::Topic;
    ///
    /// let mut states = handle.subscribe(Topic::State);
    /// while let Ok(Event::State(snapshot)) = states.recv().await {
    ///     render(&snapshot);
    /// }
    /// ```
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    /// Ask the controller to stop after the commands already queued.
    pub(crate) async fn shutdown(&self) -> Result<()> {
        self.command_tx
            .send(ControllerCommand::Shutdown)
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)
    }

    /// Get a reference to the event bus for advanced usage
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }
}
