//! Controller worker that owns the authoritative [`match_core::MatchState`].
//!
//! Receives commands from [`crate::RuntimeHandle`], applies them and clock
//! ticks through [`match_core::MatchEngine`] one at a time, and publishes the
//! resulting snapshot, notices, and audio cues to the EventBus.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use match_core::{MatchCommand, MatchEngine, MatchEvent, MatchState, Rejection};

use super::scheduler::TickScheduler;
use crate::api::{Result, RuntimeError};
use crate::events::{AudioCue, Event, EventBus, MatchNotice, MatchSnapshot};

/// Commands that can be sent to the controller worker
pub enum Command {
    /// Apply a match command and reply with the snapshot taken after it.
    Execute {
        command: MatchCommand,
        reply: oneshot::Sender<Result<MatchSnapshot>>,
    },
    /// Query the current match state (read-only).
    QueryState { reply: oneshot::Sender<MatchSnapshot> },
    /// Stop after the commands already queued.
    Shutdown,
}

/// Background task that serializes commands and clock ticks.
pub struct ControllerWorker {
    state: MatchSnapshot,
    command_rx: mpsc::Receiver<Command>,
    event_bus: EventBus,
    scheduler: TickScheduler,
}

impl ControllerWorker {
    pub fn new(
        state: MatchState,
        command_rx: mpsc::Receiver<Command>,
        event_bus: EventBus,
        mut scheduler: TickScheduler,
    ) -> Self {
        info!(
            "ControllerWorker initialized: set {}/{}, clock running: {}",
            state.sets.current,
            state.sets.total,
            state.clock.is_running()
        );

        scheduler.sync(state.clock.is_running());

        Self {
            state: Arc::new(state),
            command_rx,
            event_bus,
            scheduler,
        }
    }

    /// Main worker loop.
    pub async fn run(mut self) {
        loop {
            tokio::select! {
                cmd = self.command_rx.recv() => match cmd {
                    Some(Command::Shutdown) | None => break,
                    Some(cmd) => self.handle_command(cmd),
                },
                _ = self.scheduler.tick() => self.handle_tick(),
            }
        }
        info!("ControllerWorker stopped");
    }

    fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::Execute { command, reply } => {
                let result = self.apply(command);
                if reply.send(result).is_err() {
                    debug!("Execute reply channel closed (caller dropped)");
                }
            }
            Command::QueryState { reply } => {
                if reply.send(Arc::clone(&self.state)).is_err() {
                    debug!("QueryState reply channel closed (caller dropped)");
                }
            }
            Command::Shutdown => {}
        }
    }

    /// Applies one command and publishes the outcome.
    ///
    /// A snapshot is published even for a rejected command so every observer
    /// sees one update per handled command.
    fn apply(&mut self, command: MatchCommand) -> Result<MatchSnapshot> {
        let name = command.name();
        let outcome = MatchEngine::new(Arc::make_mut(&mut self.state)).execute(command);
        self.scheduler.sync(self.state.clock.is_running());

        match outcome {
            Ok(events) => {
                debug!(command = name, events = events.len(), "command applied");
                self.publish(events);
                Ok(Arc::clone(&self.state))
            }
            Err(rejection) => {
                log_rejection(name, &rejection);
                self.publish(Vec::new());
                Err(RuntimeError::Rejected(rejection))
            }
        }
    }

    fn handle_tick(&mut self) {
        let Some(events) = MatchEngine::new(Arc::make_mut(&mut self.state)).tick() else {
            // The clock was stopped between arming and firing.
            self.scheduler.sync(false);
            return;
        };
        self.scheduler.sync(self.state.clock.is_running());
        self.publish(events);
    }

    /// Publishes the current snapshot, then each notice or audio cue in order.
    fn publish(&self, events: Vec<MatchEvent>) {
        let snapshot = Arc::clone(&self.state);
        self.event_bus.publish(Event::State(Arc::clone(&snapshot)));

        for event in events {
            match event {
                MatchEvent::Buzzer => {
                    if snapshot.settings.sound_enabled {
                        self.event_bus.publish(Event::Audio(AudioCue::Buzzer));
                    }
                }
                event => {
                    info!(?event, "match event");
                    self.event_bus.publish(Event::Match(MatchNotice {
                        event,
                        snapshot: Arc::clone(&snapshot),
                    }));
                }
            }
        }
    }
}

fn log_rejection(command: &'static str, rejection: &Rejection) {
    let kind = rejection.kind();
    if kind.is_routine() {
        debug!(command, kind = kind.as_str(), code = rejection.code(), "command ignored: {rejection}");
    } else {
        warn!(command, kind = kind.as_str(), code = rejection.code(), "command ignored: {rejection}");
    }
}
