//! High-level runtime orchestrator.
//!
//! The runtime owns background workers, wires up command/event channels, and
//! exposes a builder-based API for clients to drive the match.

use std::env;
use std::path::PathBuf;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Duration;

use match_core::{MatchConfig, MatchState};

use crate::api::{Result, RuntimeError, RuntimeHandle};
use crate::events::{EventBus, Topic};
use crate::workers::{
    ControllerCommand, ControllerWorker, PersistenceCommand, PersistenceWorker, TickScheduler,
};

const APP_DIR: &str = "DroneSoccerScoreboard";

/// Where result records and sponsor logos are written.
#[derive(Debug, Clone)]
pub struct PersistenceConfig {
    /// Root of the per-pairing result directories.
    pub results_dir: PathBuf,
    /// Application data directory; logos live in its `sponsors/` folder.
    pub data_dir: PathBuf,
    /// Write result records for finalized sets and completed matches.
    pub enable_results: bool,
}

impl PersistenceConfig {
    pub fn new(results_dir: impl Into<PathBuf>, data_dir: impl Into<PathBuf>) -> Self {
        Self {
            results_dir: results_dir.into(),
            data_dir: data_dir.into(),
            enable_results: true,
        }
    }

    /// `Documents/DroneSoccerScoreboard/MatchResults`, falling back to the
    /// home directory and then the working directory.
    pub fn default_results_dir() -> PathBuf {
        let base = directories::UserDirs::new()
            .and_then(|dirs| {
                dirs.document_dir()
                    .map(|dir| dir.to_path_buf())
                    .or_else(|| Some(dirs.home_dir().to_path_buf()))
            })
            .unwrap_or_else(|| PathBuf::from("."));

        base.join(APP_DIR).join("MatchResults")
    }

    /// Platform data directory for the application.
    pub fn default_data_dir() -> PathBuf {
        directories::ProjectDirs::from("", "", APP_DIR)
            .map(|dirs| dirs.data_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("./scoreboard_data"))
    }
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self::new(Self::default_results_dir(), Self::default_data_dir())
    }
}

/// Runtime configuration shared across the orchestrator and workers.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub match_config: MatchConfig,
    pub event_buffer_size: usize,
    pub command_buffer_size: usize,
    /// Clock cadence; one match second per period.
    pub tick_period: Duration,
    /// File output. `None` runs without the persistence worker.
    pub persistence: Option<PersistenceConfig>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            match_config: MatchConfig::default(),
            event_buffer_size: 100,
            command_buffer_size: 32,
            tick_period: Duration::from_secs(1),
            persistence: Some(PersistenceConfig::default()),
        }
    }
}

impl RuntimeConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `MATCH_SECONDS` - Set length in seconds (default: 180)
    /// - `BREAK_SECONDS` - Break length in seconds (default: 300)
    /// - `TOTAL_SETS` - Sets per match, clamped to 1..=9 (default: 3)
    /// - `RESULTS_DIR` - Root folder for result records
    /// - `SCOREBOARD_DATA_DIR` - Application data folder (sponsor logos)
    /// - `ENABLE_RESULTS` - Write result records (default: true)
    /// - `EVENT_BUFFER` - Per-topic event capacity (default: 100)
    /// - `COMMAND_BUFFER` - Controller command queue size (default: 32)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(seconds) = read_env::<u32>("MATCH_SECONDS") {
            config.match_config = config.match_config.with_match_seconds(seconds);
        }
        if let Some(seconds) = read_env::<u32>("BREAK_SECONDS") {
            config.match_config = config.match_config.with_break_seconds(seconds);
        }
        if let Some(total) = read_env::<i64>("TOTAL_SETS") {
            config.match_config.total_sets = MatchConfig::clamp_total_sets(total);
        }

        if let Some(capacity) = read_env::<usize>("EVENT_BUFFER") {
            config.event_buffer_size = capacity.max(1);
        }
        if let Some(capacity) = read_env::<usize>("COMMAND_BUFFER") {
            config.command_buffer_size = capacity.max(1);
        }

        let mut persistence = PersistenceConfig::default();
        if let Ok(dir) = env::var("RESULTS_DIR") {
            persistence.results_dir = PathBuf::from(dir);
        }
        if let Ok(dir) = env::var("SCOREBOARD_DATA_DIR") {
            persistence.data_dir = PathBuf::from(dir);
        }
        if let Some(enable) = read_env::<bool>("ENABLE_RESULTS") {
            persistence.enable_results = enable;
        }
        config.persistence = Some(persistence);

        config
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.trim().parse().ok()
}

/// Main runtime that orchestrates the match controller
///
/// Runtime owns the workers; [`RuntimeHandle`] provides a cloneable façade
/// for clients.
pub struct Runtime {
    handle: RuntimeHandle,

    controller_handle: JoinHandle<()>,
    persistence: Option<(mpsc::Sender<PersistenceCommand>, JoinHandle<()>)>,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Build a runtime from `config` with a fresh match.
    pub async fn start(config: RuntimeConfig) -> Result<Self> {
        Self::builder().config(config).build().await
    }

    /// Get a cloneable handle to this runtime
    pub fn handle(&self) -> RuntimeHandle {
        self.handle.clone()
    }

    /// Shutdown the runtime gracefully
    ///
    /// The controller finishes the commands already queued; the persistence
    /// worker then drains the notices they produced.
    pub async fn shutdown(self) -> Result<()> {
        self.handle.shutdown().await?;
        self.controller_handle
            .await
            .map_err(RuntimeError::WorkerJoin)?;

        if let Some((command_tx, join_handle)) = self.persistence {
            if command_tx.send(PersistenceCommand::Shutdown).await.is_err() {
                tracing::debug!("PersistenceWorker already stopped");
            }
            join_handle.await.map_err(RuntimeError::WorkerJoin)?;
        }

        Ok(())
    }
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    state: Option<MatchState>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            state: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Provide initial match state instead of a fresh match
    pub fn initial_state(mut self, state: MatchState) -> Self {
        self.state = Some(state);
        self
    }

    /// Run without writing any files
    pub fn without_persistence(mut self) -> Self {
        self.config.persistence = None;
        self
    }

    /// Build the runtime
    pub async fn build(self) -> Result<Runtime> {
        let config = self.config;
        let initial_state = self
            .state
            .unwrap_or_else(|| MatchState::new(&config.match_config));

        let event_bus = EventBus::with_capacity(config.event_buffer_size);
        let (command_tx, command_rx) =
            mpsc::channel::<ControllerCommand>(config.command_buffer_size.max(1));

        // Subscribe before the controller starts so no notice is missed.
        let persistence = config.persistence.map(|persistence_config| {
            let (persistence_tx, persistence_rx) = mpsc::channel(1);
            let worker = PersistenceWorker::new(
                persistence_config,
                event_bus.subscribe(Topic::Match),
                persistence_rx,
            );
            let join_handle = tokio::spawn(async move {
                worker.run().await;
            });
            (persistence_tx, join_handle)
        });

        let controller = ControllerWorker::new(
            initial_state,
            command_rx,
            event_bus.clone(),
            TickScheduler::new(config.tick_period),
        );
        let controller_handle = tokio::spawn(async move {
            controller.run().await;
        });

        tracing::info!(
            "Runtime started: {} sets, {}s per set, persistence {}",
            config.match_config.total_sets,
            config.match_config.match_seconds,
            if persistence.is_some() { "on" } else { "off" }
        );

        Ok(Runtime {
            handle: RuntimeHandle::new(command_tx, event_bus),
            controller_handle,
            persistence,
        })
    }
}
