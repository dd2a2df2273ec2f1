//! Runtime orchestration for the match controller.
//!
//! This crate wires together the match engine, the tick scheduler,
//! repositories, and worker tasks into a cohesive runtime API. Consumers embed
//! [`Runtime`] to drive a match, subscribe to events, and issue commands
//! through [`RuntimeHandle`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator, builder, and configuration
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides the topic-based event bus
//! - [`repository`] writes result records and manages sponsor logo files
//! - `workers` keeps background tasks internal to the crate
pub mod api;
pub mod events;
pub mod repository;
pub mod runtime;

mod workers;

pub use api::{DecodeError, Result, RuntimeError, RuntimeHandle, decode_command, decode_value};
pub use events::{AudioCue, Event, EventBus, MatchNotice, MatchSnapshot, Topic};
pub use repository::{FileResultRepository, LogoStore, MatchResult, RepositoryError};
pub use runtime::{PersistenceConfig, Runtime, RuntimeBuilder, RuntimeConfig};
