//! Worker tasks that back the runtime orchestration.
//!
//! The controller worker owns the match state and the tick scheduler, while
//! the persistence worker writes results and cleans up logo files off the
//! hot path.

mod controller;
mod persistence;
mod scheduler;

pub use controller::{Command as ControllerCommand, ControllerWorker};
pub use persistence::{Command as PersistenceCommand, PersistenceWorker};
pub use scheduler::TickScheduler;
