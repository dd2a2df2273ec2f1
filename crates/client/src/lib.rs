//! Scoreboard host process.
//!
//! ```text
//! display (stdin/stdout, JSON lines)
//!   └─→ Bridge ─→ RuntimeHandle ─→ ControllerWorker
//!                      ↑
//!          state / audio topics
//! ```
//!
//! - [`bridge`] translates JSON lines to runtime commands and back
//! - [`config`] loads runtime and logging settings from the environment
//! - [`logging`] installs the tracing subscriber
pub mod bridge;
pub mod config;
pub mod logging;

pub use bridge::Bridge;
pub use config::ClientConfig;
