//! Deterministic match rules and data types shared by the runtime and clients.
//!
//! `match-core` defines the canonical rules (commands, clock, penalty
//! resolution, set lifecycle) and exposes pure APIs with no I/O and no wall
//! clock. All state mutation flows through [`engine::MatchEngine`], and
//! supporting crates depend on the types re-exported here.
pub mod clock;
pub mod command;
pub mod config;
pub mod engine;
pub mod error;
pub mod penalty;
pub mod state;

pub use clock::{Clock, ClockMode, ClockTick, Countdown};
pub use command::MatchCommand;
pub use config::MatchConfig;
pub use engine::{EngineResult, MatchEngine, MatchEvent};
pub use error::{Rejection, RejectionKind};
pub use penalty::{PenaltyAward, PenaltyPhase, resolve as resolve_penalties};
pub use state::{
    MatchState, MatchStatus, Roster, SetContext, SetHistory, SetRecord, Settings, Side, Sponsor,
    SponsorId, SponsorPatch, Team, Teams, Winner,
};
