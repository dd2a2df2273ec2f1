//! Repository layer for files written while a match runs.
//!
//! - Match results: one JSON record per finalized set and per completed match
//! - Sponsor logos: files imported into the data directory and referenced by
//!   the roster through relative `sponsors/<file>` refs

mod error;
mod logos;
mod results;

pub use error::RepositoryError;
pub use logos::LogoStore;
pub use results::{FileResultRepository, MatchResult, RoundResult, TeamResult};
