//! Event payloads for each topic.

use std::sync::Arc;

use match_core::{MatchEvent, MatchState};
use serde::{Deserialize, Serialize};

/// Immutable view of the match, shared by every subscriber.
///
/// The controller never mutates a snapshot it has published; it copies on
/// write instead.
pub type MatchSnapshot = Arc<MatchState>;

/// A lifecycle transition together with the state right after it.
#[derive(Debug, Clone)]
pub struct MatchNotice {
    pub event: MatchEvent,
    pub snapshot: MatchSnapshot,
}

/// Sounds the displays should play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AudioCue {
    Buzzer,
}
