//! Authoritative match state representation.
//!
//! This module owns the data structures describing teams, sets, the shared
//! clock, and the sponsor roster. Runtime layers clone or query this state but
//! mutate it exclusively through [`crate::engine::MatchEngine`].
pub mod history;
pub mod roster;

pub use history::{SetHistory, SetRecord, Winner};
pub use roster::{Roster, Sponsor, SponsorId, SponsorPatch};

use crate::clock::Clock;
use crate::config::MatchConfig;
use crate::penalty::PenaltyPhase;

/// One of the two competing sides.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Side {
    Home,
    Away,
}

impl Side {
    pub const ALL: [Side; 2] = [Side::Home, Side::Away];

    pub const fn opponent(self) -> Side {
        match self {
            Side::Home => Side::Away,
            Side::Away => Side::Home,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Team {
    pub name: String,
    /// RGB hex color, e.g. `#FF4444`.
    pub color: String,
    pub score: u32,
    pub penalties: u32,
    pub sets_won: u32,
}

impl Team {
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: color.into(),
            score: 0,
            penalties: 0,
            sets_won: 0,
        }
    }

    /// Same name and color, all counters cleared.
    fn fresh(&self) -> Self {
        Self::new(self.name.clone(), self.color.clone())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Teams {
    pub home: Team,
    pub away: Team,
}

impl Teams {
    pub const fn get(&self, side: Side) -> &Team {
        match side {
            Side::Home => &self.home,
            Side::Away => &self.away,
        }
    }

    pub fn get_mut(&mut self, side: Side) -> &mut Team {
        match side {
            Side::Home => &mut self.home,
            Side::Away => &mut self.away,
        }
    }

    /// Side with strictly more set wins, if any.
    pub fn leader(&self) -> Option<Side> {
        match self.home.sets_won.cmp(&self.away.sets_won) {
            core::cmp::Ordering::Greater => Some(Side::Home),
            core::cmp::Ordering::Less => Some(Side::Away),
            core::cmp::Ordering::Equal => None,
        }
    }
}

impl Default for Teams {
    fn default() -> Self {
        Self {
            home: Team::new("Team 1", "#FF4444"),
            away: Team::new("Team 2", "#4488FF"),
        }
    }
}

/// Set bookkeeping: which set is in play and what has been decided so far.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct SetContext {
    /// 1-based number of the set in play.
    pub current: u32,
    /// Sets scheduled for the match, within `MatchConfig::MIN_SETS..=MAX_SETS`.
    pub total: u32,
    pub is_waiting_period: bool,
    pub history: SetHistory,
}

impl SetContext {
    pub fn new(total: u32) -> Self {
        Self {
            current: 1,
            total: MatchConfig::clamp_total_sets(i64::from(total)),
            is_waiting_period: false,
            history: SetHistory::default(),
        }
    }

    /// Whether the set in play already has a record in the history.
    pub fn current_is_finalized(&self) -> bool {
        self.history
            .last()
            .is_some_and(|record| record.set_number == self.current)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct MatchStatus {
    /// Play of the current set has stopped.
    pub is_ended: bool,
    /// No further sets will be played.
    pub is_match_complete: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Settings {
    pub sound_enabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sound_enabled: true,
        }
    }
}

/// Canonical snapshot of the match.
///
/// Serialized, `sets` also carries `waitingTotalSeconds` and
/// `waitingRemainingSeconds`, and `penaltyPhase` carries `totalSeconds` and
/// `remainingSeconds`, read from the shared clock. Those extra fields are
/// ignored when deserializing.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct MatchState {
    pub teams: Teams,
    /// The only clock in the match; drives set, break, and penalty time.
    pub clock: Clock,
    pub sets: SetContext,
    pub penalty_phase: PenaltyPhase,
    pub status: MatchStatus,
    pub settings: Settings,
    pub roster: Roster,
}

impl MatchState {
    pub fn new(config: &MatchConfig) -> Self {
        Self {
            teams: Teams::default(),
            clock: Clock::new(config.match_seconds.max(1), config.break_seconds.max(1)),
            sets: SetContext::new(config.total_sets),
            penalty_phase: PenaltyPhase::default(),
            status: MatchStatus::default(),
            settings: Settings::default(),
            roster: Roster::default(),
        }
    }

    /// Starts a new match that keeps team identities, durations, set count,
    /// settings, and sponsors, with every counter and record cleared.
    pub fn rematch(&self) -> Self {
        use crate::clock::ClockMode;

        Self {
            teams: Teams {
                home: self.teams.home.fresh(),
                away: self.teams.away.fresh(),
            },
            clock: Clock::new(
                self.clock.countdown(ClockMode::Match).total_seconds,
                self.clock.countdown(ClockMode::Break).total_seconds,
            ),
            sets: SetContext::new(self.sets.total),
            penalty_phase: PenaltyPhase::default(),
            status: MatchStatus::default(),
            settings: self.settings.clone(),
            roster: self.roster.clone(),
        }
    }

    /// Majority-or-all rule: a side holds `ceil(total / 2)` set wins, or
    /// every scheduled set has been played.
    pub fn is_match_decided(&self) -> bool {
        let needed = MatchConfig::sets_to_win(self.sets.total);
        self.teams.home.sets_won >= needed
            || self.teams.away.sets_won >= needed
            || self.sets.history.len() >= self.sets.total as usize
    }
}

#[cfg(feature = "serde")]
mod wire {
    use serde::ser::{Serialize, SerializeStruct, Serializer};

    use super::{MatchState, SetContext};
    use crate::clock::{ClockMode, Countdown};
    use crate::penalty::PenaltyPhase;

    #[derive(serde::Serialize)]
    #[serde(rename_all = "camelCase")]
    struct SetContextView<'a> {
        #[serde(flatten)]
        sets: &'a SetContext,
        waiting_total_seconds: u32,
        waiting_remaining_seconds: u32,
    }

    #[derive(serde::Serialize)]
    #[serde(rename_all = "camelCase")]
    struct PenaltyPhaseView<'a> {
        #[serde(flatten)]
        phase: &'a PenaltyPhase,
        total_seconds: u32,
        remaining_seconds: u32,
    }

    impl Serialize for MatchState {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            let waiting: &Countdown = self.clock.countdown(ClockMode::Break);
            let penalty: &Countdown = self.clock.countdown(ClockMode::Penalty);

            let mut state = serializer.serialize_struct("MatchState", 7)?;
            state.serialize_field("teams", &self.teams)?;
            state.serialize_field("clock", &self.clock)?;
            state.serialize_field(
                "sets",
                &SetContextView {
                    sets: &self.sets,
                    waiting_total_seconds: waiting.total_seconds,
                    waiting_remaining_seconds: waiting.remaining_seconds,
                },
            )?;
            state.serialize_field(
                "penaltyPhase",
                &PenaltyPhaseView {
                    phase: &self.penalty_phase,
                    total_seconds: penalty.total_seconds,
                    remaining_seconds: penalty.remaining_seconds,
                },
            )?;
            state.serialize_field("status", &self.status)?;
            state.serialize_field("settings", &self.settings)?;
            state.serialize_field("roster", &self.roster)?;
            state.end()
        }
    }
}

impl Default for MatchState {
    fn default() -> Self {
        Self::new(&MatchConfig::default())
    }
}
