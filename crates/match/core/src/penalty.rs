//! Penalty resolution at the end of a set.
//!
//! The side with fewer penalties earns a time-boxed scoring chance whose
//! length grows with the penalty gap.

use crate::config::MatchConfig;
use crate::state::Side;

/// Outcome of [`resolve`] when the penalty counts differ.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct PenaltyAward {
    pub striker: Side,
    pub defender: Side,
    pub penalty_difference: u32,
    pub seconds: u32,
}

/// Decides whether a penalty phase is needed for the given penalty counts.
///
/// Equal counts (including both zero) need no penalty phase.
pub fn resolve(home_penalties: u32, away_penalties: u32) -> Option<PenaltyAward> {
    let striker = match home_penalties.cmp(&away_penalties) {
        core::cmp::Ordering::Equal => return None,
        core::cmp::Ordering::Less => Side::Home,
        core::cmp::Ordering::Greater => Side::Away,
    };
    let penalty_difference = home_penalties.abs_diff(away_penalties);

    Some(PenaltyAward {
        striker,
        defender: striker.opponent(),
        penalty_difference,
        seconds: penalty_difference.saturating_mul(MatchConfig::PENALTY_SECONDS_PER_POINT),
    })
}

/// Penalty phase bookkeeping between a set's end and its finalization.
///
/// The countdown itself lives in the shared [`crate::Clock`] under
/// [`crate::ClockMode::Penalty`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct PenaltyPhase {
    pub is_active: bool,
    pub striker: Option<Side>,
    pub defender: Option<Side>,
    pub penalty_difference: u32,
}

impl PenaltyPhase {
    pub fn active(award: &PenaltyAward) -> Self {
        Self {
            is_active: true,
            striker: Some(award.striker),
            defender: Some(award.defender),
            penalty_difference: award.penalty_difference,
        }
    }
}
