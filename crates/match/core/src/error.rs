//! Rejection types for match commands.
//!
//! Commands never fail loudly: a command that cannot apply leaves the state
//! untouched and reports a [`Rejection`]. The runtime logs rejections and
//! carries on, so callers only ever observe them as "nothing changed".

use crate::state::SponsorId;

/// Classification of a rejected command, used to pick a log level.
///
/// - **InvalidTarget**: the command named something that does not exist
/// - **OutOfRange**: a value was outside what the rules accept
/// - **OutOfPhase**: the command is not meaningful in the current phase
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RejectionKind {
    InvalidTarget,
    OutOfRange,
    OutOfPhase,
}

impl RejectionKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidTarget => "invalid-target",
            Self::OutOfRange => "out-of-range",
            Self::OutOfPhase => "out-of-phase",
        }
    }

    /// Out-of-phase commands are routine (double taps, late clicks).
    pub const fn is_routine(&self) -> bool {
        matches!(self, Self::OutOfPhase)
    }
}

/// Reason a command left the match state unchanged.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error, strum::IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum Rejection {
    #[error("unknown sponsor {0}")]
    UnknownSponsor(SponsorId),

    #[error("set history index {index} out of range (history has {len} records)")]
    HistoryIndexOutOfRange { index: usize, len: usize },

    #[error("duration must be at least one second")]
    ZeroDuration,

    #[error("invalid team color {0:?}, expected #RGB or #RRGGBB")]
    InvalidColor(String),

    #[error("the match is already complete")]
    MatchComplete,

    #[error("set {set} has already ended")]
    SetAlreadyEnded { set: u32 },

    #[error("set {set} has not ended yet")]
    SetNotEnded { set: u32 },

    #[error("a penalty phase is pending for the current set")]
    PenaltyPhasePending,

    #[error("no penalty phase is active")]
    NoPenaltyPhase,

    #[error("the waiting period is in progress")]
    WaitingPeriodActive,

    #[error("the countdown has no time remaining")]
    NoTimeRemaining,
}

impl Rejection {
    pub const fn kind(&self) -> RejectionKind {
        match self {
            Self::UnknownSponsor(_) => RejectionKind::InvalidTarget,
            Self::HistoryIndexOutOfRange { .. } | Self::ZeroDuration | Self::InvalidColor(_) => {
                RejectionKind::OutOfRange
            }
            Self::MatchComplete
            | Self::SetAlreadyEnded { .. }
            | Self::SetNotEnded { .. }
            | Self::PenaltyPhasePending
            | Self::NoPenaltyPhase
            | Self::WaitingPeriodActive
            | Self::NoTimeRemaining => RejectionKind::OutOfPhase,
        }
    }

    /// Stable identifier for logs and metrics.
    pub fn code(&self) -> &'static str {
        self.into()
    }
}
