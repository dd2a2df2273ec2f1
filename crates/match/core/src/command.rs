//! Commands accepted by the match engine.
//!
//! With the `serde` feature the enum uses the wire form
//! `{"command": "increment-score", "payload": {"team": "home"}}`.

use crate::state::{Side, SponsorId, Winner};

#[derive(Clone, Debug, PartialEq, Eq, strum::IntoStaticStr, strum::VariantNames)]
#[strum(serialize_all = "kebab-case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(
        tag = "command",
        content = "payload",
        rename_all = "kebab-case",
        rename_all_fields = "camelCase"
    )
)]
pub enum MatchCommand {
    // ===== scoring =====
    IncrementScore {
        team: Side,
    },
    DecrementScore {
        team: Side,
    },
    IncrementPenalty {
        team: Side,
    },
    DecrementPenalty {
        team: Side,
    },

    // ===== team settings =====
    SetTeamName {
        team: Side,
        name: String,
    },
    SetTeamColor {
        team: Side,
        color: String,
    },

    // ===== clock =====
    StartTimer,
    PauseTimer,
    ResetTimer,
    SetTime {
        seconds: u32,
    },
    ToggleSound,
    ResetMatch,

    // ===== set lifecycle =====
    EndSet,
    StartWaitingPeriod,
    StartNextSet,
    SetWaitingTime {
        seconds: u32,
    },
    SetTotalSets {
        total: i64,
    },
    EditSetHistory {
        set_index: usize,
        home_score: u32,
        away_score: u32,
        winner: Winner,
    },
    StartPenaltyPhase,
    EndPenaltyPhase,
    SkipPenaltyPhase,

    // ===== sponsors =====
    AddSponsor {
        name: String,
        logo_path: String,
    },
    RemoveSponsor {
        id: SponsorId,
    },
    UpdateSponsor {
        id: SponsorId,
        #[cfg_attr(feature = "serde", serde(default))]
        name: Option<String>,
        #[cfg_attr(feature = "serde", serde(default))]
        logo_path: Option<String>,
        #[cfg_attr(feature = "serde", serde(default))]
        white_background: Option<bool>,
    },
    ReorderSponsors {
        sponsor_ids: Vec<SponsorId>,
    },
    SetSponsorLabel {
        #[cfg_attr(feature = "serde", serde(default))]
        label: Option<String>,
    },
}

impl MatchCommand {
    /// Wire name of the command, e.g. `"end-set"`.
    pub fn name(&self) -> &'static str {
        self.into()
    }

    /// Whether `name` is a command this engine understands.
    pub fn is_known(name: &str) -> bool {
        use strum::VariantNames;
        Self::VARIANTS.contains(&name)
    }
}
