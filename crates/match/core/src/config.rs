/// Match configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct MatchConfig {
    /// Length of one set of play, in seconds.
    pub match_seconds: u32,
    /// Length of the break between two sets, in seconds.
    pub break_seconds: u32,
    /// Number of sets scheduled for the match. Clamped to `MIN_SETS..=MAX_SETS`.
    pub total_sets: u32,
}

impl MatchConfig {
    // ===== rule constants =====
    pub const MIN_SETS: u32 = 1;
    pub const MAX_SETS: u32 = 9;
    /// Penalty phase length granted per point of penalty difference.
    pub const PENALTY_SECONDS_PER_POINT: u32 = 10;
    pub const DEFAULT_SPONSOR_LABEL: &'static str = "Event Sponsors";

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_MATCH_SECONDS: u32 = 180;
    pub const DEFAULT_BREAK_SECONDS: u32 = 300;
    pub const DEFAULT_TOTAL_SETS: u32 = 3;

    pub fn new() -> Self {
        Self {
            match_seconds: Self::DEFAULT_MATCH_SECONDS,
            break_seconds: Self::DEFAULT_BREAK_SECONDS,
            total_sets: Self::DEFAULT_TOTAL_SETS,
        }
    }

    pub fn with_total_sets(mut self, total_sets: u32) -> Self {
        self.total_sets = Self::clamp_total_sets(i64::from(total_sets));
        self
    }

    pub fn with_match_seconds(mut self, seconds: u32) -> Self {
        self.match_seconds = seconds.max(1);
        self
    }

    pub fn with_break_seconds(mut self, seconds: u32) -> Self {
        self.break_seconds = seconds.max(1);
        self
    }

    /// Clamps a requested set count into `MIN_SETS..=MAX_SETS`.
    pub fn clamp_total_sets(requested: i64) -> u32 {
        requested.clamp(i64::from(Self::MIN_SETS), i64::from(Self::MAX_SETS)) as u32
    }

    /// Set wins needed to take the match: `ceil(total / 2)`.
    pub const fn sets_to_win(total_sets: u32) -> u32 {
        total_sets.div_ceil(2)
    }
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self::new()
    }
}
