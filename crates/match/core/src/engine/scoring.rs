//! Score, penalty, and team identity adjustments.
//!
//! Adjustments are accepted in every phase, including penalty phases and
//! breaks, so referees can correct mistakes at any time. Decrements stop at
//! zero.

use crate::error::Rejection;
use crate::state::Side;

use super::{EngineResult, MatchEngine};

impl MatchEngine<'_> {
    pub fn increment_score(&mut self, team: Side) -> EngineResult {
        let team = self.state.teams.get_mut(team);
        team.score = team.score.saturating_add(1);
        Ok(Vec::new())
    }

    pub fn decrement_score(&mut self, team: Side) -> EngineResult {
        let team = self.state.teams.get_mut(team);
        team.score = team.score.saturating_sub(1);
        Ok(Vec::new())
    }

    pub fn increment_penalty(&mut self, team: Side) -> EngineResult {
        let team = self.state.teams.get_mut(team);
        team.penalties = team.penalties.saturating_add(1);
        Ok(Vec::new())
    }

    pub fn decrement_penalty(&mut self, team: Side) -> EngineResult {
        let team = self.state.teams.get_mut(team);
        team.penalties = team.penalties.saturating_sub(1);
        Ok(Vec::new())
    }

    pub fn set_team_name(&mut self, team: Side, name: String) -> EngineResult {
        self.state.teams.get_mut(team).name = name;
        Ok(Vec::new())
    }

    pub fn set_team_color(&mut self, team: Side, color: String) -> EngineResult {
        if !is_hex_color(&color) {
            return Err(Rejection::InvalidColor(color));
        }
        self.state.teams.get_mut(team).color = color;
        Ok(Vec::new())
    }
}

/// `#RGB` or `#RRGGBB`.
fn is_hex_color(color: &str) -> bool {
    let Some(digits) = color.strip_prefix('#') else {
        return false;
    };
    matches!(digits.len(), 3 | 6) && digits.chars().all(|c| c.is_ascii_hexdigit())
}
