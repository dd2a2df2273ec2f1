//! File-based export of match results.
//!
//! # File Structure
//!
//! ```text
//! {base_dir}/{home}_vs_{away}/
//!   ├── MatchResult_Round{N}_{stamp}.json   one per finalized set
//!   └── MatchResult_{stamp}.json            once the match is complete
//! ```
//!
//! Team names are reduced to `[A-Za-z0-9_]` for the directory name.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use match_core::{MatchState, Side, Team, Winner};

use super::error::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamResult {
    pub name: String,
    pub score: u32,
    pub penalties: u32,
    pub sets_won: u32,
}

impl From<&Team> for TeamResult {
    fn from(team: &Team) -> Self {
        Self {
            name: team.name.clone(),
            score: team.score,
            penalties: team.penalties,
            sets_won: team.sets_won,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundResult {
    pub round: u32,
    /// Winning team name, or `"Tie"`.
    pub winner: String,
    pub home_score: u32,
    pub away_score: u32,
}

/// Exported result record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub timestamp: String,
    pub is_final_snapshot: bool,
    pub match_complete: bool,
    /// Team name, `"Tie"`, or `None` while the match is still running.
    pub match_winner: Option<String>,
    pub rounds_played: usize,
    pub home_team: TeamResult,
    pub away_team: TeamResult,
    pub round_history: Vec<RoundResult>,
}

const TIE: &str = "Tie";

impl MatchResult {
    pub fn from_state(state: &MatchState, is_final_snapshot: bool, at: DateTime<Local>) -> Self {
        let team_name = |side: Side| state.teams.get(side).name.clone();

        let match_winner = state.status.is_match_complete.then(|| {
            state
                .teams
                .leader()
                .map_or_else(|| TIE.to_string(), team_name)
        });

        let round_history = state
            .sets
            .history
            .iter()
            .map(|record| RoundResult {
                round: record.set_number,
                winner: match record.winner {
                    Winner::Tie => TIE.to_string(),
                    Winner::Home => team_name(Side::Home),
                    Winner::Away => team_name(Side::Away),
                },
                home_score: record.home_score,
                away_score: record.away_score,
            })
            .collect();

        Self {
            timestamp: at.to_rfc3339(),
            is_final_snapshot,
            match_complete: state.status.is_match_complete,
            match_winner,
            rounds_played: state.sets.history.len(),
            home_team: TeamResult::from(&state.teams.home),
            away_team: TeamResult::from(&state.teams.away),
            round_history,
        }
    }
}

/// Writes [`MatchResult`] records as pretty-printed JSON files.
///
/// Directories are created on first write, so a missing or unwritable
/// results folder only surfaces when a result is saved.
pub struct FileResultRepository {
    base_dir: PathBuf,
}

impl FileResultRepository {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Directory holding every result of one pairing.
    pub fn match_dir(&self, home: &str, away: &str) -> PathBuf {
        self.base_dir
            .join(format!("{}_vs_{}", sanitize(home), sanitize(away)))
    }

    /// Saves the record written after set `round` was finalized.
    pub fn save_round(&self, round: u32, result: &MatchResult, at: DateTime<Local>) -> Result<PathBuf> {
        let filename = format!("MatchResult_Round{}_{}.json", round, stamp(at));
        self.write(&filename, result)
    }

    /// Saves the record written once the match is complete.
    pub fn save_final(&self, result: &MatchResult, at: DateTime<Local>) -> Result<PathBuf> {
        let filename = format!("MatchResult_{}.json", stamp(at));
        self.write(&filename, result)
    }

    fn write(&self, filename: &str, result: &MatchResult) -> Result<PathBuf> {
        let dir = self.match_dir(&result.home_team.name, &result.away_team.name);
        fs::create_dir_all(&dir)?;

        let path = dir.join(filename);
        let temp_path = path.with_extension("json.tmp");

        let json = serde_json::to_string_pretty(result)?;
        fs::write(&temp_path, json)?;
        fs::rename(&temp_path, &path)?;

        tracing::debug!("Saved match result to {}", path.display());
        Ok(path)
    }
}

fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

fn stamp(at: DateTime<Local>) -> String {
    at.format("%Y-%m-%d_%H-%M-%S").to_string()
}
