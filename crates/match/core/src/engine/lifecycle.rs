//! Set lifecycle transitions: ending a set, the penalty phase, finalization,
//! breaks, advancing to the next set, and history corrections.

use crate::clock::ClockMode;
use crate::config::MatchConfig;
use crate::error::Rejection;
use crate::penalty::{self, PenaltyPhase};
use crate::state::{SetRecord, Winner};

use super::{EngineResult, MatchEngine, MatchEvent};

impl MatchEngine<'_> {
    /// Stops play of the current set.
    ///
    /// Unequal penalties open a penalty phase and defer finalization; equal
    /// penalties finalize the set right away.
    pub fn end_set(&mut self) -> EngineResult {
        self.ensure_set_in_play()?;
        self.state.clock.pause();

        let home = self.state.teams.home.penalties;
        let away = self.state.teams.away.penalties;

        match penalty::resolve(home, away) {
            Some(award) => {
                self.state.penalty_phase = PenaltyPhase::active(&award);
                self.state
                    .clock
                    .set_duration(ClockMode::Penalty, award.seconds);
                self.state.status.is_ended = false;

                Ok(vec![
                    MatchEvent::PenaltyPhaseEntered {
                        striker: award.striker,
                        defender: award.defender,
                        seconds: award.seconds,
                    },
                    MatchEvent::Buzzer,
                ])
            }
            None => Ok(self.finalize()),
        }
    }

    pub fn start_penalty_phase(&mut self) -> EngineResult {
        if !self.state.penalty_phase.is_active {
            return Err(Rejection::NoPenaltyPhase);
        }
        if self.state.clock.is_running_in(ClockMode::Penalty) {
            return Ok(Vec::new());
        }
        self.state.clock.pause();
        self.start_clock(ClockMode::Penalty)
    }

    /// Closes the penalty phase and finalizes the set.
    ///
    /// Runs automatically when the penalty countdown reaches zero.
    pub fn end_penalty_phase(&mut self) -> EngineResult {
        if !self.state.penalty_phase.is_active {
            return Err(Rejection::NoPenaltyPhase);
        }
        self.state.clock.pause();
        self.state.penalty_phase.is_active = false;
        Ok(self.finalize())
    }

    /// Referee override: drops the remaining penalty time and finalizes.
    pub fn skip_penalty_phase(&mut self) -> EngineResult {
        if !self.state.penalty_phase.is_active {
            return Err(Rejection::NoPenaltyPhase);
        }
        self.state.clock.pause();
        self.state.clock.reset(ClockMode::Penalty, 0);
        self.state.penalty_phase.is_active = false;
        Ok(self.finalize())
    }

    /// Records the outcome of the current set and re-evaluates the match.
    fn finalize(&mut self) -> Vec<MatchEvent> {
        let state = &mut *self.state;
        state.status.is_ended = true;
        state.penalty_phase.is_active = false;

        let home_score = state.teams.home.score;
        let away_score = state.teams.away.score;
        let winner = Winner::from_scores(home_score, away_score);
        if let Some(side) = winner.side() {
            let team = state.teams.get_mut(side);
            team.sets_won = team.sets_won.saturating_add(1);
        }

        let record = SetRecord {
            set_number: state.sets.current,
            home_score,
            away_score,
            winner,
        };
        state.sets.history.append(record);

        let mut events = vec![MatchEvent::SetFinalized { record }];
        if self.refresh_completion() {
            events.push(MatchEvent::MatchCompleted {
                winner: self.state.teams.leader(),
            });
        }
        events.push(MatchEvent::Buzzer);
        events
    }

    /// Starts the break between sets. Only valid once the current set has
    /// been finalized and more sets remain.
    pub fn start_waiting_period(&mut self) -> EngineResult {
        self.ensure_between_sets()?;
        if self.state.sets.is_waiting_period {
            return Err(Rejection::WaitingPeriodActive);
        }

        self.state.clock.pause();
        self.state.sets.is_waiting_period = true;
        self.state.status.is_ended = false;
        self.state.clock.rewind(ClockMode::Break);
        self.start_clock(ClockMode::Break)
    }

    /// Runs when the break countdown reaches zero.
    pub(super) fn end_waiting_period(&mut self) -> Vec<MatchEvent> {
        self.state.clock.pause();
        self.state.sets.is_waiting_period = false;
        vec![MatchEvent::Buzzer]
    }

    /// Moves on to the next set: counters reset, set wins kept.
    pub fn start_next_set(&mut self) -> EngineResult {
        self.ensure_between_sets()?;

        let state = &mut *self.state;
        state.clock.pause();
        state.sets.is_waiting_period = false;
        state.sets.current += 1;

        for team in [&mut state.teams.home, &mut state.teams.away] {
            team.score = 0;
            team.penalties = 0;
        }

        state.clock.rewind(ClockMode::Match);
        state.clock.set_duration(ClockMode::Penalty, 0);
        state.penalty_phase = PenaltyPhase::default();
        state.status.is_ended = false;
        Ok(Vec::new())
    }

    /// Clamps `total` into the supported range. History is kept as is.
    ///
    /// A lower total can decide the match on the spot.
    pub fn set_total_sets(&mut self, total: i64) -> EngineResult {
        self.state.sets.total = MatchConfig::clamp_total_sets(total);
        Ok(self.complete_if_decided())
    }

    /// Corrects a finalized set and keeps set wins and completion in sync.
    pub fn edit_set_history(
        &mut self,
        index: usize,
        home_score: u32,
        away_score: u32,
        winner: Winner,
    ) -> EngineResult {
        let len = self.state.sets.history.len();
        let previous = self
            .state
            .sets
            .history
            .edit(index, home_score, away_score, winner)
            .ok_or(Rejection::HistoryIndexOutOfRange { index, len })?;

        if let Some(side) = previous.winner.side() {
            let team = self.state.teams.get_mut(side);
            team.sets_won = team.sets_won.saturating_sub(1);
        }
        if let Some(side) = winner.side() {
            let team = self.state.teams.get_mut(side);
            team.sets_won = team.sets_won.saturating_add(1);
        }

        Ok(self.complete_if_decided())
    }

    /// Starts over with a fresh match, keeping identities and settings.
    pub fn reset_match(&mut self) -> EngineResult {
        self.state.clock.pause();
        *self.state = self.state.rematch();
        Ok(Vec::new())
    }

    /// Recomputes `is_match_complete`; returns true when it just flipped on.
    fn refresh_completion(&mut self) -> bool {
        let was_complete = self.state.status.is_match_complete;
        let complete = self.state.is_match_decided();
        self.state.status.is_match_complete = complete;
        complete && !was_complete
    }

    /// Closes the match when a correction outside `finalize` decided it.
    ///
    /// Play stops where it is: the clock pauses and an unfinished set, break,
    /// or penalty phase is abandoned without a record.
    fn complete_if_decided(&mut self) -> Vec<MatchEvent> {
        if !self.refresh_completion() {
            return Vec::new();
        }

        let state = &mut *self.state;
        state.clock.pause();
        state.sets.is_waiting_period = false;
        state.penalty_phase.is_active = false;
        state.status.is_ended = true;

        vec![
            MatchEvent::MatchCompleted {
                winner: state.teams.leader(),
            },
            MatchEvent::Buzzer,
        ]
    }

    /// The current set is still being played (no record, no penalty phase).
    fn ensure_set_in_play(&self) -> Result<(), Rejection> {
        let sets = &self.state.sets;
        if self.state.status.is_match_complete {
            Err(Rejection::MatchComplete)
        } else if sets.current_is_finalized() {
            Err(Rejection::SetAlreadyEnded { set: sets.current })
        } else if self.state.penalty_phase.is_active {
            Err(Rejection::PenaltyPhasePending)
        } else if sets.is_waiting_period {
            Err(Rejection::WaitingPeriodActive)
        } else {
            Ok(())
        }
    }

    /// The current set is finalized and the match goes on.
    fn ensure_between_sets(&self) -> Result<(), Rejection> {
        if self.state.status.is_match_complete {
            Err(Rejection::MatchComplete)
        } else if !self.state.sets.current_is_finalized() {
            Err(Rejection::SetNotEnded {
                set: self.state.sets.current,
            })
        } else {
            Ok(())
        }
    }
}
