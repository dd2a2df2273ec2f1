//! Clock commands.
//!
//! `start-timer` resumes whichever countdown belongs to the current phase:
//! the break during a waiting period, the penalty countdown while a penalty
//! phase is active, and set time otherwise.

use crate::clock::ClockMode;
use crate::error::Rejection;

use super::{EngineResult, MatchEngine};

impl MatchEngine<'_> {
    pub fn start_timer(&mut self) -> EngineResult {
        if self.state.clock.is_running() {
            return Ok(Vec::new());
        }
        if self.state.sets.is_waiting_period {
            return self.start_clock(ClockMode::Break);
        }
        if self.state.penalty_phase.is_active {
            return self.start_penalty_phase();
        }
        if self.state.status.is_match_complete {
            return Err(Rejection::MatchComplete);
        }
        if self.state.sets.current_is_finalized() {
            return Err(Rejection::SetAlreadyEnded {
                set: self.state.sets.current,
            });
        }

        self.start_clock(ClockMode::Match)?;
        self.state.status.is_ended = false;
        Ok(Vec::new())
    }

    pub fn pause_timer(&mut self) -> EngineResult {
        self.state.clock.pause();
        Ok(Vec::new())
    }

    /// Pauses and restores set time to its configured length.
    pub fn reset_timer(&mut self) -> EngineResult {
        self.state.clock.pause();
        self.state.clock.rewind(ClockMode::Match);
        self.state.status.is_ended = false;
        Ok(Vec::new())
    }

    pub fn set_time(&mut self, seconds: u32) -> EngineResult {
        if seconds == 0 {
            return Err(Rejection::ZeroDuration);
        }
        self.state.clock.pause();
        self.state.clock.set_duration(ClockMode::Match, seconds);
        self.state.status.is_ended = false;
        Ok(Vec::new())
    }

    pub fn set_waiting_time(&mut self, seconds: u32) -> EngineResult {
        if seconds == 0 {
            return Err(Rejection::ZeroDuration);
        }
        self.state.clock.set_duration(ClockMode::Break, seconds);
        Ok(Vec::new())
    }

    /// Starts `mode`, treating an already-running clock as success.
    pub(super) fn start_clock(&mut self, mode: ClockMode) -> EngineResult {
        if self.state.clock.start(mode) || self.state.clock.is_running_in(mode) {
            Ok(Vec::new())
        } else {
            Err(Rejection::NoTimeRemaining)
        }
    }
}
