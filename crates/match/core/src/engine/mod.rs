//! Match engine: the set lifecycle state machine.
//!
//! [`MatchEngine`] borrows a [`MatchState`] mutably and is the only code path
//! that changes it. Every operation runs to completion and either returns the
//! [`MatchEvent`]s it produced or a [`Rejection`] that left the state as it was.
//!
//! ```text
//! InProgress ──(clock zero | end-set)──► penalty phase? ──► SetFinalized
//!     ▲                                                        │
//!     └──────── start-next-set ◄── waiting period (optional) ◄─┘
//!                                                              └──► MatchComplete
//! ```

mod lifecycle;
mod scoring;
mod timer;

use crate::clock::ClockMode;
use crate::command::MatchCommand;
use crate::error::Rejection;
use crate::state::{MatchState, SetRecord, Side, Sponsor, SponsorPatch};

/// Notable transitions, published to collaborators (result export, audio,
/// logo cleanup) next to the state snapshot.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(tag = "kind", rename_all = "kebab-case", rename_all_fields = "camelCase")
)]
pub enum MatchEvent {
    /// The set ended with unequal penalties; finalization waits for the
    /// penalty phase.
    PenaltyPhaseEntered {
        striker: Side,
        defender: Side,
        seconds: u32,
    },
    /// A set outcome was recorded in the history.
    SetFinalized { record: SetRecord },
    /// No further sets will be played. `winner` is `None` on a tie.
    MatchCompleted { winner: Option<Side> },
    /// A countdown reached zero.
    TimerExpired { mode: ClockMode },
    /// A sponsor left the roster; its logo file is no longer referenced.
    SponsorRemoved { sponsor: Sponsor },
    /// Sound the buzzer on the displays.
    Buzzer,
}

pub type EngineResult = Result<Vec<MatchEvent>, Rejection>;

/// Applies commands and clock ticks to a borrowed [`MatchState`].
pub struct MatchEngine<'a> {
    state: &'a mut MatchState,
}

impl<'a> MatchEngine<'a> {
    pub fn new(state: &'a mut MatchState) -> Self {
        Self { state }
    }

    /// Applies one command.
    pub fn execute(&mut self, command: MatchCommand) -> EngineResult {
        match command {
            MatchCommand::IncrementScore { team } => self.increment_score(team),
            MatchCommand::DecrementScore { team } => self.decrement_score(team),
            MatchCommand::IncrementPenalty { team } => self.increment_penalty(team),
            MatchCommand::DecrementPenalty { team } => self.decrement_penalty(team),
            MatchCommand::SetTeamName { team, name } => self.set_team_name(team, name),
            MatchCommand::SetTeamColor { team, color } => self.set_team_color(team, color),

            MatchCommand::StartTimer => self.start_timer(),
            MatchCommand::PauseTimer => self.pause_timer(),
            MatchCommand::ResetTimer => self.reset_timer(),
            MatchCommand::SetTime { seconds } => self.set_time(seconds),
            MatchCommand::SetWaitingTime { seconds } => self.set_waiting_time(seconds),
            MatchCommand::ToggleSound => {
                self.state.settings.sound_enabled = !self.state.settings.sound_enabled;
                Ok(Vec::new())
            }

            MatchCommand::ResetMatch => self.reset_match(),
            MatchCommand::EndSet => self.end_set(),
            MatchCommand::StartWaitingPeriod => self.start_waiting_period(),
            MatchCommand::StartNextSet => self.start_next_set(),
            MatchCommand::SetTotalSets { total } => self.set_total_sets(total),
            MatchCommand::EditSetHistory {
                set_index,
                home_score,
                away_score,
                winner,
            } => self.edit_set_history(set_index, home_score, away_score, winner),
            MatchCommand::StartPenaltyPhase => self.start_penalty_phase(),
            MatchCommand::EndPenaltyPhase => self.end_penalty_phase(),
            MatchCommand::SkipPenaltyPhase => self.skip_penalty_phase(),

            MatchCommand::AddSponsor { name, logo_path } => {
                self.state.roster.add(name, logo_path);
                Ok(Vec::new())
            }
            MatchCommand::RemoveSponsor { id } => match self.state.roster.remove(id) {
                Some(sponsor) => Ok(vec![MatchEvent::SponsorRemoved { sponsor }]),
                None => Err(Rejection::UnknownSponsor(id)),
            },
            MatchCommand::UpdateSponsor {
                id,
                name,
                logo_path,
                white_background,
            } => {
                let patch = SponsorPatch {
                    name,
                    logo_path,
                    white_background,
                };
                if self.state.roster.update(id, patch) {
                    Ok(Vec::new())
                } else {
                    Err(Rejection::UnknownSponsor(id))
                }
            }
            MatchCommand::ReorderSponsors { sponsor_ids } => {
                self.state.roster.reorder(&sponsor_ids);
                Ok(Vec::new())
            }
            MatchCommand::SetSponsorLabel { label } => {
                self.state.roster.set_label(label.as_deref());
                Ok(Vec::new())
            }
        }
    }

    /// Advances the shared clock by one second.
    ///
    /// Returns `None` when the clock is paused. When the running countdown
    /// reaches zero the matching transition runs in the same step: the set
    /// ends, the penalty phase closes, or the break finishes.
    pub fn tick(&mut self) -> Option<Vec<MatchEvent>> {
        let tick = self.state.clock.tick()?;
        if !tick.zero_reached {
            return Some(Vec::new());
        }

        let mut events = vec![MatchEvent::TimerExpired { mode: tick.mode }];
        let follow_up = match tick.mode {
            ClockMode::Match => self.end_set(),
            ClockMode::Penalty => self.end_penalty_phase(),
            ClockMode::Break => Ok(self.end_waiting_period()),
        };
        // A rejection here means the phase was already closed by a command.
        if let Ok(more) = follow_up {
            events.extend(more);
        }
        Some(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MatchConfig;
    use crate::state::{SponsorId, Winner};

    fn state_with(total_sets: u32, match_seconds: u32) -> MatchState {
        MatchState::new(
            &MatchConfig::new()
                .with_total_sets(total_sets)
                .with_match_seconds(match_seconds)
                .with_break_seconds(5),
        )
    }

    fn run(state: &mut MatchState, command: MatchCommand) -> EngineResult {
        MatchEngine::new(state).execute(command)
    }

    fn score(state: &mut MatchState, home: u32, away: u32) {
        for _ in 0..home {
            run(state, MatchCommand::IncrementScore { team: Side::Home }).unwrap();
        }
        for _ in 0..away {
            run(state, MatchCommand::IncrementScore { team: Side::Away }).unwrap();
        }
    }

    fn penalize(state: &mut MatchState, side: Side, times: u32) {
        for _ in 0..times {
            run(state, MatchCommand::IncrementPenalty { team: side }).unwrap();
        }
    }

    fn tick_until_stopped(state: &mut MatchState) -> Vec<MatchEvent> {
        let mut events = Vec::new();
        while let Some(more) = MatchEngine::new(state).tick() {
            events.extend(more);
        }
        events
    }

    /// Set wins must always equal a recount of the history.
    fn assert_consistent(state: &MatchState) {
        let history = &state.sets.history;
        assert_eq!(state.teams.home.sets_won, history.count(Winner::Home));
        assert_eq!(state.teams.away.sets_won, history.count(Winner::Away));
        assert_eq!(
            (state.teams.home.sets_won + state.teams.away.sets_won + history.count(Winner::Tie))
                as usize,
            history.len()
        );
        assert_eq!(state.status.is_match_complete, state.is_match_decided());
    }

    #[test]
    fn decrements_clamp_at_zero() {
        let mut state = MatchState::default();
        for _ in 0..3 {
            run(&mut state, MatchCommand::DecrementScore { team: Side::Home }).unwrap();
            run(&mut state, MatchCommand::DecrementPenalty { team: Side::Away }).unwrap();
        }
        assert_eq!(state.teams.home.score, 0);
        assert_eq!(state.teams.away.penalties, 0);
    }

    #[test]
    fn increments_then_decrements_round_trip() {
        let mut state = MatchState::default();
        score(&mut state, 2, 0);
        penalize(&mut state, Side::Away, 1);

        for side in Side::ALL {
            let (score_before, penalties_before) = {
                let team = state.teams.get(side);
                (team.score, team.penalties)
            };
            for _ in 0..7 {
                run(&mut state, MatchCommand::IncrementScore { team: side }).unwrap();
                run(&mut state, MatchCommand::IncrementPenalty { team: side }).unwrap();
            }
            for _ in 0..7 {
                run(&mut state, MatchCommand::DecrementScore { team: side }).unwrap();
                run(&mut state, MatchCommand::DecrementPenalty { team: side }).unwrap();
            }
            let team = state.teams.get(side);
            assert_eq!((team.score, team.penalties), (score_before, penalties_before));
        }
    }

    #[test]
    fn adjustments_allowed_during_penalty_phase_and_break() {
        let mut state = state_with(3, 60);
        penalize(&mut state, Side::Home, 1);
        run(&mut state, MatchCommand::EndSet).unwrap();
        assert!(state.penalty_phase.is_active);
        run(&mut state, MatchCommand::IncrementScore { team: Side::Away }).unwrap();
        assert_eq!(state.teams.away.score, 1);

        run(&mut state, MatchCommand::SkipPenaltyPhase).unwrap();
        run(&mut state, MatchCommand::StartWaitingPeriod).unwrap();
        run(&mut state, MatchCommand::IncrementPenalty { team: Side::Home }).unwrap();
        assert_eq!(state.teams.home.penalties, 2);
    }

    #[test]
    fn end_set_without_penalty_gap_finalizes() {
        let mut state = state_with(3, 60);
        score(&mut state, 2, 1);
        penalize(&mut state, Side::Home, 1);
        penalize(&mut state, Side::Away, 1);

        let events = run(&mut state, MatchCommand::EndSet).unwrap();

        assert!(state.status.is_ended);
        assert!(!state.penalty_phase.is_active);
        assert_eq!(state.teams.home.sets_won, 1);
        assert!(matches!(
            events.as_slice(),
            [MatchEvent::SetFinalized { record }, MatchEvent::Buzzer]
                if record.set_number == 1 && record.winner == Winner::Home
        ));
        assert_consistent(&state);
    }

    #[test]
    fn end_set_twice_is_rejected() {
        let mut state = state_with(3, 60);
        run(&mut state, MatchCommand::EndSet).unwrap();
        assert_eq!(
            run(&mut state, MatchCommand::EndSet),
            Err(Rejection::SetAlreadyEnded { set: 1 })
        );
        assert_eq!(state.sets.history.len(), 1);
    }

    #[test]
    fn penalty_gap_defers_finalization() {
        let mut state = state_with(3, 60);
        run(&mut state, MatchCommand::StartTimer).unwrap();
        penalize(&mut state, Side::Away, 3);
        penalize(&mut state, Side::Home, 1);

        let events = run(&mut state, MatchCommand::EndSet).unwrap();

        assert!(!state.clock.is_running());
        assert!(!state.status.is_ended);
        assert!(state.sets.history.is_empty());
        assert!(state.penalty_phase.is_active);
        assert_eq!(state.penalty_phase.striker, Some(Side::Home));
        assert_eq!(state.penalty_phase.defender, Some(Side::Away));
        assert_eq!(state.penalty_phase.penalty_difference, 2);
        assert_eq!(
            state.clock.countdown(ClockMode::Penalty).remaining_seconds,
            20
        );
        assert_eq!(
            events[0],
            MatchEvent::PenaltyPhaseEntered {
                striker: Side::Home,
                defender: Side::Away,
                seconds: 20,
            }
        );
        assert_eq!(
            run(&mut state, MatchCommand::EndSet),
            Err(Rejection::PenaltyPhasePending)
        );
    }

    #[test]
    fn penalty_countdown_expiry_finalizes() {
        let mut state = state_with(3, 60);
        score(&mut state, 0, 1);
        penalize(&mut state, Side::Away, 1);
        run(&mut state, MatchCommand::EndSet).unwrap();

        run(&mut state, MatchCommand::StartPenaltyPhase).unwrap();
        assert!(state.clock.is_running_in(ClockMode::Penalty));

        let events = tick_until_stopped(&mut state);

        assert!(!state.penalty_phase.is_active);
        assert!(state.status.is_ended);
        assert_eq!(state.clock.countdown(ClockMode::Penalty).remaining_seconds, 0);
        assert_eq!(events[0], MatchEvent::TimerExpired { mode: ClockMode::Penalty });
        assert!(events
            .iter()
            .any(|e| matches!(e, MatchEvent::SetFinalized { record } if record.winner == Winner::Away)));
        assert_consistent(&state);
    }

    #[test]
    fn start_timer_resumes_penalty_countdown() {
        let mut state = state_with(3, 60);
        penalize(&mut state, Side::Home, 1);
        run(&mut state, MatchCommand::EndSet).unwrap();

        run(&mut state, MatchCommand::StartTimer).unwrap();
        assert!(state.clock.is_running_in(ClockMode::Penalty));

        run(&mut state, MatchCommand::PauseTimer).unwrap();
        MatchEngine::new(&mut state).tick();
        assert_eq!(
            state.clock.countdown(ClockMode::Penalty).remaining_seconds,
            10
        );
    }

    #[test]
    fn penalty_commands_need_active_phase() {
        let mut state = state_with(3, 60);
        for command in [
            MatchCommand::StartPenaltyPhase,
            MatchCommand::EndPenaltyPhase,
            MatchCommand::SkipPenaltyPhase,
        ] {
            assert_eq!(run(&mut state, command), Err(Rejection::NoPenaltyPhase));
        }
        assert!(state.sets.history.is_empty());
    }

    #[test]
    fn match_clock_expiry_ends_the_set() {
        let mut state = state_with(3, 3);
        score(&mut state, 1, 0);
        run(&mut state, MatchCommand::StartTimer).unwrap();

        assert_eq!(MatchEngine::new(&mut state).tick(), Some(Vec::new()));
        assert_eq!(
            state.clock.countdown(ClockMode::Match).remaining_seconds,
            2
        );

        let events = tick_until_stopped(&mut state);
        assert_eq!(events[0], MatchEvent::TimerExpired { mode: ClockMode::Match });
        assert!(state.status.is_ended);
        assert_eq!(state.sets.history.len(), 1);
        assert_eq!(state.clock.countdown(ClockMode::Match).remaining_seconds, 0);

        // no further ticks once stopped
        assert!(MatchEngine::new(&mut state).tick().is_none());
        assert_eq!(
            run(&mut state, MatchCommand::StartTimer),
            Err(Rejection::SetAlreadyEnded { set: 1 })
        );
    }

    #[test]
    fn waiting_period_runs_break_clock() {
        let mut state = state_with(3, 60);
        assert_eq!(
            run(&mut state, MatchCommand::StartWaitingPeriod),
            Err(Rejection::SetNotEnded { set: 1 })
        );

        run(&mut state, MatchCommand::EndSet).unwrap();
        run(&mut state, MatchCommand::StartWaitingPeriod).unwrap();

        assert!(state.sets.is_waiting_period);
        assert!(!state.status.is_ended);
        assert!(state.clock.is_running_in(ClockMode::Break));
        assert_eq!(
            run(&mut state, MatchCommand::StartWaitingPeriod),
            Err(Rejection::WaitingPeriodActive)
        );

        // start-timer during a paused break resumes the break
        run(&mut state, MatchCommand::PauseTimer).unwrap();
        run(&mut state, MatchCommand::StartTimer).unwrap();
        assert!(state.clock.is_running_in(ClockMode::Break));

        let events = tick_until_stopped(&mut state);
        assert_eq!(
            events,
            vec![
                MatchEvent::TimerExpired {
                    mode: ClockMode::Break
                },
                MatchEvent::Buzzer
            ]
        );
        assert!(!state.sets.is_waiting_period);

        // the set is still finalized, so the next set can start
        run(&mut state, MatchCommand::StartNextSet).unwrap();
        assert_eq!(state.sets.current, 2);
    }

    #[test]
    fn next_set_resets_counters_but_keeps_set_wins() {
        let mut state = state_with(3, 60);
        score(&mut state, 4, 1);
        penalize(&mut state, Side::Home, 2);
        penalize(&mut state, Side::Away, 2);
        run(&mut state, MatchCommand::StartTimer).unwrap();
        MatchEngine::new(&mut state).tick();
        run(&mut state, MatchCommand::EndSet).unwrap();
        run(&mut state, MatchCommand::StartWaitingPeriod).unwrap();

        run(&mut state, MatchCommand::StartNextSet).unwrap();

        assert_eq!(state.sets.current, 2);
        assert!(!state.sets.is_waiting_period);
        assert!(!state.status.is_ended);
        assert!(!state.clock.is_running());
        assert_eq!(state.clock.countdown(ClockMode::Match).remaining_seconds, 60);
        for side in Side::ALL {
            assert_eq!(state.teams.get(side).score, 0);
            assert_eq!(state.teams.get(side).penalties, 0);
        }
        assert_eq!(state.teams.home.sets_won, 1);
        assert_eq!(
            run(&mut state, MatchCommand::StartNextSet),
            Err(Rejection::SetNotEnded { set: 2 })
        );
    }

    #[test]
    fn three_set_scenario_with_penalty_skip() {
        let mut state = state_with(3, 180);

        // set 1: home wins 5-2
        score(&mut state, 5, 2);
        run(&mut state, MatchCommand::EndSet).unwrap();
        assert_eq!(state.teams.home.sets_won, 1);
        run(&mut state, MatchCommand::StartNextSet).unwrap();

        // set 2: 1-1 with penalties home=2, away=0
        score(&mut state, 1, 1);
        penalize(&mut state, Side::Home, 2);
        run(&mut state, MatchCommand::EndSet).unwrap();
        assert!(state.penalty_phase.is_active);
        assert_eq!(state.penalty_phase.striker, Some(Side::Away));
        assert_eq!(state.clock.countdown(ClockMode::Penalty).total_seconds, 20);

        let events = run(&mut state, MatchCommand::SkipPenaltyPhase).unwrap();
        assert!(events.iter().any(
            |e| matches!(e, MatchEvent::SetFinalized { record } if record.winner == Winner::Tie)
        ));
        assert_eq!(state.clock.countdown(ClockMode::Penalty).remaining_seconds, 0);
        assert_eq!(state.teams.home.sets_won, 1);
        assert_eq!(state.teams.away.sets_won, 0);
        assert!(!state.status.is_match_complete);
        run(&mut state, MatchCommand::StartNextSet).unwrap();

        // set 3: home wins 3-0 and takes the match
        score(&mut state, 3, 0);
        let events = run(&mut state, MatchCommand::EndSet).unwrap();
        assert_eq!(state.teams.home.sets_won, 2);
        assert!(state.status.is_match_complete);
        assert!(events.contains(&MatchEvent::MatchCompleted {
            winner: Some(Side::Home)
        }));
        assert_consistent(&state);

        assert_eq!(
            run(&mut state, MatchCommand::StartNextSet),
            Err(Rejection::MatchComplete)
        );
        assert_eq!(
            run(&mut state, MatchCommand::StartWaitingPeriod),
            Err(Rejection::MatchComplete)
        );
    }

    #[test]
    fn majority_completes_match_early() {
        let mut state = state_with(5, 60);
        for set in 1..=3 {
            score(&mut state, 2, 0);
            run(&mut state, MatchCommand::EndSet).unwrap();
            assert_consistent(&state);
            if set < 3 {
                assert!(!state.status.is_match_complete);
                run(&mut state, MatchCommand::StartNextSet).unwrap();
            }
        }
        assert!(state.status.is_match_complete);
        assert_eq!(state.sets.history.len(), 3);
    }

    #[test]
    fn all_sets_played_completes_match() {
        let mut state = state_with(2, 60);
        run(&mut state, MatchCommand::EndSet).unwrap();
        assert!(!state.status.is_match_complete);
        run(&mut state, MatchCommand::StartNextSet).unwrap();
        let events = run(&mut state, MatchCommand::EndSet).unwrap();

        assert!(state.status.is_match_complete);
        assert!(events.contains(&MatchEvent::MatchCompleted { winner: None }));
        assert!(state.sets.history.len() <= state.sets.total as usize);
    }

    #[test]
    fn total_sets_is_clamped() {
        let mut state = MatchState::default();
        run(&mut state, MatchCommand::SetTotalSets { total: 12 }).unwrap();
        assert_eq!(state.sets.total, 9);
        run(&mut state, MatchCommand::SetTotalSets { total: 0 }).unwrap();
        assert_eq!(state.sets.total, 1);
    }

    #[test]
    fn edit_history_moves_set_wins() {
        let mut state = state_with(3, 60);
        score(&mut state, 5, 2);
        run(&mut state, MatchCommand::EndSet).unwrap();
        run(&mut state, MatchCommand::StartNextSet).unwrap();
        score(&mut state, 0, 1);
        run(&mut state, MatchCommand::EndSet).unwrap();

        run(
            &mut state,
            MatchCommand::EditSetHistory {
                set_index: 0,
                home_score: 2,
                away_score: 2,
                winner: Winner::Tie,
            },
        )
        .unwrap();

        let record = state.sets.history.get(0).unwrap();
        assert_eq!(record.set_number, 1);
        assert_eq!((record.home_score, record.away_score), (2, 2));
        assert_eq!(state.teams.home.sets_won, 0);
        assert_eq!(state.teams.away.sets_won, 1);
        assert_consistent(&state);
    }

    #[test]
    fn edit_history_is_idempotent() {
        let mut state = state_with(3, 60);
        score(&mut state, 1, 0);
        run(&mut state, MatchCommand::EndSet).unwrap();
        run(&mut state, MatchCommand::StartNextSet).unwrap();
        score(&mut state, 1, 0);
        run(&mut state, MatchCommand::EndSet).unwrap();
        assert!(state.status.is_match_complete);

        let edit = MatchCommand::EditSetHistory {
            set_index: 1,
            home_score: 0,
            away_score: 4,
            winner: Winner::Away,
        };
        run(&mut state, edit.clone()).unwrap();
        let once = state.clone();
        run(&mut state, edit).unwrap();

        assert_eq!(state, once);
        assert_eq!(state.teams.home.sets_won, 1);
        assert_eq!(state.teams.away.sets_won, 1);
        // a 1-1 split out of 3 sets reopens the match
        assert!(!state.status.is_match_complete);
        assert_consistent(&state);
    }

    /// Set 1 won by home, set 2 a 0-0 tie, set 3 in play.
    fn third_set_in_play() -> MatchState {
        let mut state = state_with(3, 60);
        score(&mut state, 1, 0);
        run(&mut state, MatchCommand::EndSet).unwrap();
        run(&mut state, MatchCommand::StartNextSet).unwrap();
        run(&mut state, MatchCommand::EndSet).unwrap();
        run(&mut state, MatchCommand::StartNextSet).unwrap();
        state
    }

    #[test]
    fn edit_that_decides_match_stops_play() {
        let mut state = third_set_in_play();
        score(&mut state, 2, 0);
        run(&mut state, MatchCommand::StartTimer).unwrap();

        let events = run(
            &mut state,
            MatchCommand::EditSetHistory {
                set_index: 1,
                home_score: 1,
                away_score: 0,
                winner: Winner::Home,
            },
        )
        .unwrap();

        assert_eq!(
            events,
            vec![
                MatchEvent::MatchCompleted {
                    winner: Some(Side::Home)
                },
                MatchEvent::Buzzer
            ]
        );
        assert!(state.status.is_match_complete);
        assert!(state.status.is_ended);
        assert!(!state.clock.is_running());
        assert!(MatchEngine::new(&mut state).tick().is_none());
        assert_eq!(
            run(&mut state, MatchCommand::StartTimer),
            Err(Rejection::MatchComplete)
        );
        assert_eq!(state.sets.history.len(), 2);
        assert_consistent(&state);
    }

    #[test]
    fn lowering_total_sets_decides_match() {
        let mut state = state_with(3, 60);
        score(&mut state, 1, 0);
        run(&mut state, MatchCommand::EndSet).unwrap();
        run(&mut state, MatchCommand::StartNextSet).unwrap();
        run(&mut state, MatchCommand::StartTimer).unwrap();

        let events = run(&mut state, MatchCommand::SetTotalSets { total: 1 }).unwrap();

        assert_eq!(
            events,
            vec![
                MatchEvent::MatchCompleted {
                    winner: Some(Side::Home)
                },
                MatchEvent::Buzzer
            ]
        );
        assert!(state.status.is_match_complete);
        assert!(!state.clock.is_running());
        assert_consistent(&state);

        // raising it again reopens the match without a completion event
        let events = run(&mut state, MatchCommand::SetTotalSets { total: 3 }).unwrap();
        assert!(events.is_empty());
        assert!(!state.status.is_match_complete);
        assert_consistent(&state);
    }

    #[test]
    fn decided_match_abandons_break() {
        let mut state = state_with(3, 60);
        score(&mut state, 1, 0);
        run(&mut state, MatchCommand::EndSet).unwrap();
        run(&mut state, MatchCommand::StartNextSet).unwrap();
        score(&mut state, 0, 1);
        run(&mut state, MatchCommand::EndSet).unwrap();
        run(&mut state, MatchCommand::StartWaitingPeriod).unwrap();
        assert!(state.clock.is_running_in(ClockMode::Break));

        let events = run(
            &mut state,
            MatchCommand::EditSetHistory {
                set_index: 1,
                home_score: 2,
                away_score: 1,
                winner: Winner::Home,
            },
        )
        .unwrap();

        assert!(events.contains(&MatchEvent::MatchCompleted {
            winner: Some(Side::Home)
        }));
        assert!(!state.sets.is_waiting_period);
        assert!(!state.clock.is_running());
        assert_consistent(&state);
    }

    #[test]
    fn decided_match_abandons_penalty_phase() {
        let mut state = third_set_in_play();
        penalize(&mut state, Side::Away, 1);
        run(&mut state, MatchCommand::EndSet).unwrap();
        run(&mut state, MatchCommand::StartPenaltyPhase).unwrap();
        assert!(state.clock.is_running_in(ClockMode::Penalty));

        run(&mut state, MatchCommand::SetTotalSets { total: 2 }).unwrap();

        assert!(state.status.is_match_complete);
        assert!(!state.penalty_phase.is_active);
        assert!(!state.clock.is_running());
        assert_eq!(
            run(&mut state, MatchCommand::SkipPenaltyPhase),
            Err(Rejection::NoPenaltyPhase)
        );
        assert_eq!(state.sets.history.len(), 2);
        assert_consistent(&state);
    }

    #[test]
    fn edit_history_out_of_range_is_noop() {
        let mut state = state_with(3, 60);
        run(&mut state, MatchCommand::EndSet).unwrap();
        let before = state.clone();

        let result = run(
            &mut state,
            MatchCommand::EditSetHistory {
                set_index: 4,
                home_score: 1,
                away_score: 0,
                winner: Winner::Home,
            },
        );

        assert_eq!(
            result,
            Err(Rejection::HistoryIndexOutOfRange { index: 4, len: 1 })
        );
        assert_eq!(state, before);
    }

    #[test]
    fn clock_commands() {
        let mut state = state_with(3, 60);
        assert_eq!(
            run(&mut state, MatchCommand::SetTime { seconds: 0 }),
            Err(Rejection::ZeroDuration)
        );

        run(&mut state, MatchCommand::StartTimer).unwrap();
        run(&mut state, MatchCommand::SetTime { seconds: 90 }).unwrap();
        assert!(!state.clock.is_running());
        assert_eq!(
            *state.clock.countdown(ClockMode::Match),
            crate::clock::Countdown::new(90)
        );

        run(&mut state, MatchCommand::StartTimer).unwrap();
        MatchEngine::new(&mut state).tick();
        run(&mut state, MatchCommand::ResetTimer).unwrap();
        assert!(!state.clock.is_running());
        assert_eq!(state.clock.countdown(ClockMode::Match).remaining_seconds, 90);

        run(&mut state, MatchCommand::SetWaitingTime { seconds: 120 }).unwrap();
        assert_eq!(state.clock.countdown(ClockMode::Break).total_seconds, 120);
    }

    #[test]
    fn only_one_countdown_runs() {
        let mut state = state_with(3, 60);
        run(&mut state, MatchCommand::StartTimer).unwrap();
        run(&mut state, MatchCommand::EndSet).unwrap();
        run(&mut state, MatchCommand::StartWaitingPeriod).unwrap();

        assert!(state.clock.is_running_in(ClockMode::Break));
        assert!(!state.clock.is_running_in(ClockMode::Match));
        assert!(!state.clock.is_running_in(ClockMode::Penalty));
    }

    #[test]
    fn team_settings() {
        let mut state = MatchState::default();
        run(
            &mut state,
            MatchCommand::SetTeamName {
                team: Side::Away,
                name: "Falcons".into(),
            },
        )
        .unwrap();
        assert_eq!(state.teams.away.name, "Falcons");

        let rejected = run(
            &mut state,
            MatchCommand::SetTeamColor {
                team: Side::Home,
                color: "red".into(),
            },
        );
        assert!(matches!(rejected, Err(Rejection::InvalidColor(_))));
        assert_eq!(state.teams.home.color, "#FF4444");
    }

    #[test]
    fn reset_match_keeps_identity_and_settings() {
        let mut state = state_with(5, 90);
        run(
            &mut state,
            MatchCommand::SetTeamName {
                team: Side::Home,
                name: "Hornets".into(),
            },
        )
        .unwrap();
        run(&mut state, MatchCommand::ToggleSound).unwrap();
        run(
            &mut state,
            MatchCommand::AddSponsor {
                name: "Acme".into(),
                logo_path: "sponsors/acme.png".into(),
            },
        )
        .unwrap();
        score(&mut state, 3, 0);
        run(&mut state, MatchCommand::StartTimer).unwrap();
        run(&mut state, MatchCommand::EndSet).unwrap();

        run(&mut state, MatchCommand::ResetMatch).unwrap();

        assert_eq!(state.teams.home.name, "Hornets");
        assert_eq!(state.teams.home.score, 0);
        assert_eq!(state.teams.home.sets_won, 0);
        assert_eq!(state.sets.current, 1);
        assert_eq!(state.sets.total, 5);
        assert!(state.sets.history.is_empty());
        assert!(!state.clock.is_running());
        assert_eq!(state.clock.countdown(ClockMode::Match).remaining_seconds, 90);
        assert!(!state.settings.sound_enabled);
        assert_eq!(state.roster.sponsors().len(), 1);
        assert!(!state.status.is_ended);
    }

    #[test]
    fn sponsor_commands() {
        let mut state = MatchState::default();
        for name in ["a", "b", "c"] {
            run(
                &mut state,
                MatchCommand::AddSponsor {
                    name: name.into(),
                    logo_path: format!("sponsors/{name}.png"),
                },
            )
            .unwrap();
        }
        let ids: Vec<SponsorId> = state.roster.sponsors().iter().map(|s| s.id).collect();

        run(
            &mut state,
            MatchCommand::ReorderSponsors {
                sponsor_ids: vec![ids[1], ids[0], ids[2]],
            },
        )
        .unwrap();
        let names: Vec<(&str, u32)> = state
            .roster
            .sponsors()
            .iter()
            .map(|s| (s.name.as_str(), s.order))
            .collect();
        assert_eq!(names, vec![("b", 0), ("a", 1), ("c", 2)]);

        let events = run(&mut state, MatchCommand::RemoveSponsor { id: ids[0] }).unwrap();
        assert!(matches!(
            events.as_slice(),
            [MatchEvent::SponsorRemoved { sponsor }] if sponsor.logo_path == "sponsors/a.png"
        ));
        assert_eq!(
            run(&mut state, MatchCommand::RemoveSponsor { id: ids[0] }),
            Err(Rejection::UnknownSponsor(ids[0]))
        );

        run(
            &mut state,
            MatchCommand::UpdateSponsor {
                id: ids[2],
                name: Some("Charlie".into()),
                logo_path: None,
                white_background: None,
            },
        )
        .unwrap();
        assert_eq!(state.roster.get(ids[2]).unwrap().name, "Charlie");

        run(&mut state, MatchCommand::SetSponsorLabel { label: None }).unwrap();
        assert_eq!(state.roster.label(), "Event Sponsors");
    }
}
