//! The single countdown clock shared by set play, breaks, and penalty phases.
//!
//! [`Clock`] owns one [`Countdown`] per [`ClockMode`] but only ever runs one of
//! them, so "at most one running clock" holds by construction. The clock has
//! no notion of wall time: a scheduler calls [`Clock::tick`] once per second
//! while [`Clock::is_running`] is true.

/// Which countdown the clock is currently driving.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ClockMode {
    /// Set play.
    #[default]
    Match,
    /// Break between sets.
    Break,
    /// Post-set penalty phase.
    Penalty,
}

/// Seconds configured and remaining for one clock mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Countdown {
    pub total_seconds: u32,
    pub remaining_seconds: u32,
}

impl Countdown {
    pub const fn new(seconds: u32) -> Self {
        Self {
            total_seconds: seconds,
            remaining_seconds: seconds,
        }
    }

    pub const fn is_expired(&self) -> bool {
        self.remaining_seconds == 0
    }
}

/// Result of one clock tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClockTick {
    pub mode: ClockMode,
    pub remaining_seconds: u32,
    /// The countdown hit zero on this tick and the clock stopped itself.
    pub zero_reached: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Clock {
    mode: ClockMode,
    is_running: bool,
    match_time: Countdown,
    break_time: Countdown,
    penalty_time: Countdown,
}

impl Clock {
    pub const fn new(match_seconds: u32, break_seconds: u32) -> Self {
        Self {
            mode: ClockMode::Match,
            is_running: false,
            match_time: Countdown::new(match_seconds),
            break_time: Countdown::new(break_seconds),
            penalty_time: Countdown::new(0),
        }
    }

    /// Mode of the most recently started countdown.
    pub const fn mode(&self) -> ClockMode {
        self.mode
    }

    pub const fn is_running(&self) -> bool {
        self.is_running
    }

    pub fn is_running_in(&self, mode: ClockMode) -> bool {
        self.is_running && self.mode == mode
    }

    pub const fn countdown(&self, mode: ClockMode) -> &Countdown {
        match mode {
            ClockMode::Match => &self.match_time,
            ClockMode::Break => &self.break_time,
            ClockMode::Penalty => &self.penalty_time,
        }
    }

    fn countdown_mut(&mut self, mode: ClockMode) -> &mut Countdown {
        match mode {
            ClockMode::Match => &mut self.match_time,
            ClockMode::Break => &mut self.break_time,
            ClockMode::Penalty => &mut self.penalty_time,
        }
    }

    /// Starts counting down `mode`.
    ///
    /// Returns false without changing anything when the clock is already
    /// running (in any mode) or when `mode` has no time left.
    pub fn start(&mut self, mode: ClockMode) -> bool {
        if self.is_running || self.countdown(mode).is_expired() {
            return false;
        }
        self.mode = mode;
        self.is_running = true;
        true
    }

    /// Stops the clock. Idempotent; returns whether it was running.
    pub fn pause(&mut self) -> bool {
        std::mem::replace(&mut self.is_running, false)
    }

    /// Sets the remaining time of `mode`, pausing first if `mode` is running.
    pub fn reset(&mut self, mode: ClockMode, to_seconds: u32) {
        if self.is_running_in(mode) {
            self.pause();
        }
        let countdown = self.countdown_mut(mode);
        countdown.remaining_seconds = to_seconds.min(countdown.total_seconds);
    }

    /// Restores the remaining time of `mode` to its configured total.
    pub fn rewind(&mut self, mode: ClockMode) {
        let total = self.countdown(mode).total_seconds;
        self.reset(mode, total);
    }

    /// Reconfigures `mode` to `seconds` total and remaining, pausing first if
    /// `mode` is running.
    pub fn set_duration(&mut self, mode: ClockMode, seconds: u32) {
        if self.is_running_in(mode) {
            self.pause();
        }
        *self.countdown_mut(mode) = Countdown::new(seconds);
    }

    /// Advances the running countdown by one second.
    ///
    /// Returns `None` when the clock is paused. Remaining time never goes
    /// below zero: the tick that reaches zero also stops the clock.
    pub fn tick(&mut self) -> Option<ClockTick> {
        if !self.is_running {
            return None;
        }
        let mode = self.mode;
        let countdown = self.countdown_mut(mode);
        countdown.remaining_seconds = countdown.remaining_seconds.saturating_sub(1);
        let remaining_seconds = countdown.remaining_seconds;

        let zero_reached = remaining_seconds == 0;
        if zero_reached {
            self.is_running = false;
        }

        Some(ClockTick {
            mode,
            remaining_seconds,
            zero_reached,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_is_noop_when_running_or_expired() {
        let mut clock = Clock::new(3, 5);
        assert!(clock.start(ClockMode::Match));
        assert!(!clock.start(ClockMode::Break));
        assert_eq!(clock.mode(), ClockMode::Match);

        clock.pause();
        clock.reset(ClockMode::Match, 0);
        assert!(!clock.start(ClockMode::Match));
        assert!(!clock.is_running());
    }

    #[test]
    fn ticks_down_and_stops_at_zero() {
        let mut clock = Clock::new(2, 5);
        clock.start(ClockMode::Match);

        let first = clock.tick().unwrap();
        assert_eq!(first.remaining_seconds, 1);
        assert!(!first.zero_reached);

        let second = clock.tick().unwrap();
        assert_eq!(second.remaining_seconds, 0);
        assert!(second.zero_reached);
        assert!(!clock.is_running());

        assert!(clock.tick().is_none());
        assert_eq!(clock.countdown(ClockMode::Match).remaining_seconds, 0);
    }

    #[test]
    fn pause_is_idempotent() {
        let mut clock = Clock::new(10, 5);
        assert!(!clock.pause());
        clock.start(ClockMode::Match);
        assert!(clock.pause());
        assert!(!clock.pause());
        assert!(clock.tick().is_none());
    }

    #[test]
    fn set_duration_pauses_the_running_mode_only() {
        let mut clock = Clock::new(10, 5);
        clock.start(ClockMode::Match);

        clock.set_duration(ClockMode::Break, 60);
        assert!(clock.is_running_in(ClockMode::Match));
        assert_eq!(clock.countdown(ClockMode::Break), &Countdown::new(60));

        clock.set_duration(ClockMode::Match, 30);
        assert!(!clock.is_running());
        assert_eq!(clock.countdown(ClockMode::Match), &Countdown::new(30));
    }

    #[test]
    fn rewind_restores_total() {
        let mut clock = Clock::new(3, 5);
        clock.start(ClockMode::Match);
        clock.tick();
        clock.tick();
        clock.rewind(ClockMode::Match);
        assert!(!clock.is_running());
        assert_eq!(clock.countdown(ClockMode::Match).remaining_seconds, 3);
    }
}
