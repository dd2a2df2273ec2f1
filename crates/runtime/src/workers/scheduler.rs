//! One-second cadence for the match clock.
//!
//! The scheduler is armed only while the clock runs. A disarmed scheduler
//! never completes, so it can sit in a `tokio::select!` next to the command
//! channel without waking the controller.

use std::future;

use tokio::time::{Duration, Instant, Interval, MissedTickBehavior, interval_at};

pub struct TickScheduler {
    period: Duration,
    interval: Option<Interval>,
}

impl TickScheduler {
    pub fn new(period: Duration) -> Self {
        Self {
            period: period.max(Duration::from_millis(1)),
            interval: None,
        }
    }

    /// Arms or disarms to match the clock. Arming an armed scheduler keeps
    /// its phase; a fresh arm fires one full period from now.
    pub fn sync(&mut self, clock_running: bool) {
        match (clock_running, self.interval.is_some()) {
            (true, false) => {
                let mut interval = interval_at(Instant::now() + self.period, self.period);
                interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
                self.interval = Some(interval);
            }
            (false, true) => self.interval = None,
            _ => {}
        }
    }

    /// Completes at the next tick; pends forever while disarmed.
    pub async fn tick(&mut self) {
        match self.interval.as_mut() {
            Some(interval) => {
                interval.tick().await;
            }
            None => future::pending::<()>().await,
        }
    }
}
