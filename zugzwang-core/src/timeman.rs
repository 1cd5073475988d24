//! Time management: per-side chess clocks and the time control that seeds them.

use std::time::{Duration, Instant};

use crate::error::{self, ErrorKind};

/// One minute, the minimum total allowance a [`TimeControl`] may specify.
const MIN_TOTAL: Duration = Duration::from_secs(60);
/// Twenty-four hours, the maximum total allowance a [`TimeControl`] may specify.
const MAX_TOTAL: Duration = Duration::from_secs(24 * 60 * 60);
/// Two minutes, the maximum per-move increment a [`TimeControl`] may specify.
const MAX_INCREMENT: Duration = Duration::from_secs(2 * 60);

/// The time control a game is seeded with: a total allowance per side plus
/// a per-move increment added back after each completed move.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct TimeControl {
    pub total: Duration,
    pub increment: Duration,
}

impl TimeControl {
    /// Builds a `TimeControl`, rejecting totals or increments outside the
    /// allowed range (1 min <= total <= 24h, 0 <= increment <= 2 min).
    pub fn new(total: Duration, increment: Duration) -> error::Result<Self> {
        if total < MIN_TOTAL || total > MAX_TOTAL || increment > MAX_INCREMENT {
            return Err(ErrorKind::InvalidTimeControl.into());
        }
        Ok(Self { total, increment })
    }

    /// A pair of freshly-started-but-stopped clocks seeded from this control.
    pub fn new_clocks(&self) -> (Clock, Clock) {
        (Clock::new(self.total), Clock::new(self.total))
    }
}

/// A single side's chess clock.
///
/// `remaining` is the time banked as of the last stop (or construction);
/// while running, the true remaining time is computed lazily from
/// `restart_time` rather than ticked down continuously, so a `Clock` with no
/// observer costs nothing between queries.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Clock {
    remaining: Duration,
    restart_time: Option<Instant>,
}

impl Clock {
    /// A stopped clock holding `total` time.
    pub fn new(total: Duration) -> Self {
        Self {
            remaining: total,
            restart_time: None,
        }
    }

    /// True while this clock is ticking.
    pub fn is_running(&self) -> bool {
        self.restart_time.is_some()
    }

    /// Starts the clock from now. A no-op if already running.
    pub fn start(&mut self) {
        if self.restart_time.is_none() {
            self.restart_time = Some(Instant::now());
        }
    }

    /// Stops the clock, banking whatever time remains. A no-op if already stopped.
    pub fn stop(&mut self) {
        self.remaining = self.remaining_time();
        self.restart_time = None;
    }

    /// Time left on the clock right now, never negative.
    pub fn remaining_time(&self) -> Duration {
        match self.restart_time {
            None => self.remaining,
            Some(restart_time) => self.remaining.saturating_sub(restart_time.elapsed()),
        }
    }

    /// True once this clock has run out.
    pub fn is_expired(&self) -> bool {
        self.remaining_time().is_zero()
    }

    /// Adds `increment` to the banked remaining time, without affecting
    /// whether the clock is running.
    pub fn add_increment(&mut self, increment: Duration) {
        self.remaining = self.remaining_time() + increment;
        if self.restart_time.is_some() {
            self.restart_time = Some(Instant::now());
        }
    }

    /// Overwrites the banked remaining time outright, stopping the clock.
    /// Test-construction tooling for simulating clock exhaustion without
    /// real waits, alongside FEN parsing.
    #[cfg(test)]
    pub fn set_remaining(&mut self, remaining: Duration) {
        self.remaining = remaining;
        self.restart_time = None;
    }
}
