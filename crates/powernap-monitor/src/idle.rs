//! The idle accumulator.

use std::time::Duration;

use chrono::{DateTime, Utc};

/// What one poll tick observed about the host's work queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Observation {
    /// The host reported this many jobs that count as active work.
    Active(usize),
    /// The host reported zero active work.
    Empty,
    /// The query failed; the host's state is unknown for this tick.
    Unknown,
}

/// Effect of one tick on the idle accumulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Active work observed; the accumulator went back to zero.
    Reset {
        /// Number of active jobs observed.
        active: usize,
    },
    /// No work observed; the accumulator advanced by the poll interval.
    Advanced {
        /// Total accumulated idle time after this tick.
        idle: Duration,
    },
    /// Unknown state; the accumulator was left untouched.
    Held,
}

/// Accumulated idle time for one Monitoring sub-run.
///
/// The accumulator is monotone non-decreasing between resets, goes back to
/// exactly zero whenever active work is observed, and never moves on a tick
/// whose query failed. A failed tick must not look like "no work".
#[derive(Debug, Clone, Default)]
pub struct IdleState {
    accumulated: Duration,
    last_poll: Option<DateTime<Utc>>,
}

impl IdleState {
    /// Fresh accumulator at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one tick's observation into the accumulator.
    pub fn apply(&mut self, observation: Observation, interval: Duration) -> TickOutcome {
        self.last_poll = Some(Utc::now());
        match observation {
            Observation::Active(active) => {
                self.accumulated = Duration::ZERO;
                TickOutcome::Reset { active }
            }
            Observation::Empty => {
                self.accumulated += interval;
                TickOutcome::Advanced {
                    idle: self.accumulated,
                }
            }
            Observation::Unknown => TickOutcome::Held,
        }
    }

    /// Drop back to zero, e.g. when Monitoring is (re-)entered.
    pub fn reset(&mut self) {
        self.accumulated = Duration::ZERO;
    }

    /// Idle time accumulated since the last reset.
    #[must_use]
    pub const fn accumulated(&self) -> Duration {
        self.accumulated
    }

    /// When the last poll was folded in, if any.
    #[must_use]
    pub const fn last_poll(&self) -> Option<DateTime<Utc>> {
        self.last_poll
    }
}
