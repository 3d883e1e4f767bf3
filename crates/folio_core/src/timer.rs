//! Interval timers driven by frame time.
//!
//! Replaces wall-clock interval callbacks: the owning component polls its
//! timer from `on_frame` and spawns once per elapsed period. Nothing runs
//! between frames, so a torn-down component leaves nothing scheduled.

use std::time::Duration;

use crate::error::{CoreError, CoreResult};

/// Fires once per `period` of frame time.
#[derive(Debug, Clone)]
pub struct IntervalTimer {
    period: Duration,
    /// Time of the next fire. `None` until the first poll or reset.
    next_due: Option<Duration>,
}

impl IntervalTimer {
    /// Most periods reported by a single poll. A host that stalls for a
    /// second (background tab) gets a short burst, not a flood.
    pub const MAX_CATCH_UP: u32 = 4;

    /// Creates a timer with the given period.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::ZeroPeriod`] for a zero period.
    pub fn new(period: Duration) -> CoreResult<Self> {
        if period.is_zero() {
            return Err(CoreError::ZeroPeriod);
        }
        Ok(Self {
            period,
            next_due: None,
        })
    }

    /// Creates a timer from a period in milliseconds.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::ZeroPeriod`] for a zero period.
    pub fn from_millis(millis: u64) -> CoreResult<Self> {
        Self::new(Duration::from_millis(millis))
    }

    /// Returns the period.
    #[must_use]
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Restarts the phase: the next fire is one full period after `now`.
    pub fn reset(&mut self, now: Duration) {
        self.next_due = Some(now + self.period);
    }

    /// Forgets the phase. The next poll re-arms without firing.
    pub fn disarm(&mut self) {
        self.next_due = None;
    }

    /// Returns true once the timer has a scheduled fire.
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.next_due.is_some()
    }

    /// Returns how many periods elapsed since the previous fire.
    ///
    /// The first poll only arms the timer.
    pub fn poll(&mut self, now: Duration) -> u32 {
        let Some(due) = self.next_due else {
            self.reset(now);
            return 0;
        };

        if now < due {
            return 0;
        }

        let behind = (now - due).as_nanos() / self.period.as_nanos();
        let fired = u32::try_from(behind.saturating_add(1)).unwrap_or(u32::MAX);

        if fired > Self::MAX_CATCH_UP {
            self.reset(now);
            return Self::MAX_CATCH_UP;
        }

        self.next_due = Some(due + self.period * fired);
        fired
    }
}
