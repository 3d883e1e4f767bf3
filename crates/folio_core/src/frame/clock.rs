//! Fixed-rate frame clock for hosts without a display callback.
//!
//! [`FrameClock::advance`] steps a virtual time line by exactly one frame.
//! Headless runs and deterministic tests feed its output to
//! [`FrameDispatcher::dispatch`](super::FrameDispatcher::dispatch).

use std::time::Duration;

use crate::error::{CoreError, CoreResult};

/// Fixed-step virtual time line.
#[derive(Debug, Clone)]
pub struct FrameClock {
    frame_duration: Duration,
    now: Duration,
    frame_count: u64,
}

impl FrameClock {
    /// Creates a clock running at `rate` frames per second.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::ZeroFrameRate`] for a zero rate.
    pub fn new(rate: u32) -> CoreResult<Self> {
        if rate == 0 {
            return Err(CoreError::ZeroFrameRate);
        }
        Ok(Self::with_frame_duration(Duration::from_micros(
            1_000_000 / u64::from(rate),
        )))
    }

    /// A 60 Hz clock, the display rate the effects are tuned for.
    #[must_use]
    pub fn sixty_hz() -> Self {
        Self::with_frame_duration(Duration::from_micros(16_666))
    }

    const fn with_frame_duration(frame_duration: Duration) -> Self {
        Self {
            frame_duration,
            now: Duration::ZERO,
            frame_count: 0,
        }
    }

    /// Steps the time line by one frame and returns the new time.
    pub fn advance(&mut self) -> Duration {
        self.now += self.frame_duration;
        self.frame_count += 1;
        self.now
    }

    /// Current time on the line.
    #[must_use]
    pub const fn now(&self) -> Duration {
        self.now
    }

    /// Frames produced so far.
    #[must_use]
    pub const fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Target frame duration.
    #[must_use]
    pub const fn frame_duration(&self) -> Duration {
        self.frame_duration
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::sixty_hz()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_creation() {
        let clock = FrameClock::new(60).unwrap();
        assert_eq!(clock.frame_count(), 0);
        assert_eq!(clock.now(), Duration::ZERO);
        assert_eq!(clock.frame_duration(), Duration::from_micros(16666));
        assert_eq!(FrameClock::new(0).unwrap_err(), CoreError::ZeroFrameRate);
    }

    #[test]
    fn test_advance_is_fixed_step() {
        let mut clock = FrameClock::new(100).unwrap();
        assert_eq!(clock.advance(), Duration::from_millis(10));
        assert_eq!(clock.advance(), Duration::from_millis(20));
        assert_eq!(clock.now(), Duration::from_millis(20));
        assert_eq!(clock.frame_count(), 2);
    }

    #[test]
    fn test_default_matches_sixty_hz() {
        let mut clock = FrameClock::default();
        for _ in 0..60 {
            clock.advance();
        }
        assert_eq!(clock.now(), Duration::from_micros(16_666 * 60));
    }
}
