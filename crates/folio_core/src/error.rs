//! # Core Error Types

use thiserror::Error;

/// Errors raised while wiring up frame and pointer plumbing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Interval timers need a non-zero period.
    #[error("timer period must be greater than zero")]
    ZeroPeriod,

    /// Frame clocks need a positive rate.
    #[error("frame rate must be greater than zero")]
    ZeroFrameRate,

    /// Pointer subscriptions need room for at least one event.
    #[error("subscription capacity must be greater than zero")]
    ZeroCapacity,
}

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;
