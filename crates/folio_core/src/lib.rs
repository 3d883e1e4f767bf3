//! # Folio Core
//!
//! Plumbing shared by every decorative effect on the site:
//! - a single frame dispatcher that all animated components mount into
//! - a pointer bus with per-component, lifetime-scoped subscriptions
//! - interval timers measured in frame time
//! - seeded randomness and planar math
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  host (browser glue, headless runner, tests)             │
//! │     │ pointer events              │ display callback     │
//! │     ▼                             ▼                      │
//! │  PointerBus ──subscriptions──► FrameDispatcher           │
//! │                                   │ on_frame(ctx)        │
//! │                                   ▼                      │
//! │                          mounted components              │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything runs on the host's frame thread. Locks exist only so that
//! mounted handles can be shared with the host; they are never contended.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod error;
pub mod frame;
pub mod math;
pub mod pointer;
pub mod random;
pub mod timer;

pub use error::{CoreError, CoreResult};
pub use frame::{
    Animated, AnimationId, FrameClock, FrameContext, FrameDispatcher, FrameRegistration, Mounted,
};
pub use math::{Edge, Rect, Vec2};
pub use pointer::{PointerBus, PointerEvent, PointerPosition, PointerSubscription};
pub use random::EffectRng;
pub use timer::IntervalTimer;
