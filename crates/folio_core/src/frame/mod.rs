//! # Frame Loop
//!
//! Every animated component is driven by one dispatcher instead of
//! scheduling its own display callback.
//!
//! ```text
//! host display callback ──► FrameDispatcher::dispatch(now)
//!                                 │
//!             ┌───────────────────┼───────────────────┐
//!             ▼                   ▼                   ▼
//!      AmbientField        HoverEmitter          SwingText
//!        on_frame             on_frame             on_frame
//! ```
//!
//! ## Teardown
//!
//! `mount` hands back a [`Mounted`] guard. Dropping it removes the component
//! from the dispatcher, so every exit path of the owner (early return, panic
//! unwind, normal drop) stops the callbacks. There is no way to leak a
//! runaway frame loop short of leaking the guard itself.

mod clock;
mod dispatcher;

pub use clock::FrameClock;
pub use dispatcher::{
    Animated, AnimationId, FrameContext, FrameDispatcher, FrameRegistration, Mounted,
};
