//! # Folio Effects
//!
//! Decorative motion for the portfolio site:
//! - an ambient swarm of drifting shapes that shies away from the pointer
//! - a hover emitter that sheds particles off an element's edges
//! - a draggable hexagon card and image cube with momentum
//! - per-character spring text
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │  AmbientField   HoverEmitter   DraggableObject   SwingText │
//! │       │              │               │               │     │
//! │       └──────────────┴──── ParticleSet ──────────────┘     │
//! │                     (spawn policy + template)              │
//! │                                                            │
//! │   every component: folio_core::Animated, mounted once      │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! Components never talk to each other. Each owns its particles, timers and
//! pointer subscription; unmounting drops all three.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod ambient;
pub mod config;
pub mod draggable;
pub mod emitter;
pub mod error;
pub mod particle;
pub mod spring;
pub mod swing_text;

pub use ambient::{AmbientField, Viewport};
pub use config::{AmbientConfig, EffectsConfig, HoverEmitterConfig, SwingTextConfig};
pub use draggable::{
    DraggableKind, DraggableObject, InteractionState, ObjectTransform, Orientation, PointerInput,
};
pub use emitter::HoverEmitter;
pub use error::{EffectsError, EffectsResult};
pub use particle::{
    DecayRule, EdgeOfBox, Particle, ParticleInstance, ParticleSet, ParticleTemplate, RadialBurst,
    RandomField, Shape, ShapeMode, SpawnPolicy,
};
pub use spring::{Settle, SpringAxis, SpringParams};
pub use swing_text::{Glyph, SwingText};
