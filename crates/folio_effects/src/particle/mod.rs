//! # Decaying Particle Sets
//!
//! Every effect on the site draws the same kind of swarm: short-lived shapes
//! that drift, fade and shrink. This module is the one implementation of it.
//!
//! ```text
//!   SpawnPolicy ──origin──┐
//!                         ├──► ParticleSet::emit ──► particles (≤ ceiling)
//!   ParticleTemplate ─────┘                              │
//!                                              step() per frame:
//!                                              move, spin, fade, shrink,
//!                                              drop opacity ≤ 0
//! ```
//!
//! What differs between call sites is only *where* particles appear
//! ([`SpawnPolicy`]) and *what* they look like ([`ParticleTemplate`]).

mod set;
mod spawn;

pub use set::ParticleSet;
pub use spawn::{EdgeOfBox, ParticleTemplate, RadialBurst, RandomField, SpawnPolicy};

use bytemuck::{Pod, Zeroable};
use folio_core::{EffectRng, Vec2};
use serde::{Deserialize, Serialize};

/// Drawable shape of a particle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u32)]
pub enum Shape {
    /// Soft round dot.
    Dot = 0,
    /// Five-point star.
    Star = 1,
    /// Square rotated 45°.
    Diamond = 2,
    /// Upward triangle.
    Triangle = 3,
    /// Rounded square.
    Square = 4,
    /// Bevelled square.
    Cube = 5,
}

impl Shape {
    /// Every shape, in discriminant order.
    pub const ALL: [Self; 6] = [
        Self::Dot,
        Self::Star,
        Self::Diamond,
        Self::Triangle,
        Self::Square,
        Self::Cube,
    ];
}

/// Shape selection for an emitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeMode {
    /// Dots only.
    #[default]
    Dots,
    /// Stars only.
    Stars,
    /// Mostly stars, some dots.
    Mixed,
    /// Uniform over every shape.
    Assorted,
}

impl ShapeMode {
    /// Share of stars in [`ShapeMode::Mixed`].
    pub const MIXED_STAR_RATIO: f32 = 0.7;

    /// Draws one shape.
    pub fn sample(self, rng: &mut EffectRng) -> Shape {
        match self {
            Self::Dots => Shape::Dot,
            Self::Stars => Shape::Star,
            Self::Mixed => {
                if rng.chance(Self::MIXED_STAR_RATIO) {
                    Shape::Star
                } else {
                    Shape::Dot
                }
            }
            Self::Assorted => rng.pick(&Shape::ALL).copied().unwrap_or(Shape::Dot),
        }
    }
}

/// A single decorative particle.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    /// Unique within its set.
    pub id: u64,
    /// Position in the owning effect's coordinate space.
    pub position: Vec2,
    /// Displacement per frame.
    pub velocity: Vec2,
    /// Drift velocity the particle relaxes back to, if it has one.
    pub base_velocity: Option<Vec2>,
    /// Diameter (px).
    pub size: f32,
    /// 0 (gone) to 1.
    pub opacity: f32,
    /// Shape to draw.
    pub shape: Shape,
    /// Rotation (deg).
    pub rotation: f32,
    /// Rotation per frame (deg).
    pub rotation_speed: f32,
}

/// How fast particles fade and shrink.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecayRule {
    /// Opacity subtracted per frame.
    pub opacity_step: f32,
    /// Size multiplier per frame.
    pub size_factor: f32,
}

impl DecayRule {
    /// Particles that never fade.
    pub const PERSISTENT: Self = Self {
        opacity_step: 0.0,
        size_factor: 1.0,
    };

    /// Creates a rule. Negative steps and growth factors are clamped away so
    /// opacity and size can only fall.
    #[must_use]
    pub fn new(opacity_step: f32, size_factor: f32) -> Self {
        Self {
            opacity_step: opacity_step.max(0.0),
            size_factor: size_factor.clamp(0.0, 1.0),
        }
    }
}

/// GPU/renderer-facing snapshot of one particle.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct ParticleInstance {
    /// Position (xy).
    pub position: [f32; 2],
    /// Diameter.
    pub size: f32,
    /// Opacity.
    pub opacity: f32,
    /// Rotation (deg).
    pub rotation: f32,
    /// [`Shape`] discriminant.
    pub shape: u32,
}

impl ParticleInstance {
    /// Size of an instance in bytes.
    pub const SIZE: usize = std::mem::size_of::<Self>();
}

impl From<&Particle> for ParticleInstance {
    fn from(p: &Particle) -> Self {
        Self {
            position: p.position.to_array(),
            size: p.size,
            opacity: p.opacity,
            rotation: p.rotation,
            shape: p.shape as u32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instance_has_no_padding() {
        assert_eq!(ParticleInstance::SIZE, 24);
    }

    #[test]
    fn test_shape_modes() {
        let mut rng = EffectRng::from_seed(11);
        for _ in 0..50 {
            assert_eq!(ShapeMode::Dots.sample(&mut rng), Shape::Dot);
            assert_eq!(ShapeMode::Stars.sample(&mut rng), Shape::Star);
            let mixed = ShapeMode::Mixed.sample(&mut rng);
            assert!(matches!(mixed, Shape::Dot | Shape::Star));
        }
    }

    #[test]
    fn test_mixed_is_mostly_stars() {
        let mut rng = EffectRng::from_seed(5);
        let stars = (0..10_000)
            .filter(|_| ShapeMode::Mixed.sample(&mut rng) == Shape::Star)
            .count();
        assert!((6_500..7_500).contains(&stars), "stars: {stars}");
    }

    #[test]
    fn test_decay_rule_never_grows() {
        let rule = DecayRule::new(-0.5, 1.3);
        assert_eq!(rule, DecayRule::PERSISTENT);
    }
}
