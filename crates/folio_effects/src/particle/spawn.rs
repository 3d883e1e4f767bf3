//! Where particles appear and what they start as.

use folio_core::{EffectRng, Rect, Vec2};

use super::{Particle, ShapeMode};

/// Picks the spawn point of a particle inside (or around) `bounds`.
pub trait SpawnPolicy {
    /// Returns a spawn position in the same space as `bounds`.
    fn origin(&self, bounds: &Rect, rng: &mut EffectRng) -> Vec2;
}

/// Random point on a random edge, pushed `margin` outward.
///
/// With a zero margin this is the hover emitter's policy; with the wrap
/// margin it is the background's off-screen entry point.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EdgeOfBox {
    /// Distance outside the box.
    pub margin: f32,
}

impl SpawnPolicy for EdgeOfBox {
    fn origin(&self, bounds: &Rect, rng: &mut EffectRng) -> Vec2 {
        let edge = rng.edge();
        let local = bounds.edge_point(edge, rng.unit());
        let push = match edge {
            folio_core::Edge::Top => Vec2::new(0.0, -self.margin),
            folio_core::Edge::Right => Vec2::new(self.margin, 0.0),
            folio_core::Edge::Bottom => Vec2::new(0.0, self.margin),
            folio_core::Edge::Left => Vec2::new(-self.margin, 0.0),
        };
        Vec2::new(bounds.x, bounds.y) + local + push
    }
}

/// Random point on a ring around the center of `bounds`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadialBurst {
    /// Inner ring radius.
    pub min_radius: f32,
    /// Outer ring radius.
    pub max_radius: f32,
}

impl SpawnPolicy for RadialBurst {
    fn origin(&self, bounds: &Rect, rng: &mut EffectRng) -> Vec2 {
        let angle = rng.angle();
        let distance = rng.range(self.min_radius, self.max_radius);
        bounds.center() + Vec2::from_angle(angle) * distance
    }
}

/// Uniform point inside `bounds`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RandomField;

impl SpawnPolicy for RandomField {
    fn origin(&self, bounds: &Rect, rng: &mut EffectRng) -> Vec2 {
        Vec2::new(
            bounds.x + rng.unit() * bounds.width,
            bounds.y + rng.unit() * bounds.height,
        )
    }
}

/// Initial state of spawned particles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleTemplate {
    /// Smallest size.
    pub size_min: f32,
    /// Largest size.
    pub size_max: f32,
    /// Lowest opacity.
    pub opacity_min: f32,
    /// Highest opacity.
    pub opacity_max: f32,
    /// Velocity per axis is uniform in ±speed (scaled by emit intensity).
    pub speed: f32,
    /// Constant added to every spawned velocity.
    pub drift: Vec2,
    /// Shape selection.
    pub shapes: ShapeMode,
    /// Size multiplier applied to stars.
    pub star_scale: f32,
    /// Rotation speed is uniform in ±this; non-zero also randomizes the
    /// starting rotation.
    pub spin: f32,
    /// Remember the spawn velocity as the particle's resting velocity.
    pub rests: bool,
}

impl ParticleTemplate {
    /// Dots of a fixed opacity with no spin.
    #[must_use]
    pub const fn dots(size_min: f32, size_max: f32, opacity: f32, speed: f32) -> Self {
        Self {
            size_min,
            size_max,
            opacity_min: opacity,
            opacity_max: opacity,
            speed,
            drift: Vec2::ZERO,
            shapes: ShapeMode::Dots,
            star_scale: 1.0,
            spin: 0.0,
            rests: false,
        }
    }

    /// Adds a constant drift.
    #[must_use]
    pub const fn with_drift(mut self, drift: Vec2) -> Self {
        self.drift = drift;
        self
    }

    /// Sets the shape selection and star scale.
    #[must_use]
    pub const fn with_shapes(mut self, shapes: ShapeMode, star_scale: f32) -> Self {
        self.shapes = shapes;
        self.star_scale = star_scale;
        self
    }

    /// Draws a particle at `position`. The id is assigned by the set.
    pub fn instantiate(&self, position: Vec2, intensity: f32, rng: &mut EffectRng) -> Particle {
        let shape = self.shapes.sample(rng);
        let mut size = rng.range(self.size_min, self.size_max);
        if shape == super::Shape::Star {
            size *= self.star_scale;
        }

        let speed = self.speed * intensity;
        let velocity = Vec2::new(rng.signed(speed), rng.signed(speed)) + self.drift;

        let (rotation, rotation_speed) = if self.spin > 0.0 {
            (rng.range(0.0, 360.0), rng.signed(self.spin))
        } else {
            (0.0, 0.0)
        };

        Particle {
            id: 0,
            position,
            velocity,
            base_velocity: self.rests.then_some(velocity),
            size,
            opacity: rng.range(self.opacity_min, self.opacity_max),
            shape,
            rotation,
            rotation_speed,
        }
    }
}
