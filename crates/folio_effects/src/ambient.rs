//! # Ambient Particle Field
//!
//! A click-through layer of drifting shapes covering the whole page.
//!
//! Every frame each particle is pushed away from the pointer when it is
//! close, otherwise eased back to its own resting drift. Particles leaving
//! the page wrap to the opposite side. New particles enter from a random
//! edge on a fixed interval until the population ceiling is reached.
//! Nothing here fades; the population only grows to the ceiling.

use folio_core::{
    Animated, EffectRng, FrameContext, IntervalTimer, PointerEvent, PointerSubscription, Rect,
    Vec2,
};

use crate::config::AmbientConfig;
use crate::error::EffectsResult;
use crate::particle::{
    DecayRule, EdgeOfBox, Particle, ParticleInstance, ParticleSet, ParticleTemplate, RandomField,
    ShapeMode,
};

/// Size of the visible window and of the scrollable document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Window width (px).
    pub width: f32,
    /// Window height (px).
    pub height: f32,
    /// Full document height (px). Vertical wrapping uses this.
    pub document_height: f32,
}

impl Viewport {
    /// Viewport whose document is exactly one screen tall.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            document_height: height,
        }
    }

    /// Sets the scrollable document height.
    #[must_use]
    pub const fn with_document_height(mut self, document_height: f32) -> Self {
        self.document_height = document_height;
        self
    }

    fn screen(&self) -> Rect {
        Rect::sized(self.width, self.height)
    }
}

/// The page-wide background swarm.
#[derive(Debug)]
pub struct AmbientField {
    config: AmbientConfig,
    particles: ParticleSet,
    template: ParticleTemplate,
    viewport: Viewport,
    pointer: PointerSubscription,
    /// Last pointer position in page coordinates. `None` is "far away".
    pointer_at: Option<Vec2>,
    spawn_timer: IntervalTimer,
    rng: EffectRng,
}

impl AmbientField {
    /// Builds the field and seeds its initial population.
    ///
    /// # Errors
    ///
    /// Returns an error if `config` does not validate.
    pub fn new(
        config: AmbientConfig,
        viewport: Viewport,
        pointer: PointerSubscription,
        mut rng: EffectRng,
    ) -> EffectsResult<Self> {
        config.validate()?;

        let template = ParticleTemplate {
            size_min: config.size_min,
            size_max: config.size_max,
            opacity_min: config.opacity_min,
            opacity_max: config.opacity_max,
            speed: config.drift_speed,
            drift: Vec2::ZERO,
            shapes: ShapeMode::Assorted,
            star_scale: 1.0,
            spin: config.rotation_speed,
            rests: true,
        };

        let mut particles = ParticleSet::new(config.ceiling, DecayRule::PERSISTENT);
        particles.emit(
            &RandomField,
            &template,
            &viewport.screen(),
            config.initial_population,
            1.0,
            &mut rng,
        );

        tracing::debug!(
            population = particles.len(),
            width = viewport.width,
            height = viewport.height,
            "ambient field seeded"
        );

        Ok(Self {
            spawn_timer: IntervalTimer::from_millis(config.spawn_interval_ms)?,
            config,
            particles,
            template,
            viewport,
            pointer,
            pointer_at: None,
            rng,
        })
    }

    /// Live particles, oldest first.
    #[must_use]
    pub fn particles(&self) -> &[Particle] {
        self.particles.particles()
    }

    /// Renderer snapshot.
    pub fn instances(&mut self) -> &[ParticleInstance] {
        self.particles.instances()
    }

    /// Current viewport.
    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Updates the cached viewport after a window resize or a layout change
    /// that altered the document height.
    pub fn resize(&mut self, viewport: Viewport) {
        tracing::trace!(
            width = viewport.width,
            height = viewport.height,
            document_height = viewport.document_height,
            "ambient viewport resized"
        );
        self.viewport = viewport;
    }

    /// Last known pointer position (page coordinates).
    #[must_use]
    pub fn pointer(&self) -> Option<Vec2> {
        self.pointer_at
    }

    /// Moves every particle by one frame.
    pub fn advance(&mut self) {
        let config = &self.config;
        let pointer = self.pointer_at;
        let width = self.viewport.width;
        let height = self.viewport.document_height;

        self.particles.step_with(|p| {
            // Position integrates last frame's velocity; forces apply to the next.
            let before = p.position;
            p.position += p.velocity;
            p.rotation += p.rotation_speed;

            let repelled = pointer.and_then(|pointer| {
                let away = before - pointer;
                let distance = away.length();
                (distance > 0.0 && distance < config.repulsion_radius).then(|| {
                    let force = (config.repulsion_radius - distance) / config.repulsion_radius;
                    Vec2::from_angle(away.angle()) * (force * config.repulsion_strength)
                })
            });

            match (repelled, p.base_velocity) {
                (Some(impulse), _) => p.velocity += impulse,
                (None, Some(base)) => p.velocity += (base - p.velocity) * config.relaxation,
                (None, None) => {}
            }

            p.velocity *= config.damping;

            p.position.x = wrap(p.position.x, width, config.wrap_margin);
            p.position.y = wrap(p.position.y, height, config.wrap_margin);
        });
    }

    fn spawn_at_edge(&mut self) {
        if self.particles.len() >= self.config.ceiling {
            return;
        }
        let policy = EdgeOfBox {
            margin: self.config.wrap_margin,
        };
        self.particles.emit(
            &policy,
            &self.template,
            &self.viewport.screen(),
            1,
            1.0,
            &mut self.rng,
        );
    }
}

impl Animated for AmbientField {
    fn on_frame(&mut self, frame: &FrameContext) {
        for event in self.pointer.drain() {
            match event {
                PointerEvent::Moved(position) => self.pointer_at = Some(position.page),
                PointerEvent::Left => self.pointer_at = None,
                PointerEvent::Released => {}
            }
        }

        self.advance();

        for _ in 0..self.spawn_timer.poll(frame.now) {
            self.spawn_at_edge();
        }
    }
}

/// Leaving past `-margin` re-enters at `extent + margin` and vice versa.
fn wrap(value: f32, extent: f32, margin: f32) -> f32 {
    if value < -margin {
        extent + margin
    } else if value > extent + margin {
        -margin
    } else {
        value
    }
}
