//! Hover-triggered particle emitter.
//!
//! Wraps a page element. While the pointer is over it, particles leave the
//! element's edges on a fixed tick. With `intensify_on_hover` the emission
//! count and speed ramp up the longer the hover lasts.

use folio_core::{Animated, EffectRng, FrameContext, IntervalTimer, Rect};

use crate::config::HoverEmitterConfig;
use crate::error::EffectsResult;
use crate::particle::{
    DecayRule, EdgeOfBox, Particle, ParticleInstance, ParticleSet, ParticleTemplate,
};

/// Stars are drawn this much larger than the sampled size.
pub const STAR_SCALE: f32 = 1.4;

/// Particles streaming off the edges of a hovered element.
#[derive(Debug)]
pub struct HoverEmitter {
    config: HoverEmitterConfig,
    particles: ParticleSet,
    template: ParticleTemplate,
    /// Element box in its own coordinates.
    bounds: Rect,
    hovered: bool,
    intensity: f32,
    emit_timer: IntervalTimer,
    ramp_timer: IntervalTimer,
    rng: EffectRng,
}

impl HoverEmitter {
    /// Creates an emitter around an element of the given size.
    ///
    /// # Errors
    ///
    /// Returns an error if `config` does not validate.
    pub fn new(config: HoverEmitterConfig, bounds: Rect, rng: EffectRng) -> EffectsResult<Self> {
        config.validate()?;

        let template = ParticleTemplate::dots(
            config.size_min,
            config.size_max,
            config.opacity,
            config.speed,
        )
        .with_shapes(config.shape_mode, STAR_SCALE);

        Ok(Self {
            particles: ParticleSet::new(
                config.ceiling,
                DecayRule::new(config.opacity_decay, config.size_decay),
            ),
            emit_timer: IntervalTimer::from_millis(config.tick_ms)?,
            ramp_timer: IntervalTimer::from_millis(config.intensity_tick_ms)?,
            config,
            template,
            bounds,
            hovered: false,
            intensity: 1.0,
            rng,
        })
    }

    /// Pointer entered the element. Emission starts one tick later.
    pub fn pointer_enter(&mut self) {
        self.hovered = true;
        self.emit_timer.disarm();
        self.ramp_timer.disarm();
    }

    /// Pointer left the element. Emission stops and intensity drops back to
    /// baseline; live particles keep fading.
    pub fn pointer_leave(&mut self) {
        self.hovered = false;
        self.intensity = 1.0;
    }

    /// Updates the element box after layout.
    pub fn resize(&mut self, bounds: Rect) {
        self.bounds = bounds;
    }

    /// Returns true while the pointer is over the element.
    #[must_use]
    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    /// Current emission multiplier.
    #[must_use]
    pub fn intensity(&self) -> f32 {
        self.intensity
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

    fn burst_size(&self) -> usize {
        let count = (self.config.particles_per_tick as f32 * self.intensity).round();
        // Non-negative and far below usize::MAX by construction.
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let count = count.max(0.0) as usize;
        count
    }
}

impl Animated for HoverEmitter {
    fn on_frame(&mut self, frame: &FrameContext) {
        self.particles.step();

        if !self.hovered {
            return;
        }

        if self.config.intensify_on_hover {
            let ramps = self.ramp_timer.poll(frame.now);
            if ramps > 0 {
                self.intensity = (self.intensity + self.config.intensity_step * ramps as f32)
                    .min(self.config.max_intensity);
            }
        }

        let policy = EdgeOfBox::default();
        for _ in 0..self.emit_timer.poll(frame.now) {
            let count = self.burst_size();
            self.particles.emit(
                &policy,
                &self.template,
                &self.bounds,
                count,
                self.intensity,
                &mut self.rng,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn frame_at(frame: u64, ms: u64) -> FrameContext {
        FrameContext {
            frame,
            now: Duration::from_millis(ms),
            delta: Duration::from_millis(16),
        }
    }

    fn emitter(config: HoverEmitterConfig) -> HoverEmitter {
        HoverEmitter::new(config, Rect::sized(200.0, 80.0), EffectRng::from_seed(11)).unwrap()
    }

    #[test]
    fn test_no_emission_without_hover() {
        let mut emitter = emitter(HoverEmitterConfig::default());
        for i in 0..100 {
            emitter.on_frame(&frame_at(i, i * 16));
        }
        assert!(emitter.particles().is_empty());
    }

    #[test]
    fn test_first_burst_lands_on_edges() {
        let mut emitter = emitter(HoverEmitterConfig::default());
        emitter.pointer_enter();
        emitter.on_frame(&frame_at(1, 0));
        assert!(emitter.particles().is_empty());

        emitter.on_frame(&frame_at(2, 60));
        assert_eq!(emitter.particles().len(), 4);
        for p in emitter.particles() {
            let on_vertical = p.position.x == 0.0 || p.position.x == 200.0;
            let on_horizontal = p.position.y == 0.0 || p.position.y == 80.0;
            assert!(on_vertical || on_horizontal, "{p:?} is not on an edge");
        }
    }

    #[test]
    fn test_intensity_ramps_and_resets() {
        let mut emitter = emitter(HoverEmitterConfig {
            intensify_on_hover: true,
            ..HoverEmitterConfig::default()
        });
        emitter.pointer_enter();
        emitter.on_frame(&frame_at(1, 0));

        for (i, ms) in (200..=4000).step_by(200).enumerate() {
            emitter.on_frame(&frame_at(i as u64 + 2, ms));
        }
        assert_eq!(emitter.intensity(), 4.0);
        assert_eq!(emitter.burst_size(), 16);

        emitter.pointer_leave();
        assert_eq!(emitter.intensity(), 1.0);
        assert_eq!(emitter.burst_size(), 4);
    }

    #[test]
    fn test_leave_stops_emission_but_particles_fade_out() {
        let mut emitter = emitter(HoverEmitterConfig::default());
        emitter.pointer_enter();
        emitter.on_frame(&frame_at(1, 0));
        emitter.on_frame(&frame_at(2, 60));
        assert!(!emitter.particles().is_empty());

        emitter.pointer_leave();
        // 0.9 opacity at 0.025 per frame is gone in 36 frames.
        for i in 0..40 {
            emitter.on_frame(&frame_at(i + 3, 100 + i * 16));
        }
        assert!(emitter.particles().is_empty());
    }
}
