//! Per-character spring text.
//!
//! Every character is its own damped rigid body. Pointer moves near a
//! character kick its angular velocity and lift it toward the viewer; every
//! frame the springs pull it back to an exact rest pose. While the whole
//! block is hovered, dots rise out of it.

use folio_core::{
    Animated, EffectRng, FrameContext, IntervalTimer, PointerEvent, PointerSubscription, Rect,
    Vec2,
};

use crate::config::SwingTextConfig;
use crate::error::EffectsResult;
use crate::particle::{
    DecayRule, Particle, ParticleInstance, ParticleSet, ParticleTemplate, RandomField,
};
use crate::spring::{Settle, SpringAxis, SpringParams};

/// Rendered in place of a plain space so the host keeps its width.
pub const NO_BREAK_SPACE: char = '\u{00A0}';

/// One character and its spring state.
#[derive(Debug, Clone, PartialEq)]
pub struct Glyph {
    ch: char,
    rect: Rect,
    /// Rotation about the horizontal axis.
    pub pitch: SpringAxis,
    /// Rotation about the vertical axis.
    pub yaw: SpringAxis,
    /// Rotation about the view axis.
    pub roll: SpringAxis,
    lift: Settle,
    depth: Settle,
    scale: Settle,
}

impl Glyph {
    fn new(ch: char) -> Self {
        Self {
            ch,
            rect: Rect::ZERO,
            pitch: SpringAxis::default(),
            yaw: SpringAxis::default(),
            roll: SpringAxis::default(),
            lift: Settle::at_rest(0.0),
            depth: Settle::at_rest(0.0),
            scale: Settle::at_rest(1.0),
        }
    }

    /// Source character.
    #[must_use]
    pub fn char(&self) -> char {
        self.ch
    }

    /// Character to render.
    #[must_use]
    pub fn display_char(&self) -> char {
        if self.ch == ' ' {
            NO_BREAK_SPACE
        } else {
            self.ch
        }
    }

    /// Client rect from the last layout.
    #[must_use]
    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Vertical translation (px, negative is up).
    #[must_use]
    pub fn lift(&self) -> f32 {
        self.lift.value()
    }

    /// Translation toward the viewer (px).
    #[must_use]
    pub fn depth(&self) -> f32 {
        self.depth.value()
    }

    /// Uniform scale.
    #[must_use]
    pub fn scale(&self) -> f32 {
        self.scale.value()
    }

    /// Returns true when every axis and offset is exactly at rest.
    #[must_use]
    pub fn is_at_rest(&self) -> bool {
        self.pitch.is_at_rest()
            && self.yaw.is_at_rest()
            && self.roll.is_at_rest()
            && self.lift.is_at_rest()
            && self.depth.is_at_rest()
            && self.scale.is_at_rest()
    }
}

/// A line of spring-loaded characters.
#[derive(Debug)]
pub struct SwingText {
    config: SwingTextConfig,
    spring: SpringParams,
    glyphs: Vec<Glyph>,
    block: Rect,
    hovered: bool,
    particles: ParticleSet,
    template: ParticleTemplate,
    emit_timer: IntervalTimer,
    pointer: PointerSubscription,
    rng: EffectRng,
}

impl SwingText {
    /// Splits `text` into glyphs.
    ///
    /// # Errors
    ///
    /// Returns an error if `config` does not validate.
    pub fn new(
        text: &str,
        config: SwingTextConfig,
        pointer: PointerSubscription,
        rng: EffectRng,
    ) -> EffectsResult<Self> {
        config.validate()?;

        let template =
            ParticleTemplate::dots(config.size_min, config.size_max, config.opacity, config.speed)
                .with_drift(Vec2::new(0.0, -config.rise));

        Ok(Self {
            spring: SpringParams {
                strength: config.spring_strength,
                damping: config.damping,
                threshold: config.rest_threshold,
            },
            glyphs: text.chars().map(Glyph::new).collect(),
            block: Rect::ZERO,
            hovered: false,
            particles: ParticleSet::new(
                config.ceiling,
                DecayRule::new(config.opacity_decay, config.size_decay),
            ),
            template,
            emit_timer: IntervalTimer::from_millis(config.tick_ms)?,
            config,
            pointer,
            rng,
        })
    }

    /// Glyphs in text order.
    #[must_use]
    pub fn glyphs(&self) -> &[Glyph] {
        &self.glyphs
    }

    /// Assigns client rects to glyphs in order. Extra rects are ignored.
    pub fn layout(&mut self, rects: &[Rect]) {
        if rects.len() != self.glyphs.len() {
            tracing::debug!(
                glyphs = self.glyphs.len(),
                rects = rects.len(),
                "layout does not cover every glyph"
            );
        }
        for (glyph, rect) in self.glyphs.iter_mut().zip(rects) {
            glyph.rect = *rect;
        }
    }

    /// Sets the block box that hover particles spawn inside.
    pub fn set_block(&mut self, block: Rect) {
        self.block = block;
    }

    /// Pointer entered the text block.
    pub fn pointer_enter(&mut self) {
        self.hovered = true;
        self.emit_timer.disarm();
    }

    /// Pointer left the text block.
    pub fn pointer_leave(&mut self) {
        self.hovered = false;
    }

    /// Kicks every glyph whose center is within the influence radius of
    /// `client`.
    pub fn apply_pointer(&mut self, client: Vec2) {
        kick(&mut self.glyphs, &self.config, client);
    }

    /// Relaxes every glyph by one frame.
    pub fn relax(&mut self) {
        let config = &self.config;
        for glyph in &mut self.glyphs {
            glyph.pitch.relax(&self.spring, Some(config.max_pitch));
            glyph.yaw.relax(&self.spring, Some(config.max_yaw));
            glyph.roll.relax(&self.spring, None);
            glyph.lift.relax(config.settle_factor, config.rest_threshold);
            glyph.depth.relax(config.settle_factor, config.rest_threshold);
            glyph.scale.relax(config.settle_factor, config.scale_threshold);
        }
    }

    /// Returns true when every glyph is exactly at rest.
    #[must_use]
    pub fn is_at_rest(&self) -> bool {
        self.glyphs.iter().all(Glyph::is_at_rest)
    }

    /// Live block particles, oldest first.
    #[must_use]
    pub fn particles(&self) -> &[Particle] {
        self.particles.particles()
    }

    /// Renderer snapshot of the block particles.
    pub fn instances(&mut self) -> &[ParticleInstance] {
        self.particles.instances()
    }
}

impl Animated for SwingText {
    fn on_frame(&mut self, frame: &FrameContext) {
        for event in self.pointer.drain() {
            if let PointerEvent::Moved(position) = event {
                kick(&mut self.glyphs, &self.config, position.client);
            }
        }

        self.relax();

        self.particles.step();
        if self.hovered {
            let count = self.config.particles_per_tick as usize;
            for _ in 0..self.emit_timer.poll(frame.now) {
                self.particles.emit(
                    &RandomField,
                    &self.template,
                    &self.block,
                    count,
                    1.0,
                    &mut self.rng,
                );
            }
        }
    }
}

fn kick(glyphs: &mut [Glyph], config: &SwingTextConfig, client: Vec2) {
    for glyph in glyphs {
        let offset = client - glyph.rect.center();
        let distance = offset.length();
        if distance >= config.radius {
            continue;
        }

        let force = (config.radius - distance) / config.radius;
        glyph.yaw.kick(offset.x * force * config.yaw_gain);
        glyph.pitch.kick(-offset.y * force * config.pitch_gain);
        glyph.lift.set(-force * config.lift);
        glyph.depth.set(force * config.depth);
        glyph.scale.set(1.0 + force * config.scale_gain);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::{PointerBus, PointerPosition};
    use std::time::Duration;

    fn text(bus: &PointerBus, s: &str) -> SwingText {
        let mut text = SwingText::new(
            s,
            SwingTextConfig::default(),
            bus.subscribe(),
            EffectRng::from_seed(21),
        )
        .unwrap();
        let rects: Vec<Rect> = (0..s.chars().count())
            .map(|i| Rect::new(i as f32 * 20.0, 0.0, 20.0, 20.0))
            .collect();
        text.layout(&rects);
        text
    }

    fn frame_at(frame: u64) -> FrameContext {
        FrameContext {
            frame,
            now: Duration::from_millis(frame * 16),
            delta: Duration::from_millis(16),
        }
    }

    #[test]
    fn test_one_glyph_per_char() {
        let bus = PointerBus::new();
        let text = text(&bus, "hi yo");
        assert_eq!(text.glyphs().len(), 5);
        assert_eq!(text.glyphs()[2].char(), ' ');
        assert_eq!(text.glyphs()[2].display_char(), NO_BREAK_SPACE);
        assert_eq!(text.glyphs()[0].display_char(), 'h');
    }

    #[test]
    fn test_impulse_scales_with_proximity() {
        let bus = PointerBus::new();
        let mut text = text(&bus, "a");

        // Center (10, 10); pointer 50 px to the right gives force 0.5.
        text.apply_pointer(Vec2::new(60.0, 10.0));

        let glyph = &text.glyphs()[0];
        assert!((glyph.yaw.velocity - 7.5).abs() < 1e-5);
        assert_eq!(glyph.pitch.velocity, 0.0);
        assert!((glyph.lift() + 5.0).abs() < 1e-5);
        assert!((glyph.depth() - 15.0).abs() < 1e-5);
        assert!((glyph.scale() - 1.1).abs() < 1e-5);
    }

    #[test]
    fn test_pointer_outside_radius_is_ignored() {
        let bus = PointerBus::new();
        let mut text = text(&bus, "a");
        text.apply_pointer(Vec2::new(10.0, 150.0));
        assert!(text.is_at_rest());
    }

    #[test]
    fn test_pointer_above_tips_glyph_back() {
        let bus = PointerBus::new();
        let mut text = text(&bus, "a");
        text.apply_pointer(Vec2::new(10.0, -40.0));
        assert!(text.glyphs()[0].pitch.velocity > 0.0);
    }

    #[test]
    fn test_moves_arrive_through_bus() {
        let bus = PointerBus::new();
        let mut text = text(&bus, "ab");
        bus.publish(PointerEvent::Moved(PointerPosition::from_client(
            Vec2::new(20.0, 10.0),
            Vec2::new(0.0, 900.0),
        )));
        text.on_frame(&frame_at(1));
        assert!(!text.is_at_rest());
    }

    #[test]
    fn test_angles_stay_clamped() {
        let bus = PointerBus::new();
        let mut text = text(&bus, "a");
        for _ in 0..50 {
            text.apply_pointer(Vec2::new(11.0, 11.0));
            text.apply_pointer(Vec2::new(90.0, -60.0));
            text.relax();
            let glyph = &text.glyphs()[0];
            assert!(glyph.pitch.angle.abs() <= 30.0);
            assert!(glyph.yaw.angle.abs() <= 45.0);
        }
    }

    #[test]
    fn test_settles_exactly() {
        let bus = PointerBus::new();
        let mut text = text(&bus, "spring");
        for x in (0..120).step_by(7) {
            text.apply_pointer(Vec2::new(x as f32, 25.0));
        }
        assert!(!text.is_at_rest());

        let mut frames = 0;
        while !text.is_at_rest() {
            text.on_frame(&frame_at(frames));
            frames += 1;
            assert!(frames < 2_000, "text never settled");
        }
        for glyph in text.glyphs() {
            assert_eq!(glyph.scale(), 1.0);
            assert_eq!(glyph.lift(), 0.0);
        }
    }

    #[test]
    fn test_block_particles_only_while_hovered() {
        let bus = PointerBus::new();
        let mut text = text(&bus, "block");
        text.set_block(Rect::new(0.0, 0.0, 100.0, 20.0));

        for frame in 0..30 {
            text.on_frame(&frame_at(frame));
        }
        assert!(text.particles().is_empty());

        text.pointer_enter();
        for frame in 30..300 {
            text.on_frame(&frame_at(frame));
            assert!(text.particles().len() <= 40);
        }
        assert!(!text.particles().is_empty());
        assert!(text.particles().iter().all(|p| p.velocity.y < 1.5 - 1.0 + 1e-4));
    }
}
