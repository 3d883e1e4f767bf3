//! # Draggable 3D Objects
//!
//! Pointer-rotatable hero objects: a hexagonal card and an image cube.
//!
//! ## State machine
//!
//! ```text
//!            Enter                 Down / TouchStart(1)
//!   Idle ─────────────► Hovering ─────────────────────► Dragging
//!    ▲                    ▲  │                             │
//!    │        Leave       │  │ Up / TouchEnd / Released    │
//!    └────────────────────┼──┴─────────────────────────────┘
//!                         └──── Up (pointer still over) ───┘
//! ```
//!
//! Leave always ends in Idle, whether or not a drag was in progress. A
//! release anywhere in the window arrives through the pointer bus, so a drag
//! can never outlive the button press that started it.

use folio_core::{
    Animated, EffectRng, FrameContext, IntervalTimer, PointerEvent, PointerSubscription, Rect,
    Vec2,
};

use crate::error::EffectsResult;
use crate::particle::{
    DecayRule, Particle, ParticleInstance, ParticleSet, ParticleTemplate, RadialBurst,
};

/// Which object is being rotated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraggableKind {
    /// Breathing hexagonal card that sheds particles while touched.
    Hexagon,
    /// Image cube that spins slowly while hovered.
    Cube,
}

/// Interaction state of a draggable object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionState {
    /// Pointer elsewhere.
    Idle,
    /// Pointer over the object, not pressed.
    Hovering,
    /// Pressed and following the pointer.
    Dragging,
}

/// Element-local pointer and touch input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerInput {
    /// Pointer entered the element.
    Enter,
    /// Pointer left the element.
    Leave,
    /// Primary button pressed at a client position.
    Down(Vec2),
    /// Pointer moved to a client position.
    Move(Vec2),
    /// Primary button released over the element.
    Up,
    /// Touches began.
    TouchStart {
        /// Fingers on the element.
        touches: usize,
        /// Client position of the first touch.
        position: Vec2,
    },
    /// Touches moved.
    TouchMove {
        /// Fingers on the element.
        touches: usize,
        /// Client position of the first touch.
        position: Vec2,
    },
    /// All touches lifted.
    TouchEnd,
}

/// Pitch and yaw in degrees.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Orientation {
    /// Rotation about the horizontal axis.
    pub pitch: f32,
    /// Rotation about the vertical axis.
    pub yaw: f32,
}

impl Orientation {
    /// No rotation.
    pub const ZERO: Self = Self {
        pitch: 0.0,
        yaw: 0.0,
    };

    fn scale(&mut self, factor: f32) {
        self.pitch *= factor;
        self.yaw *= factor;
    }

    fn add(&mut self, other: Self) {
        self.pitch += other.pitch;
        self.yaw += other.yaw;
    }

    fn snap(&mut self, epsilon: f32) {
        self.pitch = snap(self.pitch, epsilon);
        self.yaw = snap(self.yaw, epsilon);
    }
}

/// What the host applies to the element this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObjectTransform {
    /// Rotation about the horizontal axis (deg).
    pub pitch: f32,
    /// Rotation about the vertical axis (deg).
    pub yaw: f32,
    /// Uniform scale.
    pub scale: f32,
}

/// Pointer delta to rotation.
const DRAG_GAIN: f32 = 0.5;
/// Pointer delta to release momentum, per axis.
const MOMENTUM_GAIN: Orientation = Orientation {
    pitch: 0.3,
    yaw: 0.5,
};

const BREATH_STEP: f32 = 0.02;
const BREATH_DEPTH: f32 = 0.03;
const ENGAGED_SCALE: f32 = 1.02;
const SWING_DECAY: f32 = 0.9;
const SWING_EPSILON: f32 = 0.01;

/// Hexagon particles live in percent space around the card center.
const PERCENT_SPACE: Rect = Rect::sized(100.0, 100.0);
const HEXAGON_BURST: RadialBurst = RadialBurst {
    min_radius: 25.0,
    max_radius: 55.0,
};
const HEXAGON_PARTICLES: ParticleTemplate =
    ParticleTemplate::dots(4.0, 12.0, 0.9, 1.5).with_drift(Vec2::new(0.0, -0.8));

/// One emission mode of the hexagon.
#[derive(Debug, Clone, Copy)]
struct Emission {
    count: usize,
    period_ms: u64,
    ceiling: usize,
}

const HOVER_EMISSION: Emission = Emission {
    count: 5,
    period_ms: 80,
    ceiling: 50,
};
const DRAG_EMISSION: Emission = Emission {
    count: 8,
    period_ms: 50,
    ceiling: 80,
};

/// Per-kind momentum constants.
#[derive(Debug, Clone, Copy)]
struct Motion {
    idle_velocity_decay: f32,
    idle_orientation_decay: f32,
    coast_decay: f32,
    auto_yaw: f32,
    epsilon: f32,
}

impl DraggableKind {
    const fn motion(self) -> Motion {
        match self {
            Self::Hexagon => Motion {
                idle_velocity_decay: 0.9,
                idle_orientation_decay: 0.92,
                coast_decay: 0.92,
                auto_yaw: 0.0,
                epsilon: 0.1,
            },
            Self::Cube => Motion {
                idle_velocity_decay: 0.9,
                idle_orientation_decay: 0.9,
                coast_decay: 0.95,
                auto_yaw: 0.5,
                epsilon: 0.5,
            },
        }
    }
}

#[derive(Debug)]
struct Sparks {
    particles: ParticleSet,
    hover_timer: IntervalTimer,
    drag_timer: IntervalTimer,
    rng: EffectRng,
}

impl Sparks {
    fn new(rng: EffectRng) -> EffectsResult<Self> {
        Ok(Self {
            particles: ParticleSet::new(DRAG_EMISSION.ceiling, DecayRule::new(0.02, 0.98)),
            hover_timer: IntervalTimer::from_millis(HOVER_EMISSION.period_ms)?,
            drag_timer: IntervalTimer::from_millis(DRAG_EMISSION.period_ms)?,
            rng,
        })
    }

    fn rephase(&mut self) {
        self.hover_timer.disarm();
        self.drag_timer.disarm();
    }

    fn on_frame(&mut self, state: InteractionState, now: std::time::Duration) {
        self.particles.step();

        let (timer, emission) = match state {
            InteractionState::Idle => return,
            InteractionState::Hovering => (&mut self.hover_timer, HOVER_EMISSION),
            InteractionState::Dragging => (&mut self.drag_timer, DRAG_EMISSION),
        };

        for _ in 0..timer.poll(now) {
            self.particles.set_ceiling(emission.ceiling);
            self.particles.emit(
                &HEXAGON_BURST,
                &HEXAGON_PARTICLES,
                &PERCENT_SPACE,
                emission.count,
                1.0,
                &mut self.rng,
            );
        }
    }
}

/// A pointer-rotatable object with momentum.
#[derive(Debug)]
pub struct DraggableObject {
    kind: DraggableKind,
    motion: Motion,
    hovering: bool,
    dragging: bool,
    last_pointer: Vec2,
    orientation: Orientation,
    velocity: Orientation,
    breath_phase: f32,
    swing: Vec2,
    pointer: PointerSubscription,
    sparks: Option<Sparks>,
}

impl DraggableObject {
    /// Creates an object at rest.
    ///
    /// `pointer` delivers window-level releases so a drag ends even when the
    /// button comes up outside the element.
    ///
    /// # Errors
    ///
    /// Returns an error if the particle timers cannot be built.
    pub fn new(
        kind: DraggableKind,
        pointer: PointerSubscription,
        rng: EffectRng,
    ) -> EffectsResult<Self> {
        let sparks = match kind {
            DraggableKind::Hexagon => Some(Sparks::new(rng)?),
            DraggableKind::Cube => None,
        };

        Ok(Self {
            kind,
            motion: kind.motion(),
            hovering: false,
            dragging: false,
            last_pointer: Vec2::ZERO,
            orientation: Orientation::ZERO,
            velocity: Orientation::ZERO,
            breath_phase: 0.0,
            swing: Vec2::ZERO,
            pointer,
            sparks,
        })
    }

    /// Object variant.
    #[must_use]
    pub fn kind(&self) -> DraggableKind {
        self.kind
    }

    /// Current interaction state.
    #[must_use]
    pub fn state(&self) -> InteractionState {
        if self.dragging {
            InteractionState::Dragging
        } else if self.hovering {
            InteractionState::Hovering
        } else {
            InteractionState::Idle
        }
    }

    /// Rotation without the swing offset.
    #[must_use]
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Momentum carried into the next frame.
    #[must_use]
    pub fn velocity(&self) -> Orientation {
        self.velocity
    }

    /// Rotation and scale to render.
    #[must_use]
    pub fn transform(&self) -> ObjectTransform {
        ObjectTransform {
            pitch: self.orientation.pitch + self.swing.x,
            yaw: self.orientation.yaw + self.swing.y,
            scale: self.scale(),
        }
    }

    /// Live particles (percent space), oldest first. Empty for the cube.
    #[must_use]
    pub fn particles(&self) -> &[Particle] {
        match self.sparks.as_ref() {
            Some(sparks) => sparks.particles.particles(),
            None => &[],
        }
    }

    /// Renderer snapshot. Empty for the cube.
    pub fn instances(&mut self) -> &[ParticleInstance] {
        match self.sparks.as_mut() {
            Some(sparks) => sparks.particles.instances(),
            None => &[],
        }
    }

    /// Applies element-local input.
    pub fn input(&mut self, input: PointerInput) {
        let before = self.state();

        match input {
            PointerInput::Enter => self.hovering = true,
            PointerInput::Leave => {
                self.hovering = false;
                self.dragging = false;
            }
            PointerInput::Down(position) => self.begin_drag(position),
            PointerInput::Move(position) => self.drag_to(position),
            PointerInput::Up => self.dragging = false,
            PointerInput::TouchStart { touches, position } => {
                if touches == 1 {
                    if self.kind == DraggableKind::Cube {
                        self.hovering = true;
                    }
                    self.begin_drag(position);
                }
            }
            PointerInput::TouchMove { touches, position } => {
                if touches == 1 {
                    self.drag_to(position);
                }
            }
            PointerInput::TouchEnd => {
                if self.kind == DraggableKind::Cube {
                    self.hovering = false;
                }
                self.dragging = false;
            }
        }

        let after = self.state();
        if before != after {
            tracing::trace!(kind = ?self.kind, from = ?before, to = ?after, "interaction changed");
            if let Some(sparks) = self.sparks.as_mut() {
                sparks.rephase();
            }
        }
    }

    /// Returns true when orientation and momentum are exactly zero.
    #[must_use]
    pub fn is_at_rest(&self) -> bool {
        self.orientation == Orientation::ZERO && self.velocity == Orientation::ZERO
    }

    fn begin_drag(&mut self, position: Vec2) {
        // Window releases queued before this press end an earlier gesture.
        self.pointer.drain().for_each(drop);
        self.dragging = true;
        self.last_pointer = position;
        self.velocity = Orientation::ZERO;
    }

    fn drag_to(&mut self, position: Vec2) {
        if !self.dragging {
            return;
        }
        let delta = position - self.last_pointer;
        self.orientation.pitch += delta.y * DRAG_GAIN;
        self.orientation.yaw += delta.x * DRAG_GAIN;
        self.velocity = Orientation {
            pitch: delta.y * MOMENTUM_GAIN.pitch,
            yaw: delta.x * MOMENTUM_GAIN.yaw,
        };
        self.last_pointer = position;
    }

    fn release(&mut self) {
        if self.dragging {
            tracing::trace!(kind = ?self.kind, "drag released outside element");
            self.input(PointerInput::Up);
        }
    }

    fn scale(&self) -> f32 {
        match self.kind {
            DraggableKind::Cube => 1.0,
            DraggableKind::Hexagon if self.state() == InteractionState::Idle => {
                1.0 + self.breath_phase.sin() * BREATH_DEPTH
            }
            DraggableKind::Hexagon => ENGAGED_SCALE,
        }
    }

    fn advance(&mut self) {
        let motion = self.motion;
        match self.state() {
            InteractionState::Idle => {
                self.velocity.scale(motion.idle_velocity_decay);
                self.orientation.add(self.velocity);
                self.orientation.scale(motion.idle_orientation_decay);
                self.orientation.snap(motion.epsilon);
                self.velocity.snap(motion.epsilon);
            }
            InteractionState::Hovering => {
                self.orientation.yaw += motion.auto_yaw;
                self.velocity.scale(motion.coast_decay);
                self.orientation.add(self.velocity);
            }
            InteractionState::Dragging => {}
        }

        if self.kind == DraggableKind::Hexagon {
            self.breath_phase += BREATH_STEP;
            if self.state() == InteractionState::Idle {
                self.swing = self.swing * SWING_DECAY;
                self.swing.x = snap(self.swing.x, SWING_EPSILON);
                self.swing.y = snap(self.swing.y, SWING_EPSILON);
            } else {
                let phase = self.breath_phase;
                self.swing = Vec2::new((phase * 3.0).sin() * 2.0, (phase * 2.5).cos() * 2.0);
            }
        }
    }
}

impl Animated for DraggableObject {
    fn on_frame(&mut self, frame: &FrameContext) {
        let released = self
            .pointer
            .drain()
            .fold(false, |released, event| {
                released || matches!(event, PointerEvent::Released | PointerEvent::Left)
            });
        if released {
            self.release();
        }

        self.advance();

        let state = self.state();
        if let Some(sparks) = self.sparks.as_mut() {
            sparks.on_frame(state, frame.now);
        }
    }
}

fn snap(value: f32, epsilon: f32) -> f32 {
    if value.abs() < epsilon {
        0.0
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::PointerBus;
    use std::time::Duration;

    fn frame_at(frame: u64) -> FrameContext {
        FrameContext {
            frame,
            now: Duration::from_millis(frame * 16),
            delta: Duration::from_millis(16),
        }
    }

    fn object(bus: &PointerBus, kind: DraggableKind) -> DraggableObject {
        DraggableObject::new(kind, bus.subscribe(), EffectRng::from_seed(5)).unwrap()
    }

    #[test]
    fn test_drag_rotates_and_records_momentum() {
        let bus = PointerBus::new();
        let mut hexagon = object(&bus, DraggableKind::Hexagon);

        hexagon.input(PointerInput::Enter);
        hexagon.input(PointerInput::Down(Vec2::new(100.0, 100.0)));
        hexagon.input(PointerInput::Move(Vec2::new(110.0, 104.0)));

        assert_eq!(hexagon.state(), InteractionState::Dragging);
        assert_eq!(hexagon.orientation(), Orientation { pitch: 2.0, yaw: 5.0 });
        let v = hexagon.velocity();
        assert!((v.pitch - 1.2).abs() < 1e-5);
        assert!((v.yaw - 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_move_without_press_does_not_rotate() {
        let bus = PointerBus::new();
        let mut cube = object(&bus, DraggableKind::Cube);
        cube.input(PointerInput::Enter);
        cube.input(PointerInput::Move(Vec2::new(50.0, 50.0)));
        assert_eq!(cube.orientation(), Orientation::ZERO);
    }

    #[test]
    fn test_down_clears_momentum() {
        let bus = PointerBus::new();
        let mut cube = object(&bus, DraggableKind::Cube);
        cube.input(PointerInput::Down(Vec2::ZERO));
        cube.input(PointerInput::Move(Vec2::new(20.0, 0.0)));
        cube.input(PointerInput::Up);
        cube.input(PointerInput::Down(Vec2::new(20.0, 0.0)));
        assert_eq!(cube.velocity(), Orientation::ZERO);
    }

    #[test]
    fn test_leave_ends_drag() {
        let bus = PointerBus::new();
        let mut hexagon = object(&bus, DraggableKind::Hexagon);
        hexagon.input(PointerInput::Enter);
        hexagon.input(PointerInput::Down(Vec2::ZERO));
        hexagon.input(PointerInput::Move(Vec2::new(30.0, 30.0)));
        hexagon.input(PointerInput::Leave);
        assert_eq!(hexagon.state(), InteractionState::Idle);
    }

    #[test]
    fn test_window_release_ends_drag() {
        let bus = PointerBus::new();
        let mut cube = object(&bus, DraggableKind::Cube);
        cube.input(PointerInput::Enter);
        cube.input(PointerInput::Down(Vec2::ZERO));

        bus.publish(PointerEvent::Released);
        cube.on_frame(&frame_at(1));

        assert_eq!(cube.state(), InteractionState::Hovering);
    }

    #[test]
    fn test_press_after_queued_release_keeps_dragging() {
        let bus = PointerBus::new();
        for kind in [DraggableKind::Hexagon, DraggableKind::Cube] {
            let mut target = object(&bus, kind);
            target.input(PointerInput::Enter);
            target.input(PointerInput::Down(Vec2::ZERO));

            // Release and re-press land between two frames.
            bus.publish(PointerEvent::Released);
            target.input(PointerInput::Down(Vec2::new(5.0, 5.0)));
            target.on_frame(&frame_at(1));
            assert_eq!(target.state(), InteractionState::Dragging, "{kind:?}");

            bus.publish(PointerEvent::Left);
            target.input(PointerInput::TouchStart {
                touches: 1,
                position: Vec2::new(8.0, 8.0),
            });
            target.on_frame(&frame_at(2));
            assert_eq!(target.state(), InteractionState::Dragging, "{kind:?}");
        }
    }

    #[test]
    fn test_multi_touch_is_ignored() {
        let bus = PointerBus::new();
        let mut cube = object(&bus, DraggableKind::Cube);
        cube.input(PointerInput::TouchStart {
            touches: 2,
            position: Vec2::ZERO,
        });
        assert_eq!(cube.state(), InteractionState::Idle);

        cube.input(PointerInput::TouchStart {
            touches: 1,
            position: Vec2::ZERO,
        });
        assert_eq!(cube.state(), InteractionState::Dragging);
        cube.input(PointerInput::TouchEnd);
        assert_eq!(cube.state(), InteractionState::Idle);
    }

    #[test]
    fn test_cube_spins_while_hovered() {
        let bus = PointerBus::new();
        let mut cube = object(&bus, DraggableKind::Cube);
        cube.input(PointerInput::Enter);
        for frame in 1..=10 {
            cube.on_frame(&frame_at(frame));
        }
        assert!((cube.orientation().yaw - 5.0).abs() < 1e-4);
        assert!(cube.particles().is_empty());
    }

    #[test]
    fn test_idle_returns_to_exact_rest() {
        let bus = PointerBus::new();
        for kind in [DraggableKind::Hexagon, DraggableKind::Cube] {
            let mut object = object(&bus, kind);
            object.input(PointerInput::Down(Vec2::ZERO));
            object.input(PointerInput::Move(Vec2::new(200.0, -120.0)));
            object.input(PointerInput::Up);

            let mut frames = 0;
            while !object.is_at_rest() {
                object.on_frame(&frame_at(frames));
                frames += 1;
                assert!(frames < 1_000, "{kind:?} never settled");
            }
        }
    }

    #[test]
    fn test_hexagon_sheds_particles_while_dragged() {
        let bus = PointerBus::new();
        let mut hexagon = object(&bus, DraggableKind::Hexagon);
        hexagon.input(PointerInput::Enter);
        hexagon.input(PointerInput::Down(Vec2::ZERO));

        for frame in 0..120 {
            hexagon.on_frame(&frame_at(frame));
            assert!(hexagon.particles().len() <= DRAG_EMISSION.ceiling);
        }
        assert!(!hexagon.particles().is_empty());
        assert_eq!(hexagon.transform().scale, ENGAGED_SCALE);

        hexagon.input(PointerInput::Leave);
        for frame in 120..200 {
            hexagon.on_frame(&frame_at(frame));
        }
        assert!(hexagon.particles().is_empty());
    }
}
