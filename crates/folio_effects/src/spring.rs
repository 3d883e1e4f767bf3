//! Damped springs that come to an exact stop.
//!
//! Plain exponential decay approaches rest forever and leaves sub-pixel
//! jitter in the transform. Everything here snaps to the rest value once it
//! is close enough, so `is_at_rest` eventually becomes true and stays true.

/// One angular degree of freedom pulled back toward zero.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SpringAxis {
    /// Deflection (deg).
    pub angle: f32,
    /// Angular velocity (deg/frame).
    pub velocity: f32,
}

/// Spring constants shared by every axis of a glyph.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringParams {
    /// Restoring acceleration per degree of deflection.
    pub strength: f32,
    /// Velocity multiplier per frame.
    pub damping: f32,
    /// Angle and velocity both below this snap to zero.
    pub threshold: f32,
}

impl SpringAxis {
    /// Adds an angular impulse.
    pub fn kick(&mut self, impulse: f32) {
        self.velocity += impulse;
    }

    /// Advances one frame. `limit` clamps the angle to ±limit.
    pub fn relax(&mut self, params: &SpringParams, limit: Option<f32>) {
        let force = -self.angle * params.strength;
        self.velocity = (self.velocity + force) * params.damping;
        self.angle += self.velocity;

        if let Some(limit) = limit {
            self.angle = self.angle.clamp(-limit, limit);
        }

        if self.angle.abs() < params.threshold && self.velocity.abs() < params.threshold {
            self.angle = 0.0;
            self.velocity = 0.0;
        }
    }

    /// Returns true at exact rest.
    #[must_use]
    pub fn is_at_rest(&self) -> bool {
        self.angle == 0.0 && self.velocity == 0.0
    }
}

/// A value that decays geometrically toward `rest` and snaps onto it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Settle {
    value: f32,
    rest: f32,
}

impl Settle {
    /// Creates a value sitting at rest.
    #[must_use]
    pub const fn at_rest(rest: f32) -> Self {
        Self { value: rest, rest }
    }

    /// Current value.
    #[must_use]
    pub const fn value(&self) -> f32 {
        self.value
    }

    /// Sets the value immediately.
    pub fn set(&mut self, value: f32) {
        self.value = value;
    }

    /// Keeps `factor` of the offset from rest; snaps when within `threshold`.
    pub fn relax(&mut self, factor: f32, threshold: f32) {
        let offset = (self.value - self.rest) * factor;
        self.value = if offset.abs() < threshold {
            self.rest
        } else {
            self.rest + offset
        };
    }

    /// Returns true at exact rest.
    #[must_use]
    pub fn is_at_rest(&self) -> bool {
        self.value == self.rest
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PARAMS: SpringParams = SpringParams {
        strength: 0.1,
        damping: 0.9,
        threshold: 0.1,
    };

    #[test]
    fn test_spring_reaches_exact_rest() {
        let mut axis = SpringAxis {
            angle: 30.0,
            velocity: 0.0,
        };

        let mut frames = 0;
        while !axis.is_at_rest() {
            axis.relax(&PARAMS, Some(30.0));
            frames += 1;
            assert!(frames < 1_000, "spring never settled: {axis:?}");
        }

        // Rest is absorbing.
        axis.relax(&PARAMS, Some(30.0));
        assert!(axis.is_at_rest());
    }

    #[test]
    fn test_clamp_holds_angle() {
        let mut axis = SpringAxis::default();
        axis.kick(500.0);
        axis.relax(&PARAMS, Some(45.0));
        assert_eq!(axis.angle, 45.0);
    }

    #[test]
    fn test_settle_snaps() {
        let mut lift = Settle::at_rest(0.0);
        lift.set(-10.0);
        let mut frames = 0;
        while !lift.is_at_rest() {
            lift.relax(0.92, 0.1);
            frames += 1;
        }
        assert!(frames < 100);

        let mut scale = Settle::at_rest(1.0);
        scale.set(1.2);
        scale.relax(0.92, 0.01);
        assert!((scale.value() - 1.184).abs() < 1e-5);
    }
}
