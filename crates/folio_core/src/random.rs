//! Seeded randomness for particle spawning.
//!
//! Effects never call a global RNG. Each component owns an `EffectRng`, so a
//! test can seed it and replay the exact same swarm.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::math::Edge;

/// Per-component random source.
#[derive(Debug, Clone)]
pub struct EffectRng {
    inner: ChaCha8Rng,
}

impl EffectRng {
    /// Deterministic generator for tests and replays.
    #[must_use]
    pub fn from_seed(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Generator seeded from OS entropy.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self {
            inner: ChaCha8Rng::from_entropy(),
        }
    }

    /// Uniform value in `[0, 1)`.
    pub fn unit(&mut self) -> f32 {
        self.inner.gen::<f32>()
    }

    /// Uniform value in `[-half_range, half_range)`.
    pub fn signed(&mut self, half_range: f32) -> f32 {
        (self.unit() - 0.5) * 2.0 * half_range
    }

    /// Uniform value in `[min, max)`. Returns `min` for an empty range.
    pub fn range(&mut self, min: f32, max: f32) -> f32 {
        if max <= min {
            return min;
        }
        min + self.unit() * (max - min)
    }

    /// Returns true with probability `p`.
    pub fn chance(&mut self, p: f32) -> bool {
        self.unit() < p
    }

    /// Picks one element. Returns `None` for an empty slice.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        items.get(self.inner.gen_range(0..items.len()))
    }

    /// Picks one of the four rectangle edges uniformly.
    pub fn edge(&mut self) -> Edge {
        Edge::ALL[self.inner.gen_range(0..Edge::ALL.len())]
    }

    /// Uniform angle in `[0, 2π)`.
    pub fn angle(&mut self) -> f32 {
        self.unit() * std::f32::consts::TAU
    }
}

impl Default for EffectRng {
    fn default() -> Self {
        Self::from_entropy()
    }
}
