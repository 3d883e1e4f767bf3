//! Bounded, self-pruning particle storage.

use folio_core::{EffectRng, Rect};

use super::{DecayRule, Particle, ParticleInstance, ParticleTemplate, SpawnPolicy};

/// A capped population of decaying particles.
///
/// Invariants after every public call:
/// - `len() <= ceiling()`
/// - no particle has opacity ≤ 0 after [`ParticleSet::step`]
/// - particles are ordered oldest first
#[derive(Debug, Clone)]
pub struct ParticleSet {
    particles: Vec<Particle>,
    ceiling: usize,
    decay: DecayRule,
    next_id: u64,
    /// Reused by `instances` so renderer uploads do not allocate.
    instances: Vec<ParticleInstance>,
}

impl ParticleSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new(ceiling: usize, decay: DecayRule) -> Self {
        Self {
            particles: Vec::with_capacity(ceiling),
            ceiling,
            decay,
            next_id: 0,
            instances: Vec::with_capacity(ceiling),
        }
    }

    /// Live particles, oldest first.
    #[must_use]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Mutable access for effects that apply their own forces.
    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    /// Number of live particles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// Returns true if no particle is alive.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Population cap.
    #[must_use]
    pub fn ceiling(&self) -> usize {
        self.ceiling
    }

    /// Changes the cap, dropping the oldest particles if it shrank.
    pub fn set_ceiling(&mut self, ceiling: usize) {
        self.ceiling = ceiling;
        self.truncate_oldest();
    }

    /// Fade rule.
    #[must_use]
    pub fn decay(&self) -> DecayRule {
        self.decay
    }

    /// Appends particles, keeping only the newest `ceiling`.
    ///
    /// Returns how many of the appended particles survived the cap.
    pub fn extend(&mut self, particles: impl IntoIterator<Item = Particle>) -> usize {
        let before = self.particles.len();
        for mut particle in particles {
            particle.id = self.next_id;
            self.next_id += 1;
            self.particles.push(particle);
        }
        let added = self.particles.len() - before;
        let dropped = self.truncate_oldest();
        added.saturating_sub(dropped.saturating_sub(before))
    }

    /// Spawns `count` particles from `policy` and `template`.
    pub fn emit<P: SpawnPolicy + ?Sized>(
        &mut self,
        policy: &P,
        template: &ParticleTemplate,
        bounds: &Rect,
        count: usize,
        intensity: f32,
        rng: &mut EffectRng,
    ) -> usize {
        // Anything beyond the cap would be discarded immediately.
        let count = count.min(self.ceiling);
        let spawned: Vec<Particle> = (0..count)
            .map(|_| template.instantiate(policy.origin(bounds, rng), intensity, rng))
            .collect();
        self.extend(spawned)
    }

    /// One frame of free flight: move, spin, fade, shrink, prune.
    ///
    /// Returns how many particles were removed.
    pub fn step(&mut self) -> usize {
        self.step_with(|p| {
            p.position += p.velocity;
            p.rotation += p.rotation_speed;
        })
    }

    /// One frame with caller-supplied motion, then fade, shrink and prune.
    ///
    /// Returns how many particles were removed.
    pub fn step_with(&mut self, mut motion: impl FnMut(&mut Particle)) -> usize {
        let decay = self.decay;
        for particle in &mut self.particles {
            motion(particle);
            particle.opacity -= decay.opacity_step;
            particle.size *= decay.size_factor;
        }

        let before = self.particles.len();
        self.particles.retain(|p| p.opacity > 0.0);
        before - self.particles.len()
    }

    /// Drops every particle.
    pub fn clear(&mut self) {
        self.particles.clear();
    }

    /// Renderer snapshot of the live particles.
    pub fn instances(&mut self) -> &[ParticleInstance] {
        self.instances.clear();
        self.instances
            .extend(self.particles.iter().map(ParticleInstance::from));
        &self.instances
    }

    /// Renderer snapshot as raw bytes for upload.
    pub fn instance_bytes(&mut self) -> &[u8] {
        bytemuck::cast_slice(self.instances())
    }

    /// Drops the oldest particles above the cap. Returns how many went.
    fn truncate_oldest(&mut self) -> usize {
        let excess = self.particles.len().saturating_sub(self.ceiling);
        if excess > 0 {
            self.particles.drain(..excess);
        }
        excess
    }
}
