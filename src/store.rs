//! The live set of particles.
//!
//! Every frame runs `spawn → update → cull` against the same `now`:
//!
//! - [`ParticleStore::spawn`] appends `floor(spawn_rate · U)` fresh particles.
//! - [`ParticleStore::update`] derives each particle's [`Pose`] with the age
//!   fraction clamped to `[0, 1]`.
//! - [`ParticleStore::cull`] drops particles whose *unclamped* progress is
//!   past 1.
//!
//! Culling happens after drawing, so an expired particle gets one last,
//! fully transparent draw before it disappears.

use tracing::trace;

use crate::config::EffectConfig;
use crate::particle::Particle;
use crate::pose::{Motion, Pose};
use crate::random::RandomSource;

/// Largest `f32` below 1.
const MAX_UNIT: f32 = 1.0 - f32::EPSILON / 2.0;

/// Number of particles to spawn for the sample `u`.
///
/// `u` is forced into `[0, 1)`, so the result never exceeds
/// [`EffectConfig::max_spawn_per_frame`].
pub fn spawn_count(spawn_rate: f32, u: f32) -> usize {
    let u = if u.is_nan() { 0.0 } else { u.clamp(0.0, MAX_UNIT) };
    let max = if spawn_rate > 0.0 {
        spawn_rate.ceil() as usize - 1
    } else {
        0
    };
    ((spawn_rate.max(0.0) * u).floor() as usize).min(max)
}

/// Owns the live particles and their random source.
pub struct ParticleStore<R> {
    particles: Vec<Particle>,
    config: EffectConfig,
    motion: Motion,
    rng: R,
}

impl<R: RandomSource> ParticleStore<R> {
    pub fn new(config: EffectConfig, rng: R) -> Self {
        Self {
            particles: Vec::new(),
            motion: Motion::from(&config),
            config,
            rng,
        }
    }

    /// Spawn this frame's particles at `now` and return them.
    pub fn spawn(&mut self, now: f32) -> &[Particle] {
        let count = spawn_count(self.config.spawn_rate, self.rng.next_unit());
        let start = self.particles.len();

        for _ in 0..count {
            let particle = Particle::random(now, &self.config, &mut self.rng);
            self.particles.push(particle);
        }

        if count > 0 {
            trace!(count, live = self.particles.len(), "spawned particles");
        }
        &self.particles[start..]
    }

    /// Poses of every live particle at `now`, in insertion order.
    ///
    /// Pure: the store is not touched.
    pub fn update(&self, now: f32) -> impl Iterator<Item = (&Particle, Pose)> + '_ {
        let motion = self.motion;
        self.particles
            .iter()
            .map(move |particle| (particle, Pose::with_motion(particle, particle.age_fraction(now), motion)))
    }

    /// Drop every particle whose lifetime is over. Returns how many went.
    pub fn cull(&mut self, now: f32) -> usize {
        let before = self.particles.len();
        self.particles.retain(|particle| !particle.is_expired(now));
        before - self.particles.len()
    }
}

impl<R> ParticleStore<R> {
    /// Add a particle as-is.
    pub fn insert(&mut self, particle: Particle) {
        self.particles.push(particle);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Particle> {
        self.particles.iter()
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Remove every particle.
    pub fn clear(&mut self) {
        self.particles.clear();
    }

    pub fn config(&self) -> &EffectConfig {
        &self.config
    }
}

impl<'a, R> IntoIterator for &'a ParticleStore<R> {
    type Item = &'a Particle;
    type IntoIter = std::slice::Iter<'a, Particle>;

    fn into_iter(self) -> Self::IntoIter {
        self.particles.iter()
    }
}
