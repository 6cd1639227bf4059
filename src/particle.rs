//! The particle: one triangle with its own spawn time and random look.

use std::f32::consts::TAU;

use glam::{Vec2, Vec4};

use crate::config::EffectConfig;
use crate::pose::Pose;
use crate::random::RandomSource;

/// One animated triangle.
///
/// Everything that changes over a particle's life is derived from
/// `spawn_time`, `duration` and the current time; nothing here is mutated
/// after spawn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    /// Base color. `w` is the maximum opacity, before the time-based fade.
    pub color: Vec4,
    /// Rotation at birth, in radians.
    pub initial_rotation: f32,
    /// Scale reached at the end of life.
    pub initial_scale: f32,
    /// Unit heading of the outward drift.
    pub direction: Vec2,
    /// Clock reading when the particle was created.
    pub spawn_time: f32,
    /// Lifetime in seconds.
    pub duration: f32,
}

impl Particle {
    /// Roll a new particle born at `now`.
    ///
    /// Samples, in order: red, green, blue, rotation, scale, heading.
    pub fn random(now: f32, config: &EffectConfig, rng: &mut impl RandomSource) -> Self {
        let color = Vec4::new(rng.next_unit(), rng.next_unit(), rng.next_unit(), 1.0);
        let initial_rotation = rng.next_unit() * config.max_rotation;
        let initial_scale =
            config.scale_min + rng.next_unit() * (config.scale_max - config.scale_min);
        let heading = rng.next_unit() * TAU;

        Self {
            color,
            initial_rotation,
            initial_scale,
            direction: Vec2::from_angle(heading),
            spawn_time: now,
            duration: config.duration,
        }
    }

    /// Seconds since spawn.
    #[inline]
    pub fn elapsed(&self, now: f32) -> f32 {
        now - self.spawn_time
    }

    /// Unclamped `elapsed / duration`. Only the survival test uses this.
    #[inline]
    pub fn progress(&self, now: f32) -> f32 {
        self.elapsed(now) / self.duration
    }

    /// Age fraction `p` in `[0, 1]`, used for every visual parameter.
    #[inline]
    pub fn age_fraction(&self, now: f32) -> f32 {
        self.progress(now).clamp(0.0, 1.0)
    }

    /// Whether the lifetime is over. A particle exactly at its duration is
    /// still alive.
    #[inline]
    pub fn is_expired(&self, now: f32) -> bool {
        self.progress(now) > 1.0
    }

    /// Pose at `now`, with the default drift and spin.
    pub fn pose(&self, now: f32) -> Pose {
        Pose::at(self, self.age_fraction(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::SequenceRandom;
    use std::f32::consts::PI;

    fn particle(spawn_time: f32, duration: f32) -> Particle {
        Particle {
            color: Vec4::ONE,
            initial_rotation: 0.0,
            initial_scale: 1.0,
            direction: Vec2::X,
            spawn_time,
            duration,
        }
    }

    #[test]
    fn test_random_attributes_in_range() {
        let config = EffectConfig::default();
        let mut rng = SequenceRandom::new(vec![0.0, 0.25, 0.5, 0.75, 0.999, 0.9999]);

        for _ in 0..20 {
            let p = Particle::random(3.0, &config, &mut rng);
            assert!((0.0..1.0).contains(&p.color.x));
            assert!((0.0..1.0).contains(&p.color.y));
            assert!((0.0..1.0).contains(&p.color.z));
            assert_eq!(p.color.w, 1.0);
            assert!((0.0..PI).contains(&p.initial_rotation));
            assert!(p.initial_scale >= 0.03 && p.initial_scale < 0.08);
            assert!((p.direction.length() - 1.0).abs() < 1e-5);
            assert_eq!(p.spawn_time, 3.0);
            assert_eq!(p.duration, 5.0);
        }
    }

    #[test]
    fn test_random_sample_order() {
        let config = EffectConfig::default();
        let mut rng = SequenceRandom::new(vec![0.1, 0.2, 0.3, 0.5, 0.5, 0.25]);
        let p = Particle::random(0.0, &config, &mut rng);

        assert_eq!(p.color, Vec4::new(0.1, 0.2, 0.3, 1.0));
        assert!((p.initial_rotation - PI * 0.5).abs() < 1e-6);
        assert!((p.initial_scale - 0.055).abs() < 1e-6);
        // Quarter turn: straight up.
        assert!(p.direction.x.abs() < 1e-6);
        assert!((p.direction.y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_age_fraction_clamped_progress_not() {
        let p = particle(0.0, 5.0);
        assert_eq!(p.age_fraction(2.5), 0.5);
        assert_eq!(p.age_fraction(7.5), 1.0);
        assert_eq!(p.progress(7.5), 1.5);
        assert_eq!(p.age_fraction(-1.0), 0.0);
    }

    #[test]
    fn test_expiry_boundary() {
        let p = particle(0.0, 5.0);
        assert!(!p.is_expired(4.9));
        assert!(!p.is_expired(5.0));
        assert!(p.is_expired(5.01));
    }
}
