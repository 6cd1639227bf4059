//! Pose derivation: where a particle is, how big, how turned and how opaque,
//! as a pure function of its age fraction.
//!
//! With `p` the clamped age fraction:
//!
//! | Parameter   | Formula                                       | Curve      |
//! |-------------|-----------------------------------------------|------------|
//! | rotation    | `initial_rotation + 2π · turns · p`           | linear     |
//! | scale       | `initial_scale · p · (2 − p)`                 | ease-out   |
//! | translation | `direction · max_drift · p²`                  | ease-in    |
//! | alpha       | `(1 − p) · color.a`                           | linear     |
//!
//! The vertex transform is `translate · rotate · scale`. The order matters:
//! scaling and spinning happen around the particle's own origin before it is
//! pushed outward.

use std::f32::consts::TAU;

use glam::{Mat3, Vec2};

use crate::config::EffectConfig;
use crate::particle::Particle;

/// Quadratic ease-out: fast start, settles at 1.
#[inline]
pub fn ease_out(p: f32) -> f32 {
    p * (2.0 - p)
}

/// Quadratic ease-in: slow start, accelerates to 1.
#[inline]
pub fn ease_in(p: f32) -> f32 {
    p * p
}

/// Spin and drift shared by every particle of an effect.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Motion {
    /// Full turns over a lifetime.
    pub turns: f32,
    /// Translation magnitude at the end of life.
    pub max_drift: f32,
}

impl Default for Motion {
    fn default() -> Self {
        Self {
            turns: 5.0,
            max_drift: 2.0,
        }
    }
}

impl From<&EffectConfig> for Motion {
    fn from(config: &EffectConfig) -> Self {
        Self {
            turns: config.turns,
            max_drift: config.max_drift,
        }
    }
}

/// Derived visual state of a particle at one moment.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pose {
    /// Age fraction the pose was derived from, in `[0, 1]`.
    pub age_fraction: f32,
    /// Radians.
    pub rotation: f32,
    pub scale: f32,
    pub translation: Vec2,
    /// Opacity after fading.
    pub alpha: f32,
}

impl Pose {
    /// Pose at age fraction `p` with the default five turns and drift of 2.
    pub fn at(particle: &Particle, p: f32) -> Self {
        Self::with_motion(particle, p, Motion::default())
    }

    /// Pose at age fraction `p`. `p` is clamped into `[0, 1]`.
    pub fn with_motion(particle: &Particle, p: f32, motion: Motion) -> Self {
        let p = p.clamp(0.0, 1.0);
        Self {
            age_fraction: p,
            rotation: particle.initial_rotation + TAU * motion.turns * p,
            scale: particle.initial_scale * ease_out(p),
            translation: particle.direction * motion.max_drift * ease_in(p),
            alpha: (1.0 - p) * particle.color.w,
        }
    }

    /// `translate · rotate · scale`.
    pub fn matrix(&self) -> Mat3 {
        Mat3::from_translation(self.translation)
            * Mat3::from_angle(self.rotation)
            * Mat3::from_scale(Vec2::splat(self.scale))
    }

    /// Apply the pose to a point of the unit triangle.
    pub fn transform_point(&self, point: Vec2) -> Vec2 {
        self.matrix().transform_point2(point)
    }
}
