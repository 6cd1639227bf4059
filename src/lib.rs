//! # Pinwheel
//!
//! Short-lived triangles that spin, grow, drift outward and fade, with every
//! visual parameter derived from elapsed time alone.
//!
//! Each frame the [`FrameDriver`] samples the clock once, lets the
//! [`ParticleStore`] spawn a few new particles, draws every live particle
//! through a [`RenderBackend`], and finally culls the ones whose lifetime is
//! over.
//!
//! ## Quick Start
//!
//! ```ignore
//! use pinwheel::Effect;
//!
//! fn main() -> Result<(), pinwheel::RunError> {
//!     Effect::new()
//!         .with_duration(5.0)
//!         .with_title("Pinwheel")
//!         .run()
//! }
//! ```
//!
//! ## Headless
//!
//! The driver is generic over its backend, clock and random source, so a
//! whole animation can be stepped without a window:
//!
//! ```
//! use pinwheel::{FrameDriver, ManualClock, RecordingBackend, SequenceRandom};
//! use pinwheel::config::EffectConfig;
//!
//! let mut driver = FrameDriver::new(
//!     RecordingBackend::new(),
//!     ManualClock::new(),
//!     SequenceRandom::new(vec![0.5]),
//!     EffectConfig::default(),
//! );
//! let report = driver.tick_at(0.0).unwrap();
//! assert_eq!(report.spawned, 2);
//! ```
//!
//! ## Pose over a lifetime
//!
//! | Parameter   | Formula                                  |
//! |-------------|------------------------------------------|
//! | rotation    | `initial_rotation + 10π·p`               |
//! | scale       | `initial_scale · p·(2 − p)`              |
//! | translation | `direction · 2·p²`                       |
//! | alpha       | `(1 − p) · color.a`                      |
//!
//! where `p` is the clamped age fraction, see [`pose`].

mod app;
pub mod backend;
pub mod config;
pub mod driver;
mod error;
mod gpu;
pub mod particle;
pub mod pose;
pub mod random;
pub mod shader;
pub mod store;
pub mod time;

pub use app::Effect;
pub use backend::{DrawCommand, RecordingBackend, RenderBackend};
pub use config::{Config, EffectConfig, WindowConfig};
pub use driver::{DriverState, FrameDriver, FrameReport, StopHandle};
pub use error::{ConfigError, GpuError, RunError};
pub use glam::{Mat3, Vec2, Vec4};
pub use gpu::GpuRenderer;
pub use particle::Particle;
pub use pose::Pose;
pub use random::{RandomSource, SequenceRandom};
pub use shader::ParticleUniforms;
pub use store::ParticleStore;
pub use time::{Clock, FrameClock, ManualClock};
