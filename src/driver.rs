//! The per-frame control loop.
//!
//! ```text
//!   Idle ──tick──▶ Running ──tick──▶ Running ...
//!                     │
//!                 stop()│
//!                     ▼
//!                  Stopped
//! ```
//!
//! A tick samples the clock once and runs, in this order: spawn, clear,
//! one draw per live particle, cull. The host re-arms the next tick only after
//! the current one returns, so a tick never overlaps another.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, trace};

use crate::backend::RenderBackend;
use crate::config::EffectConfig;
use crate::random::RandomSource;
use crate::shader::ParticleUniforms;
use crate::store::ParticleStore;
use crate::time::Clock;

/// Lifecycle of a [`FrameDriver`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DriverState {
    /// No frame has run yet.
    Idle,
    /// At least one frame has run and no stop was requested.
    Running,
    /// A stop was requested; ticks are ignored.
    Stopped,
}

/// Cloneable handle for stopping a driver from outside the loop.
#[derive(Clone, Debug, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the driver to stop before its next tick.
    pub fn stop(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Summary of one tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameReport {
    /// Clock reading the frame ran at.
    pub now: f32,
    pub spawned: usize,
    pub drawn: usize,
    pub culled: usize,
    /// Particles alive after culling.
    pub live: usize,
}

/// Drives a [`ParticleStore`] into a [`RenderBackend`] once per frame.
pub struct FrameDriver<B, C, R> {
    backend: B,
    clock: C,
    store: ParticleStore<R>,
    state: DriverState,
    stop: StopHandle,
    frames: u64,
}

impl<B, C, R> FrameDriver<B, C, R>
where
    B: RenderBackend,
    C: Clock,
    R: RandomSource,
{
    /// Build a driver around an initialized backend.
    pub fn new(backend: B, clock: C, rng: R, config: EffectConfig) -> Self {
        Self {
            backend,
            clock,
            store: ParticleStore::new(config, rng),
            state: DriverState::Idle,
            stop: StopHandle::new(),
            frames: 0,
        }
    }

    /// Use an existing stop handle instead of a fresh one.
    pub fn with_stop_handle(mut self, stop: StopHandle) -> Self {
        self.stop = stop;
        self
    }

    /// Sample the clock and run one frame.
    ///
    /// Returns `None` once stopped.
    pub fn tick(&mut self) -> Option<FrameReport> {
        if self.sync_stop() {
            return None;
        }
        let now = self.clock.now();
        self.tick_at(now)
    }

    /// Run one frame at an explicit time.
    ///
    /// Returns `None` once stopped.
    pub fn tick_at(&mut self, now: f32) -> Option<FrameReport> {
        if self.sync_stop() {
            return None;
        }

        let spawned = self.store.spawn(now).len();

        self.backend.clear_frame();
        let mut drawn = 0;
        for (particle, pose) in self.store.update(now) {
            self.backend
                .set_uniforms(&ParticleUniforms::from_pose(&pose, particle.color));
            self.backend.draw_triangle();
            drawn += 1;
        }

        let culled = self.store.cull(now);

        if self.state == DriverState::Idle {
            debug!(now, "frame driver running");
        }
        self.state = DriverState::Running;
        self.frames += 1;

        let report = FrameReport {
            now,
            spawned,
            drawn,
            culled,
            live: self.store.len(),
        };
        trace!(?report, "frame");
        Some(report)
    }

    /// Whether the host should schedule another tick.
    pub fn should_continue(&mut self) -> bool {
        !self.sync_stop()
    }
}

impl<B, C, R> FrameDriver<B, C, R> {
    /// Request a stop. Takes effect before the next tick.
    pub fn stop(&mut self) {
        self.stop.stop();
        self.state = DriverState::Stopped;
    }

    fn sync_stop(&mut self) -> bool {
        if self.stop.is_stopped() && self.state != DriverState::Stopped {
            debug!(frames = self.frames, "frame driver stopped");
            self.state = DriverState::Stopped;
        }
        self.state == DriverState::Stopped
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    /// Handle that stops this driver when triggered.
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Frames run so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn store(&self) -> &ParticleStore<R> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut ParticleStore<R> {
        &mut self.store
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{DrawCommand, RecordingBackend};
    use crate::random::SequenceRandom;
    use crate::time::ManualClock;

    fn driver(samples: Vec<f32>) -> FrameDriver<RecordingBackend, ManualClock, SequenceRandom> {
        FrameDriver::new(
            RecordingBackend::new(),
            ManualClock::new(),
            SequenceRandom::new(samples),
            EffectConfig::default(),
        )
    }

    #[test]
    fn test_starts_idle_then_runs() {
        let mut driver = driver(vec![0.0]);
        assert_eq!(driver.state(), DriverState::Idle);
        driver.tick();
        assert_eq!(driver.state(), DriverState::Running);
        assert_eq!(driver.frames(), 1);
    }

    #[test]
    fn test_empty_frame_only_clears() {
        let mut driver = driver(vec![0.0]);
        let report = driver.tick().unwrap();

        assert_eq!(report.spawned, 0);
        assert_eq!(report.drawn, 0);
        assert_eq!(report.live, 0);
        assert_eq!(driver.backend().commands(), &[DrawCommand::Clear]);
    }

    #[test]
    fn test_newly_spawned_are_drawn_same_frame() {
        let mut driver = driver(vec![0.5]);
        let report = driver.tick_at(0.0).unwrap();

        assert_eq!(report.spawned, 2);
        assert_eq!(report.drawn, 2);
        assert_eq!(driver.backend().draws().count(), 2);
        // Born this frame: fully opaque, zero size.
        for uniforms in driver.backend().draws() {
            assert_eq!(uniforms.age_fraction, 0.0);
            assert_eq!(uniforms.alpha(), 1.0);
        }
    }

    #[test]
    fn test_tick_samples_clock() {
        let mut driver = driver(vec![0.5]);
        driver.clock_mut().set(3.5);
        let report = driver.tick().unwrap();
        assert_eq!(report.now, 3.5);
        assert!(driver.store().iter().all(|p| p.spawn_time == 3.5));
    }

    #[test]
    fn test_expired_particle_drawn_then_culled() {
        let mut driver = driver(vec![0.5]);
        driver.tick_at(0.0);

        // Two from t=0 are past their lifetime, two more are born now.
        let report = driver.tick_at(6.0).unwrap();
        assert_eq!(report.spawned, 2);
        assert_eq!(report.drawn, 4);
        assert_eq!(report.culled, 2);
        assert_eq!(report.live, 2);

        let faded: Vec<(f32, f32)> = driver
            .backend()
            .draws()
            .map(|uniforms| (uniforms.age_fraction, uniforms.alpha()))
            .collect();
        assert_eq!(faded, vec![(1.0, 0.0), (1.0, 0.0), (0.0, 1.0), (0.0, 1.0)]);
    }

    #[test]
    fn test_stop_handle() {
        let mut driver = driver(vec![0.0]);
        let handle = driver.stop_handle();
        driver.tick();
        assert!(driver.should_continue());

        handle.stop();
        assert!(!driver.should_continue());
        assert_eq!(driver.state(), DriverState::Stopped);
        assert_eq!(driver.tick(), None);
        assert_eq!(driver.tick_at(1.0), None);
        assert_eq!(driver.frames(), 1);
    }

    #[test]
    fn test_stop_before_first_tick() {
        let mut driver = driver(vec![0.5]);
        driver.stop();
        assert_eq!(driver.tick(), None);
        assert_eq!(driver.backend().frames(), 0);
        assert!(driver.store().is_empty());
    }

    #[test]
    fn test_shared_stop_handle() {
        let handle = StopHandle::new();
        let mut driver = driver(vec![0.0]).with_stop_handle(handle.clone());
        handle.stop();
        assert!(!driver.should_continue());
    }
}
