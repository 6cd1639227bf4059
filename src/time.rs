//! Frame clocks.
//!
//! The frame driver is the only component that knows what time it is. It asks
//! a [`Clock`] once per frame and hands the reading down to the store.
//!
//! # Example
//!
//! ```ignore
//! use pinwheel::time::{Clock, FrameClock};
//!
//! let mut clock = FrameClock::new();
//!
//! // Once per frame:
//! let now = clock.now();
//! println!("t = {:.2}s, frame {}, {:.1} fps", now, clock.frame(), clock.fps());
//! ```

use std::time::{Duration, Instant};

/// Monotonic time source, in seconds.
pub trait Clock {
    /// Sample the clock. Called exactly once per frame.
    fn now(&mut self) -> f32;
}

/// Wall-clock time since creation, with frame counting and FPS.
#[derive(Debug)]
pub struct FrameClock {
    /// When the clock was created.
    start: Instant,
    /// Last reading in seconds.
    elapsed_secs: f32,
    /// Time between the last two readings, in seconds.
    delta_secs: f32,
    /// Readings taken so far.
    frame_count: u64,
    /// Calculated FPS (updated periodically).
    fps: f32,
    /// Frame count at last FPS update.
    fps_frame_count: u64,
    /// Time of last FPS calculation.
    fps_update_time: Instant,
    /// How often to update the FPS calculation.
    fps_update_interval: Duration,
    /// Set when the last reading refreshed the FPS value.
    fps_updated: bool,
}

impl FrameClock {
    /// Create a clock starting from now.
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            elapsed_secs: 0.0,
            delta_secs: 0.0,
            frame_count: 0,
            fps: 0.0,
            fps_frame_count: 0,
            fps_update_time: now,
            fps_update_interval: Duration::from_millis(500),
            fps_updated: false,
        }
    }

    /// Seconds at the last reading.
    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed_secs
    }

    /// Seconds between the last two readings.
    #[inline]
    pub fn delta(&self) -> f32 {
        self.delta_secs
    }

    /// Readings taken so far.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    /// Frames per second, refreshed every half second.
    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }

    /// Whether the last reading refreshed [`fps`](Self::fps).
    #[inline]
    pub fn fps_updated(&self) -> bool {
        self.fps_updated
    }

    /// Restart from zero.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for FrameClock {
    fn now(&mut self) -> f32 {
        let now = Instant::now();

        let elapsed = now.duration_since(self.start).as_secs_f32();
        self.delta_secs = elapsed - self.elapsed_secs;
        self.elapsed_secs = elapsed;
        self.frame_count += 1;

        let fps_elapsed = now.duration_since(self.fps_update_time);
        self.fps_updated = fps_elapsed >= self.fps_update_interval;
        if self.fps_updated {
            let frames_since = self.frame_count - self.fps_frame_count;
            self.fps = frames_since as f32 / fps_elapsed.as_secs_f32();
            self.fps_frame_count = self.frame_count;
            self.fps_update_time = now;
        }

        self.elapsed_secs
    }
}

/// A clock that only moves when told to.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ManualClock {
    now: f32,
}

impl ManualClock {
    pub fn new() -> Self {
        Self { now: 0.0 }
    }

    /// Jump to an absolute time.
    pub fn set(&mut self, now: f32) {
        self.now = now;
    }

    /// Move forward by `delta` seconds.
    pub fn advance(&mut self, delta: f32) {
        self.now += delta;
    }
}

impl Clock for ManualClock {
    fn now(&mut self) -> f32 {
        self.now
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_frame_clock_new() {
        let clock = FrameClock::new();
        assert_eq!(clock.frame(), 0);
        assert_eq!(clock.elapsed(), 0.0);
    }

    #[test]
    fn test_frame_clock_is_monotonic() {
        let mut clock = FrameClock::new();
        let first = clock.now();
        thread::sleep(Duration::from_millis(10));
        let second = clock.now();

        assert!(second > first);
        assert!(clock.delta() > 0.0);
        assert_eq!(clock.frame(), 2);
    }

    #[test]
    fn test_frame_clock_fps() {
        let mut clock = FrameClock::new();
        clock.now();
        thread::sleep(Duration::from_millis(600));
        clock.now();

        assert!(clock.fps_updated());
        assert!(clock.fps() > 0.0);
    }

    #[test]
    fn test_manual_clock() {
        let mut clock = ManualClock::new();
        assert_eq!(clock.now(), 0.0);
        clock.advance(1.25);
        assert_eq!(clock.now(), 1.25);
        clock.set(5.0);
        assert_eq!(clock.now(), 5.0);
    }
}
