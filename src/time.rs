//! Frame timing for the scene.
//!
//! The ambient field bobs particles along a sinusoid of elapsed time, so the
//! scene needs one source of truth for "how long have we been running". A
//! [`FrameClock`] reads the wall clock by default; give it a fixed step and it
//! becomes fully deterministic, which is what tests and offline rendering use.
//!
//! ```
//! use airglow::time::FrameClock;
//!
//! let mut clock = FrameClock::fixed(1.0 / 60.0);
//! clock.tick();
//! clock.tick();
//! assert_eq!(clock.frame(), 2);
//! assert!((clock.elapsed() - 2.0 / 60.0).abs() < 1e-6);
//! ```

use std::time::Instant;

/// Per-frame time source.
#[derive(Debug, Clone)]
pub struct FrameClock {
    /// When the clock was created.
    start: Instant,
    /// When the last tick occurred.
    last_tick: Instant,
    /// Total elapsed time in seconds.
    elapsed_secs: f32,
    /// Time covered by the last tick in seconds.
    delta_secs: f32,
    /// Ticks since start.
    frame_count: u64,
    /// Fixed step in seconds; `None` follows the wall clock.
    fixed_delta: Option<f32>,
}

impl FrameClock {
    /// Clock that follows the wall clock.
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last_tick: now,
            elapsed_secs: 0.0,
            delta_secs: 0.0,
            frame_count: 0,
            fixed_delta: None,
        }
    }

    /// Clock that advances by exactly `step` seconds per tick.
    pub fn fixed(step: f32) -> Self {
        Self {
            fixed_delta: Some(step.max(0.0)),
            ..Self::new()
        }
    }

    /// Build from an optional fixed step.
    pub fn from_step(step: Option<f32>) -> Self {
        match step {
            Some(step) => Self::fixed(step),
            None => Self::new(),
        }
    }

    /// Advance one frame. Returns the new elapsed time in seconds.
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        match self.fixed_delta {
            Some(step) => {
                self.delta_secs = step;
                self.elapsed_secs += step;
            }
            None => {
                self.delta_secs = now.duration_since(self.last_tick).as_secs_f32();
                self.elapsed_secs = now.duration_since(self.start).as_secs_f32();
            }
        }
        self.last_tick = now;
        self.frame_count += 1;
        self.elapsed_secs
    }

    /// Total elapsed time in seconds.
    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed_secs
    }

    /// Time covered by the last tick in seconds.
    #[inline]
    pub fn delta(&self) -> f32 {
        self.delta_secs
    }

    /// Ticks since start.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    /// Whether the clock runs on a fixed step.
    #[inline]
    pub fn is_fixed(&self) -> bool {
        self.fixed_delta.is_some()
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
