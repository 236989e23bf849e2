//! Time management utilities
//!
//! The scene never reads a process-wide clock: every update receives a
//! [`FrameContext`] produced here, either from wall-clock time via [`Timer`]
//! or stepped manually for deterministic runs.

use std::time::Instant;

/// Timing information handed to every per-frame update
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameContext {
    /// Seconds elapsed since the previous frame
    pub delta_time: f32,
    /// Seconds elapsed since the clock started
    pub elapsed_time: f32,
    /// Number of frames produced before this one
    pub frame_index: u64,
}

impl FrameContext {
    /// Create a frame context from explicit values
    pub fn new(delta_time: f32, elapsed_time: f32) -> Self {
        Self {
            delta_time,
            elapsed_time,
            frame_index: 0,
        }
    }

    /// Produce the context of the following frame after `delta_time` seconds
    #[must_use]
    pub fn advance(&self, delta_time: f32) -> Self {
        Self {
            delta_time,
            elapsed_time: self.elapsed_time + delta_time,
            frame_index: self.frame_index + 1,
        }
    }
}

/// High-precision timer for frame timing
pub struct Timer {
    last_frame: Instant,
    current: FrameContext,
    frames_ticked: u64,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer {
    /// Create a new timer
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
            current: FrameContext::default(),
            frames_ticked: 0,
        }
    }

    /// Advance the timer (once per frame) and return the new frame context
    pub fn tick(&mut self) -> FrameContext {
        let now = Instant::now();
        let delta = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;
        self.current = if self.frames_ticked == 0 {
            FrameContext::new(delta, delta)
        } else {
            self.current.advance(delta)
        };
        self.frames_ticked += 1;
        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_advance_accumulates_elapsed() {
        let frame = FrameContext::default().advance(0.5).advance(0.25);
        assert_relative_eq!(frame.elapsed_time, 0.75);
        assert_relative_eq!(frame.delta_time, 0.25);
        assert_eq!(frame.frame_index, 2);
    }

    #[test]
    fn test_timer_ticks_are_monotonic() {
        let mut timer = Timer::new();
        let first = timer.tick();
        let second = timer.tick();
        assert!(second.elapsed_time >= first.elapsed_time);
        assert_eq!(second.frame_index, first.frame_index + 1);
        assert!(second.delta_time >= 0.0);
    }
}
