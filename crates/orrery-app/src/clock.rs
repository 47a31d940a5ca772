//! Variable-step frame clock.
//!
//! Each frame advances the scene by the wall-clock time since the previous
//! frame. Long stalls (window drags, breakpoints) are clamped so the camera
//! and the bodies do not jump.

use std::time::Instant;
use tracing::warn;

/// Longest step a single frame may take, in seconds.
pub const MAX_FRAME_TIME: f64 = 0.25;

pub struct FrameClock {
    previous: Instant,
    total_time: f64,
    frame_count: u64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            previous: Instant::now(),
            total_time: 0.0,
            frame_count: 0,
        }
    }

    /// Seconds since the last tick, clamped to `[0, MAX_FRAME_TIME]`.
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let frame_time = now.duration_since(self.previous).as_secs_f64();
        self.previous = now;
        self.advance(frame_time)
    }

    /// Forget the time spent since the last tick, e.g. after regaining focus.
    pub fn restart(&mut self) {
        self.previous = Instant::now();
    }

    fn advance(&mut self, frame_time: f64) -> f32 {
        let mut step = frame_time.max(0.0);
        if step > MAX_FRAME_TIME {
            warn!(
                "Frame time {:.1}ms exceeds maximum, clamping to {:.1}ms",
                step * 1000.0,
                MAX_FRAME_TIME * 1000.0
            );
            step = MAX_FRAME_TIME;
        }
        self.total_time += step;
        self.frame_count += 1;
        step as f32
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Sum of all clamped steps.
    pub fn total_time(&self) -> f64 {
        self.total_time
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_passes_through() {
        let mut clock = FrameClock::new();
        let step = clock.advance(0.016);
        assert!((step - 0.016).abs() < 1e-6);
        assert_eq!(clock.frame_count(), 1);
    }

    #[test]
    fn test_long_frame_is_clamped() {
        let mut clock = FrameClock::new();
        let step = clock.advance(3.0);
        assert!((step as f64 - MAX_FRAME_TIME).abs() < 1e-6);
        assert!((clock.total_time() - MAX_FRAME_TIME).abs() < 1e-9);
    }

    #[test]
    fn test_negative_frame_is_zero() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.advance(-1.0), 0.0);
    }

    #[test]
    fn test_total_time_accumulates() {
        let mut clock = FrameClock::new();
        for _ in 0..4 {
            clock.advance(0.1);
        }
        assert_eq!(clock.frame_count(), 4);
        assert!((clock.total_time() - 0.4).abs() < 1e-9);
    }

    #[test]
    fn test_real_tick_is_bounded() {
        let mut clock = FrameClock::new();
        let step = clock.tick();
        assert!(step >= 0.0);
        assert!(step as f64 <= MAX_FRAME_TIME);
    }
}
