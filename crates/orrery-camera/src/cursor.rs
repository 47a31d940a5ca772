//! Absolute cursor positions to per-frame deltas.

use glam::Vec2;

/// Converts absolute pointer positions into deltas. The first sample after
/// construction or [`reset`](Self::reset) only records the position, so a
/// freshly grabbed pointer never produces a jump.
#[derive(Debug, Clone, Default)]
pub struct CursorTracker {
    last: Option<Vec2>,
}

impl CursorTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed an absolute position, returning the movement since the last one.
    pub fn sample(&mut self, position: Vec2) -> Vec2 {
        let delta = match self.last {
            Some(last) => position - last,
            None => Vec2::ZERO,
        };
        self.last = Some(position);
        delta
    }

    /// Forget the last position; the next sample yields a zero delta.
    pub fn reset(&mut self) {
        self.last = None;
    }

    pub fn is_armed(&self) -> bool {
        self.last.is_none()
    }
}
