//! Frame-coherent mouse state tracker.
//!
//! While the cursor is captured, look deltas come from raw device motion.
//! Otherwise they are differences between successive cursor positions, with
//! the first position after entering the window swallowed so the view does
//! not jump.

use glam::Vec2;
use orrery_camera::CursorTracker;
use winit::event::MouseScrollDelta;
use winit::window::{CursorGrabMode, Window};

/// Approximate pixels per scroll line on touchpads.
const PIXELS_PER_LINE: f64 = 40.0;

#[derive(Debug, Clone, Default)]
pub struct MouseState {
    position: Vec2,
    tracker: CursorTracker,
    delta: Vec2,
    scroll: f32,
    captured: bool,
    cursor_in_window: bool,
}

impl MouseState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_cursor_moved(&mut self, x: f64, y: f64) {
        self.position = Vec2::new(x as f32, y as f32);
        let delta = self.tracker.sample(self.position);
        if !self.captured {
            self.delta += delta;
        }
    }

    /// Raw `DeviceEvent::MouseMotion`, only counted while captured.
    pub fn on_raw_motion(&mut self, dx: f64, dy: f64) {
        if self.captured {
            self.delta += Vec2::new(dx as f32, dy as f32);
        }
    }

    pub fn on_scroll(&mut self, delta: MouseScrollDelta) {
        self.scroll += match delta {
            MouseScrollDelta::LineDelta(_, y) => y,
            MouseScrollDelta::PixelDelta(pos) => (pos.y / PIXELS_PER_LINE) as f32,
        };
    }

    pub fn on_cursor_entered(&mut self) {
        self.cursor_in_window = true;
        self.tracker.reset();
    }

    pub fn on_cursor_left(&mut self) {
        self.cursor_in_window = false;
    }

    /// Grab and hide the cursor, or release it. Locked grab is preferred and
    /// confined grab is the fallback on platforms without pointer lock.
    pub fn set_captured(&mut self, window: &Window, captured: bool) {
        self.set_captured_flag(captured);
        if captured {
            if window.set_cursor_grab(CursorGrabMode::Locked).is_err()
                && let Err(e) = window.set_cursor_grab(CursorGrabMode::Confined)
            {
                tracing::warn!("cursor grab unavailable: {e}");
            }
            window.set_cursor_visible(false);
        } else {
            if let Err(e) = window.set_cursor_grab(CursorGrabMode::None) {
                tracing::warn!("failed to release cursor grab: {e}");
            }
            window.set_cursor_visible(true);
        }
    }

    /// Update the capture flag without touching a window.
    pub fn set_captured_flag(&mut self, captured: bool) {
        if captured != self.captured {
            self.tracker.reset();
            self.delta = Vec2::ZERO;
        }
        self.captured = captured;
    }

    /// Clears per-frame delta and scroll.
    pub fn clear_transients(&mut self) {
        self.delta = Vec2::ZERO;
        self.scroll = 0.0;
    }

    #[must_use]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Look delta accumulated since the last clear, in window pixels with y
    /// growing downward.
    #[must_use]
    pub fn delta(&self) -> Vec2 {
        self.delta
    }

    /// Scroll lines accumulated since the last clear (positive = away from
    /// the user).
    #[must_use]
    pub fn scroll(&self) -> f32 {
        self.scroll
    }

    #[must_use]
    pub fn is_captured(&self) -> bool {
        self.captured
    }

    #[must_use]
    pub fn is_cursor_in_window(&self) -> bool {
        self.cursor_in_window
    }
}
