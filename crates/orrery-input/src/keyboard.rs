//! Frame-coherent keyboard state tracker.
//!
//! [`KeyboardState`] accumulates winit key events during a frame and answers
//! three questions for any physical key: is it held, was it just pressed this
//! frame, and was it just released this frame. Physical key codes are used
//! so movement keys sit in the same place on every layout.

use std::collections::HashSet;

use winit::event::{ElementState, KeyEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Minimal description of a key event, constructible without a window.
#[derive(Debug, Clone, Copy)]
pub struct RawKeyEvent {
    /// The physical key involved.
    pub key: PhysicalKey,
    /// Whether the key was pressed or released.
    pub state: ElementState,
    /// Whether this is an OS auto-repeat.
    pub repeat: bool,
}

impl RawKeyEvent {
    /// A fresh (non-repeat) press of `code`.
    pub fn pressed(code: KeyCode) -> Self {
        Self {
            key: PhysicalKey::Code(code),
            state: ElementState::Pressed,
            repeat: false,
        }
    }

    /// A release of `code`.
    pub fn released(code: KeyCode) -> Self {
        Self {
            key: PhysicalKey::Code(code),
            state: ElementState::Released,
            repeat: false,
        }
    }
}

/// Held / just-pressed / just-released sets for physical keys.
///
/// Forward every [`KeyEvent`] to [`process_event`](Self::process_event),
/// query during the frame, then call
/// [`clear_transients`](Self::clear_transients) once the frame is done.
#[derive(Debug, Clone, Default)]
pub struct KeyboardState {
    pressed: HashSet<PhysicalKey>,
    just_pressed: HashSet<PhysicalKey>,
    just_released: HashSet<PhysicalKey>,
}

impl KeyboardState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Processes a winit [`KeyEvent`], updating the held and transient sets.
    pub fn process_event(&mut self, event: &KeyEvent) {
        self.process_raw(RawKeyEvent {
            key: event.physical_key,
            state: event.state,
            repeat: event.repeat,
        });
    }

    /// Repeat events are ignored so holding a key fires `just_pressed` once.
    pub fn process_raw(&mut self, event: RawKeyEvent) {
        if event.repeat {
            return;
        }
        match event.state {
            ElementState::Pressed => {
                if self.pressed.insert(event.key) {
                    self.just_pressed.insert(event.key);
                }
            }
            ElementState::Released => {
                if self.pressed.remove(&event.key) {
                    self.just_released.insert(event.key);
                }
            }
        }
    }

    #[must_use]
    pub fn is_pressed(&self, code: KeyCode) -> bool {
        self.pressed.contains(&PhysicalKey::Code(code))
    }

    #[must_use]
    pub fn just_pressed(&self, code: KeyCode) -> bool {
        self.just_pressed.contains(&PhysicalKey::Code(code))
    }

    #[must_use]
    pub fn just_released(&self, code: KeyCode) -> bool {
        self.just_released.contains(&PhysicalKey::Code(code))
    }

    /// Drop every held key, e.g. when the window loses focus and release
    /// events will never arrive.
    pub fn release_all(&mut self) {
        self.just_released.extend(self.pressed.drain());
    }

    /// Clears just-pressed and just-released. Call once at the end of each
    /// frame.
    pub fn clear_transients(&mut self) {
        self.just_pressed.clear();
        self.just_released.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state_no_keys_pressed() {
        let kb = KeyboardState::new();
        for code in [KeyCode::KeyW, KeyCode::Space, KeyCode::Escape] {
            assert!(!kb.is_pressed(code));
            assert!(!kb.just_pressed(code));
            assert!(!kb.just_released(code));
        }
    }

    #[test]
    fn test_press_then_clear_keeps_held() {
        let mut kb = KeyboardState::new();
        kb.process_raw(RawKeyEvent::pressed(KeyCode::KeyW));
        assert!(kb.is_pressed(KeyCode::KeyW));
        assert!(kb.just_pressed(KeyCode::KeyW));

        kb.clear_transients();
        assert!(kb.is_pressed(KeyCode::KeyW));
        assert!(!kb.just_pressed(KeyCode::KeyW));
    }

    #[test]
    fn test_release_sets_just_released() {
        let mut kb = KeyboardState::new();
        kb.process_raw(RawKeyEvent::pressed(KeyCode::KeyA));
        kb.clear_transients();
        kb.process_raw(RawKeyEvent::released(KeyCode::KeyA));
        assert!(!kb.is_pressed(KeyCode::KeyA));
        assert!(kb.just_released(KeyCode::KeyA));
    }

    #[test]
    fn test_repeat_events_ignored() {
        let mut kb = KeyboardState::new();
        kb.process_raw(RawKeyEvent::pressed(KeyCode::KeyS));
        kb.clear_transients();
        kb.process_raw(RawKeyEvent {
            repeat: true,
            ..RawKeyEvent::pressed(KeyCode::KeyS)
        });
        assert!(kb.is_pressed(KeyCode::KeyS));
        assert!(!kb.just_pressed(KeyCode::KeyS));
    }

    #[test]
    fn test_release_all_on_focus_loss() {
        let mut kb = KeyboardState::new();
        kb.process_raw(RawKeyEvent::pressed(KeyCode::KeyW));
        kb.process_raw(RawKeyEvent::pressed(KeyCode::ShiftLeft));
        kb.clear_transients();
        kb.release_all();
        assert!(!kb.is_pressed(KeyCode::KeyW));
        assert!(kb.just_released(KeyCode::ShiftLeft));
    }
}
