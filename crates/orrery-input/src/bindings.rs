//! Physical key assignments for camera movement and viewer commands.
//!
//! Key names use the `Debug` spelling of winit's [`KeyCode`] ("KeyW",
//! "ShiftLeft", "F11", ...). Action names are snake_case ("forward",
//! "toggle_camera", ...).

use std::collections::HashMap;

use orrery_camera::MovementIntent;
use tracing::warn;
use winit::keyboard::KeyCode;

use crate::keyboard::KeyboardState;

/// Everything a key can be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Forward,
    Backward,
    Left,
    Right,
    Up,
    Down,
    ToggleCamera,
    ResetCamera,
    Wireframe,
    Fullscreen,
    ReloadConfig,
    Quit,
}

impl Action {
    pub const ALL: [Action; 12] = [
        Action::Forward,
        Action::Backward,
        Action::Left,
        Action::Right,
        Action::Up,
        Action::Down,
        Action::ToggleCamera,
        Action::ResetCamera,
        Action::Wireframe,
        Action::Fullscreen,
        Action::ReloadConfig,
        Action::Quit,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Action::Forward => "forward",
            Action::Backward => "backward",
            Action::Left => "left",
            Action::Right => "right",
            Action::Up => "up",
            Action::Down => "down",
            Action::ToggleCamera => "toggle_camera",
            Action::ResetCamera => "reset_camera",
            Action::Wireframe => "wireframe",
            Action::Fullscreen => "fullscreen",
            Action::ReloadConfig => "reload_config",
            Action::Quit => "quit",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.name() == name)
    }

    fn default_key(self) -> KeyCode {
        match self {
            Action::Forward => KeyCode::KeyW,
            Action::Backward => KeyCode::KeyS,
            Action::Left => KeyCode::KeyA,
            Action::Right => KeyCode::KeyD,
            Action::Up => KeyCode::Space,
            Action::Down => KeyCode::ShiftLeft,
            Action::ToggleCamera => KeyCode::Tab,
            Action::ResetCamera => KeyCode::KeyR,
            Action::Wireframe => KeyCode::F3,
            Action::Fullscreen => KeyCode::F11,
            Action::ReloadConfig => KeyCode::F5,
            Action::Quit => KeyCode::Escape,
        }
    }
}

/// One physical key per [`Action`].
#[derive(Debug, Clone, PartialEq)]
pub struct KeyBindings {
    keys: HashMap<Action, KeyCode>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            keys: Action::ALL.into_iter().map(|a| (a, a.default_key())).collect(),
        }
    }
}

impl KeyBindings {
    /// Defaults with `overrides` (action name -> key name) applied. Entries
    /// naming an unknown action or key are logged and skipped.
    pub fn from_overrides(overrides: &HashMap<String, String>) -> Self {
        let mut bindings = Self::default();
        for (action_name, key_name) in overrides {
            let Some(action) = Action::from_name(action_name) else {
                warn!("ignoring binding for unknown action '{action_name}'");
                continue;
            };
            let Some(key) = keycode_from_name(key_name) else {
                warn!("ignoring unknown key '{key_name}' for action '{action_name}'");
                continue;
            };
            bindings.set(action, key);
        }
        for (a, b, key) in bindings.conflicts() {
            warn!("{key:?} is bound to both '{}' and '{}'", a.name(), b.name());
        }
        bindings
    }

    pub fn key(&self, action: Action) -> KeyCode {
        self.keys
            .get(&action)
            .copied()
            .unwrap_or_else(|| action.default_key())
    }

    pub fn set(&mut self, action: Action, key: KeyCode) {
        self.keys.insert(action, key);
    }

    pub fn is_held(&self, keyboard: &KeyboardState, action: Action) -> bool {
        keyboard.is_pressed(self.key(action))
    }

    pub fn just_pressed(&self, keyboard: &KeyboardState, action: Action) -> bool {
        keyboard.just_pressed(self.key(action))
    }

    /// Pairs of actions sharing one key, in [`Action::ALL`] order.
    pub fn conflicts(&self) -> Vec<(Action, Action, KeyCode)> {
        let mut found = Vec::new();
        for (i, &a) in Action::ALL.iter().enumerate() {
            for &b in &Action::ALL[i + 1..] {
                let key = self.key(a);
                if key == self.key(b) {
                    found.push((a, b, key));
                }
            }
        }
        found
    }
}

/// Fold the held movement keys into a [`MovementIntent`].
pub fn movement_intent(keyboard: &KeyboardState, bindings: &KeyBindings) -> MovementIntent {
    let mut intent = MovementIntent::NONE;
    for (action, flag) in [
        (Action::Forward, MovementIntent::FORWARD),
        (Action::Backward, MovementIntent::BACKWARD),
        (Action::Left, MovementIntent::LEFT),
        (Action::Right, MovementIntent::RIGHT),
        (Action::Up, MovementIntent::UP),
        (Action::Down, MovementIntent::DOWN),
    ] {
        intent.set(flag, bindings.is_held(keyboard, action));
    }
    intent
}

/// Parse a key name in winit `Debug` spelling.
pub fn keycode_from_name(name: &str) -> Option<KeyCode> {
    Some(match name {
        "KeyA" => KeyCode::KeyA,
        "KeyB" => KeyCode::KeyB,
        "KeyC" => KeyCode::KeyC,
        "KeyD" => KeyCode::KeyD,
        "KeyE" => KeyCode::KeyE,
        "KeyF" => KeyCode::KeyF,
        "KeyG" => KeyCode::KeyG,
        "KeyH" => KeyCode::KeyH,
        "KeyI" => KeyCode::KeyI,
        "KeyJ" => KeyCode::KeyJ,
        "KeyK" => KeyCode::KeyK,
        "KeyL" => KeyCode::KeyL,
        "KeyM" => KeyCode::KeyM,
        "KeyN" => KeyCode::KeyN,
        "KeyO" => KeyCode::KeyO,
        "KeyP" => KeyCode::KeyP,
        "KeyQ" => KeyCode::KeyQ,
        "KeyR" => KeyCode::KeyR,
        "KeyS" => KeyCode::KeyS,
        "KeyT" => KeyCode::KeyT,
        "KeyU" => KeyCode::KeyU,
        "KeyV" => KeyCode::KeyV,
        "KeyW" => KeyCode::KeyW,
        "KeyX" => KeyCode::KeyX,
        "KeyY" => KeyCode::KeyY,
        "KeyZ" => KeyCode::KeyZ,
        "Digit0" => KeyCode::Digit0,
        "Digit1" => KeyCode::Digit1,
        "Digit2" => KeyCode::Digit2,
        "Digit3" => KeyCode::Digit3,
        "Digit4" => KeyCode::Digit4,
        "Digit5" => KeyCode::Digit5,
        "Digit6" => KeyCode::Digit6,
        "Digit7" => KeyCode::Digit7,
        "Digit8" => KeyCode::Digit8,
        "Digit9" => KeyCode::Digit9,
        "F1" => KeyCode::F1,
        "F2" => KeyCode::F2,
        "F3" => KeyCode::F3,
        "F4" => KeyCode::F4,
        "F5" => KeyCode::F5,
        "F6" => KeyCode::F6,
        "F7" => KeyCode::F7,
        "F8" => KeyCode::F8,
        "F9" => KeyCode::F9,
        "F10" => KeyCode::F10,
        "F11" => KeyCode::F11,
        "F12" => KeyCode::F12,
        "Space" => KeyCode::Space,
        "Enter" => KeyCode::Enter,
        "Escape" => KeyCode::Escape,
        "Tab" => KeyCode::Tab,
        "Backquote" => KeyCode::Backquote,
        "ShiftLeft" => KeyCode::ShiftLeft,
        "ShiftRight" => KeyCode::ShiftRight,
        "ControlLeft" => KeyCode::ControlLeft,
        "ControlRight" => KeyCode::ControlRight,
        "AltLeft" => KeyCode::AltLeft,
        "AltRight" => KeyCode::AltRight,
        "ArrowUp" => KeyCode::ArrowUp,
        "ArrowDown" => KeyCode::ArrowDown,
        "ArrowLeft" => KeyCode::ArrowLeft,
        "ArrowRight" => KeyCode::ArrowRight,
        _ => return None,
    })
}
