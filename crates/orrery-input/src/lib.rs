//! Frame-coherent keyboard and mouse state plus the key bindings that map
//! them onto camera movement and viewer commands.

pub mod bindings;
pub mod keyboard;
pub mod mouse;

pub use bindings::{Action, KeyBindings, keycode_from_name, movement_intent};
pub use keyboard::{KeyboardState, RawKeyEvent};
pub use mouse::MouseState;
