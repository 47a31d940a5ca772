//! Orrery scene driver.
//!
//! Owns the window, the GPU context, the Earth, Moon and sky meshes, and the
//! camera, and runs the per-frame loop: input, camera, animation, draw.

pub mod animation;
pub mod clock;
pub mod error;
pub mod scene;
pub mod window;

pub use animation::{SceneAnimation, pole_up};
pub use clock::{FrameClock, MAX_FRAME_TIME};
pub use error::AppError;
pub use scene::SceneRenderer;
pub use window::{AppState, run_with_config};
