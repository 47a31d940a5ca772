//! Yaw/pitch camera controller: turns per-frame movement intent and raw 2D
//! pointer deltas into a view and projection transform.

pub mod camera;
pub mod config;
pub mod cursor;
pub mod error;
pub mod intent;

pub use camera::{
    Camera, CameraMode, DEFAULT_PITCH, DEFAULT_YAW, FAR_PLANE, FOV_Y_DEGREES, NEAR_PLANE,
    PITCH_LIMIT, WORLD_UP,
};
pub use config::{ActivityToggle, CameraConfig, DistanceConstraint, PitchConvention};
pub use cursor::CursorTracker;
pub use error::CameraError;
pub use intent::MovementIntent;
