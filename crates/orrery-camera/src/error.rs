use thiserror::Error;

/// Rejected camera settings or viewport.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CameraError {
    /// Width or height is zero, negative or not finite.
    #[error("viewport {width}x{height} has no valid aspect ratio")]
    InvalidViewport { width: f32, height: f32 },

    /// A speed, sensitivity or zoom rate is negative or not finite.
    #[error("{name} must be finite and non-negative, got {value}")]
    InvalidRate { name: &'static str, value: f32 },

    /// The orbit shell bounds are not finite with `0 <= min <= max`.
    #[error("distance shell [{min}, {max}] is not a valid range")]
    InvalidShell { min: f32, max: f32 },
}
