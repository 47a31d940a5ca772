//! Camera variant selection and tuning.

use serde::{Deserialize, Serialize};

use crate::error::CameraError;

/// Sign applied to vertical pointer deltas before they reach pitch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PitchConvention {
    /// `pitch -= dy * sensitivity`. With window coordinates (y grows
    /// downward), moving the pointer up looks up.
    #[default]
    Natural,
    /// `pitch += dy * sensitivity`. Moving the pointer up looks down.
    Inverted,
}

impl PitchConvention {
    /// Pitch change in degrees for a vertical delta already scaled by
    /// sensitivity.
    pub fn apply(self, scaled_dy: f32) -> f32 {
        match self {
            Self::Natural => -scaled_dy,
            Self::Inverted => scaled_dy,
        }
    }
}

/// Limits on the camera's distance from the world origin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub enum DistanceConstraint {
    #[default]
    None,
    /// Position is hard-clamped onto `[min, max]` after every move.
    Shell { min: f32, max: f32 },
}

impl DistanceConstraint {
    pub fn validate(&self) -> Result<(), CameraError> {
        match *self {
            Self::None => Ok(()),
            Self::Shell { min, max } => {
                if min.is_finite() && max.is_finite() && min >= 0.0 && min <= max {
                    Ok(())
                } else {
                    Err(CameraError::InvalidShell { min, max })
                }
            }
        }
    }
}

/// Whether the activity flag may be switched off.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivityToggle {
    #[default]
    Enabled,
    /// The camera always accepts input; toggle requests are ignored.
    AlwaysOn,
}

/// Camera tuning and variant selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// World units per second.
    pub speed: f32,
    /// Degrees per unit of pointer delta.
    pub sensitivity: f32,
    pub pitch_convention: PitchConvention,
    pub distance_constraint: DistanceConstraint,
    pub activity_toggle: ActivityToggle,
    /// Scale applied to scroll lines before dollying.
    pub zoom_speed: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            speed: 1.5,
            sensitivity: 0.2,
            pitch_convention: PitchConvention::Natural,
            distance_constraint: DistanceConstraint::None,
            activity_toggle: ActivityToggle::Enabled,
            zoom_speed: 5.0,
        }
    }
}

impl CameraConfig {
    pub fn validate(&self) -> Result<(), CameraError> {
        check_rate("speed", self.speed)?;
        check_rate("sensitivity", self.sensitivity)?;
        check_rate("zoom_speed", self.zoom_speed)?;
        self.distance_constraint.validate()
    }
}

fn check_rate(name: &'static str, value: f32) -> Result<(), CameraError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(CameraError::InvalidRate { name, value })
    }
}
