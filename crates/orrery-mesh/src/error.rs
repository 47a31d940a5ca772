//! Tessellation errors.

use thiserror::Error;

/// Reasons a sphere cannot be tessellated. All of them are detected before
/// any vertex is emitted.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MeshError {
    #[error("sphere radius must be positive and finite, got {0}")]
    NonPositiveRadius(f32),

    #[error("sphere needs at least {min} sectors, got {got}")]
    TooFewSectors { got: u32, min: u32 },

    #[error("sphere needs at least {min} stacks, got {got}")]
    TooFewStacks { got: u32, min: u32 },

    #[error("{vertices} vertices cannot be addressed with 32-bit indices")]
    IndexOverflow { vertices: u64 },

    #[error("position normals are only unit length on a unit sphere (radius {0})")]
    NonUnitPositionNormals(f32),
}
