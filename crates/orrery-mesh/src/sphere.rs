//! UV-sphere tessellation.
//!
//! Vertices are laid out stack by stack from the +Z pole (`v = 0`) to the -Z
//! pole (`v = 1`). Every stack carries `sectors + 1` vertices so the seam at
//! `u = 0` / `u = 1` is duplicated and texture coordinates never wrap inside
//! a triangle. Triangles wind counter-clockwise when seen from outside.

use std::f32::consts::{FRAC_PI_2, PI, TAU};

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::MeshError;
use crate::vertex::Vertex;

/// Fewest longitude subdivisions that still enclose a volume.
pub const MIN_SECTORS: u32 = 3;
/// Fewest latitude subdivisions that still emit a triangle.
pub const MIN_STACKS: u32 = 2;

/// How vertex normals are derived from positions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum NormalConvention {
    /// `position / radius`, unit length for any radius.
    #[default]
    Normalized,
    /// The raw position. Only valid on a unit sphere, where scale is applied
    /// by the model matrix instead.
    Position,
}

/// Tessellation parameters for one sphere.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SphereParams {
    pub radius: f32,
    pub sectors: u32,
    pub stacks: u32,
    #[serde(default)]
    pub normals: NormalConvention,
}

impl SphereParams {
    /// High-detail body seen up close.
    pub const EARTH: Self = Self::new(1.0, 288, 144);
    /// Small body, usually drawn scaled down.
    pub const MOON: Self = Self::new(1.0, 36, 18);
    /// Backdrop sphere surrounding the camera.
    pub const SKYBOX: Self = Self::new(1.0, 360, 180);

    pub const fn new(radius: f32, sectors: u32, stacks: u32) -> Self {
        Self {
            radius,
            sectors,
            stacks,
            normals: NormalConvention::Normalized,
        }
    }

    pub const fn with_normals(mut self, normals: NormalConvention) -> Self {
        self.normals = normals;
        self
    }

    /// Check the parameters without building anything.
    pub fn validate(&self) -> Result<(), MeshError> {
        if !self.radius.is_finite() || self.radius <= 0.0 {
            return Err(MeshError::NonPositiveRadius(self.radius));
        }
        if self.sectors < MIN_SECTORS {
            return Err(MeshError::TooFewSectors {
                got: self.sectors,
                min: MIN_SECTORS,
            });
        }
        if self.stacks < MIN_STACKS {
            return Err(MeshError::TooFewStacks {
                got: self.stacks,
                min: MIN_STACKS,
            });
        }
        let vertices = expected_vertex_count(self.sectors, self.stacks);
        if vertices > u64::from(u32::MAX) {
            return Err(MeshError::IndexOverflow { vertices });
        }
        if self.normals == NormalConvention::Position && (self.radius - 1.0).abs() > 1e-6 {
            return Err(MeshError::NonUnitPositionNormals(self.radius));
        }
        Ok(())
    }
}

impl Default for SphereParams {
    fn default() -> Self {
        Self::EARTH
    }
}

/// Number of vertices a `sectors x stacks` sphere produces.
pub fn expected_vertex_count(sectors: u32, stacks: u32) -> u64 {
    (u64::from(sectors) + 1) * (u64::from(stacks) + 1)
}

/// Number of indices a `sectors x stacks` sphere produces. The two polar
/// stacks contribute one triangle per sector, every other stack two.
pub fn expected_index_count(sectors: u32, stacks: u32) -> u64 {
    6 * u64::from(sectors) * u64::from(stacks).saturating_sub(1)
}

/// Immutable triangle-list geometry: interleaved vertices plus 32-bit indices.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
    params: SphereParams,
}

impl Mesh {
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// The parameters the mesh was built from.
    pub fn params(&self) -> &SphereParams {
        &self.params
    }

    /// Vertex data as raw bytes for buffer upload.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Index data as raw bytes for buffer upload.
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}

/// Build a UV-sphere with unit-length normals.
pub fn generate_sphere(radius: f32, sectors: u32, stacks: u32) -> Result<Mesh, MeshError> {
    generate_sphere_with(&SphereParams::new(radius, sectors, stacks))
}

/// Build a UV-sphere from explicit parameters.
pub fn generate_sphere_with(params: &SphereParams) -> Result<Mesh, MeshError> {
    params.validate()?;

    let SphereParams {
        radius,
        sectors,
        stacks,
        normals,
    } = *params;

    let sector_step = TAU / sectors as f32;
    let stack_step = PI / stacks as f32;
    let inv_radius = 1.0 / radius;

    let mut vertices = Vec::with_capacity(expected_vertex_count(sectors, stacks) as usize);
    for i in 0..=stacks {
        let stack_angle = FRAC_PI_2 - i as f32 * stack_step;
        let xy = radius * stack_angle.cos();
        let z = radius * stack_angle.sin();
        let v = i as f32 / stacks as f32;

        for j in 0..=sectors {
            let sector_angle = j as f32 * sector_step;
            let position = Vec3::new(xy * sector_angle.cos(), xy * sector_angle.sin(), z);
            let normal = match normals {
                NormalConvention::Normalized => position * inv_radius,
                NormalConvention::Position => position,
            };
            let u = j as f32 / sectors as f32;
            vertices.push(Vertex::new(position, normal, Vec2::new(u, v)));
        }
    }

    let mut indices = Vec::with_capacity(expected_index_count(sectors, stacks) as usize);
    let row = sectors + 1;
    for i in 0..stacks {
        let mut k1 = i * row;
        let mut k2 = k1 + row;
        for _ in 0..sectors {
            if i != 0 {
                indices.extend_from_slice(&[k1, k2, k1 + 1]);
            }
            if i != stacks - 1 {
                indices.extend_from_slice(&[k1 + 1, k2, k2 + 1]);
            }
            k1 += 1;
            k2 += 1;
        }
    }

    debug!(
        radius,
        sectors,
        stacks,
        vertices = vertices.len(),
        indices = indices.len(),
        "generated sphere mesh"
    );

    Ok(Mesh {
        vertices,
        indices,
        params: *params,
    })
}
