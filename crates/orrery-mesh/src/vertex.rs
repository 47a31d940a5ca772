//! Interleaved vertex record shared by the generator and the GPU upload path.

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};

/// One sphere sample: object-space position, unit normal and texture
/// coordinates, laid out as eight consecutive `f32`s.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

static_assertions::assert_eq_size!(Vertex, [u8; 32]);

impl Vertex {
    /// Byte stride of one vertex in an interleaved buffer.
    pub const STRIDE: u64 = std::mem::size_of::<Self>() as u64;
    /// Byte offset of the normal attribute.
    pub const NORMAL_OFFSET: u64 = 12;
    /// Byte offset of the uv attribute.
    pub const UV_OFFSET: u64 = 24;

    pub fn new(position: Vec3, normal: Vec3, uv: Vec2) -> Self {
        Self {
            position: position.to_array(),
            normal: normal.to_array(),
            uv: uv.to_array(),
        }
    }

    pub fn position(&self) -> Vec3 {
        Vec3::from_array(self.position)
    }

    pub fn normal(&self) -> Vec3 {
        Vec3::from_array(self.normal)
    }

    pub fn uv(&self) -> Vec2 {
        Vec2::from_array(self.uv)
    }
}
