//! Procedural UV-sphere geometry for celestial bodies: vertex layout, owned
//! mesh buffers and tessellation presets.

pub mod error;
pub mod sphere;
pub mod vertex;

pub use error::MeshError;
pub use sphere::{
    MIN_SECTORS, MIN_STACKS, Mesh, NormalConvention, SphereParams, expected_index_count,
    expected_vertex_count, generate_sphere, generate_sphere_with,
};
pub use vertex::Vertex;
