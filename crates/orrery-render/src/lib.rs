//! wgpu plumbing for the viewer: device and surface management, owned sphere
//! buffers, body textures, the sphere pipelines and frame encoding.

pub mod depth;
pub mod gpu;
pub mod mesh;
pub mod pass;
pub mod pipeline;
pub mod surface;
pub mod texture;

pub use depth::DepthBuffer;
pub use gpu::{
    RenderContext, RenderContextError, RenderOptions, SurfaceError, init_render_context_blocking,
};
pub use mesh::{GpuMesh, sphere_vertex_layout};
pub use pass::{FrameEncoder, RenderPassBuilder, clear_color};
pub use pipeline::{
    CameraUniform, DrawStyle, ModelBinding, ModelUniform, SPHERE_SHADER_SOURCE, SceneUniforms,
    SpherePipeline,
};
pub use surface::{PhysicalSize, SurfaceWrapper};
pub use texture::{BodyTexture, TextureError, TextureLoader, mip_level_count};
