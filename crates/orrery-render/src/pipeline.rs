//! Textured sphere pipeline with per-style depth and rasterizer state.
//!
//! Bind groups: 0 = camera matrices, 1 = body transform, 2 = texture.

use std::num::NonZeroU64;

use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use wgpu::util::DeviceExt;

use crate::depth::DepthBuffer;
use crate::mesh::{GpuMesh, sphere_vertex_layout};
use crate::texture::BodyTexture;

pub const SPHERE_SHADER_SOURCE: &str = include_str!("sphere.wgsl");

/// View and projection, uploaded once per frame before any draw.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct CameraUniform {
    pub view: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],
}

impl CameraUniform {
    pub fn new(view: Mat4, projection: Mat4) -> Self {
        Self {
            view: view.to_cols_array_2d(),
            projection: projection.to_cols_array_2d(),
        }
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new(Mat4::IDENTITY, Mat4::IDENTITY)
    }
}

/// Per-body object-to-world transform.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct ModelUniform {
    pub model: [[f32; 4]; 4],
}

impl ModelUniform {
    pub fn new(model: Mat4) -> Self {
        Self {
            model: model.to_cols_array_2d(),
        }
    }
}

/// How a sphere is rasterized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawStyle {
    /// Outside-facing body: depth tested and written, back faces culled.
    Opaque,
    /// Camera sits inside: front faces culled, depth tested but not
    /// written, so everything drawn afterwards lands on top.
    Skybox,
    /// Opaque state with line rasterization.
    Wireframe,
}

/// Depth state for a style. Skybox uses `LessEqual` so fragments on the far
/// side still pass against the cleared buffer.
pub fn depth_state(style: DrawStyle) -> wgpu::DepthStencilState {
    let (depth_write_enabled, depth_compare) = match style {
        DrawStyle::Opaque | DrawStyle::Wireframe => (true, DepthBuffer::COMPARE_FUNCTION),
        DrawStyle::Skybox => (false, wgpu::CompareFunction::LessEqual),
    };
    wgpu::DepthStencilState {
        format: DepthBuffer::FORMAT,
        depth_write_enabled,
        depth_compare,
        stencil: wgpu::StencilState::default(),
        bias: wgpu::DepthBiasState::default(),
    }
}

pub fn primitive_state(style: DrawStyle) -> wgpu::PrimitiveState {
    let (cull_mode, polygon_mode) = match style {
        DrawStyle::Opaque => (Some(wgpu::Face::Back), wgpu::PolygonMode::Fill),
        DrawStyle::Skybox => (Some(wgpu::Face::Front), wgpu::PolygonMode::Fill),
        DrawStyle::Wireframe => (Some(wgpu::Face::Back), wgpu::PolygonMode::Line),
    };
    wgpu::PrimitiveState {
        topology: wgpu::PrimitiveTopology::TriangleList,
        strip_index_format: None,
        front_face: wgpu::FrontFace::Ccw,
        cull_mode,
        unclipped_depth: false,
        polygon_mode,
        conservative: false,
    }
}

pub struct SpherePipeline {
    pub camera_bind_group_layout: wgpu::BindGroupLayout,
    pub model_bind_group_layout: wgpu::BindGroupLayout,
    opaque: wgpu::RenderPipeline,
    skybox: wgpu::RenderPipeline,
    wireframe: Option<wgpu::RenderPipeline>,
}

impl SpherePipeline {
    /// Build all pipelines. The wireframe variant is only created when the
    /// device has `POLYGON_MODE_LINE`.
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        texture_bind_group_layout: &wgpu::BindGroupLayout,
        wireframe_supported: bool,
    ) -> Self {
        let camera_bind_group_layout = uniform_layout(
            device,
            "sphere-camera-bind-group-layout",
            std::mem::size_of::<CameraUniform>() as u64,
        );
        let model_bind_group_layout = uniform_layout(
            device,
            "sphere-model-bind-group-layout",
            std::mem::size_of::<ModelUniform>() as u64,
        );

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("sphere-shader"),
            source: wgpu::ShaderSource::Wgsl(SPHERE_SHADER_SOURCE.into()),
        });

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("sphere-pipeline-layout"),
            bind_group_layouts: &[
                &camera_bind_group_layout,
                &model_bind_group_layout,
                texture_bind_group_layout,
            ],
            immediate_size: 0,
        });

        let build = |style: DrawStyle, label: &str| {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(&layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_main"),
                    buffers: &[sphere_vertex_layout()],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                },
                primitive: primitive_state(style),
                depth_stencil: Some(depth_state(style)),
                multisample: wgpu::MultisampleState::default(),
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some("fs_main"),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: surface_format,
                        blend: None,
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                }),
                multiview_mask: None,
                cache: None,
            })
        };

        let opaque = build(DrawStyle::Opaque, "sphere-opaque-pipeline");
        let skybox = build(DrawStyle::Skybox, "sphere-skybox-pipeline");
        let wireframe =
            wireframe_supported.then(|| build(DrawStyle::Wireframe, "sphere-wireframe-pipeline"));

        Self {
            camera_bind_group_layout,
            model_bind_group_layout,
            opaque,
            skybox,
            wireframe,
        }
    }

    pub fn supports_wireframe(&self) -> bool {
        self.wireframe.is_some()
    }

    /// The pipeline for `style`; wireframe falls back to opaque when the
    /// device cannot rasterize lines.
    pub fn pipeline(&self, style: DrawStyle) -> &wgpu::RenderPipeline {
        match style {
            DrawStyle::Opaque => &self.opaque,
            DrawStyle::Skybox => &self.skybox,
            DrawStyle::Wireframe => self.wireframe.as_ref().unwrap_or(&self.opaque),
        }
    }

    /// Record one textured sphere. Returns `false` if the mesh was released.
    pub fn draw(
        &self,
        render_pass: &mut wgpu::RenderPass<'_>,
        style: DrawStyle,
        camera: &SceneUniforms,
        model: &ModelBinding,
        texture: &BodyTexture,
        mesh: &GpuMesh,
    ) -> bool {
        if mesh.is_released() {
            return mesh.draw(render_pass);
        }
        render_pass.set_pipeline(self.pipeline(style));
        render_pass.set_bind_group(0, &camera.bind_group, &[]);
        render_pass.set_bind_group(1, &model.bind_group, &[]);
        render_pass.set_bind_group(2, &texture.bind_group, &[]);
        mesh.draw(render_pass)
    }
}

/// Camera uniform buffer and its bind group (group 0).
pub struct SceneUniforms {
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
}

impl SceneUniforms {
    pub fn new(device: &wgpu::Device, pipeline: &SpherePipeline) -> Self {
        let (buffer, bind_group) = uniform_binding(
            device,
            &pipeline.camera_bind_group_layout,
            "camera",
            bytemuck::bytes_of(&CameraUniform::default()),
        );
        Self { buffer, bind_group }
    }

    pub fn update(&self, queue: &wgpu::Queue, uniform: &CameraUniform) {
        queue.write_buffer(&self.buffer, 0, bytemuck::bytes_of(uniform));
    }
}

/// One body's transform buffer and bind group (group 1).
pub struct ModelBinding {
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
}

impl ModelBinding {
    pub fn new(device: &wgpu::Device, pipeline: &SpherePipeline, label: &str) -> Self {
        let (buffer, bind_group) = uniform_binding(
            device,
            &pipeline.model_bind_group_layout,
            label,
            bytemuck::bytes_of(&ModelUniform::new(Mat4::IDENTITY)),
        );
        Self { buffer, bind_group }
    }

    pub fn update(&self, queue: &wgpu::Queue, model: Mat4) {
        queue.write_buffer(&self.buffer, 0, bytemuck::bytes_of(&ModelUniform::new(model)));
    }
}

fn uniform_layout(device: &wgpu::Device, label: &str, size: u64) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(label),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: NonZeroU64::new(size),
            },
            count: None,
        }],
    })
}

fn uniform_binding(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    label: &str,
    contents: &[u8],
) -> (wgpu::Buffer, wgpu::BindGroup) {
    let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(&format!("{label}-uniform")),
        contents,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    });
    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(&format!("{label}-bind-group")),
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: buffer.as_entire_binding(),
        }],
    });
    (buffer, bind_group)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gpu::create_test_device_queue;
    use crate::texture::TextureLoader;
    use glam::Vec3;

    #[test]
    fn test_uniform_sizes() {
        assert_eq!(std::mem::size_of::<CameraUniform>(), 128);
        assert_eq!(std::mem::size_of::<ModelUniform>(), 64);
    }

    #[test]
    fn test_camera_uniform_is_column_major() {
        let view = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
        let uniform = CameraUniform::new(view, Mat4::IDENTITY);
        assert_eq!(uniform.view[3], [1.0, 2.0, 3.0, 1.0]);
        assert_eq!(uniform.projection, Mat4::IDENTITY.to_cols_array_2d());
    }

    #[test]
    fn test_opaque_state() {
        let depth = depth_state(DrawStyle::Opaque);
        assert!(depth.depth_write_enabled);
        assert_eq!(depth.depth_compare, wgpu::CompareFunction::Less);
        let primitive = primitive_state(DrawStyle::Opaque);
        assert_eq!(primitive.cull_mode, Some(wgpu::Face::Back));
        assert_eq!(primitive.front_face, wgpu::FrontFace::Ccw);
    }

    #[test]
    fn test_skybox_state() {
        let depth = depth_state(DrawStyle::Skybox);
        assert!(!depth.depth_write_enabled);
        assert_eq!(depth.depth_compare, wgpu::CompareFunction::LessEqual);
        assert_eq!(
            primitive_state(DrawStyle::Skybox).cull_mode,
            Some(wgpu::Face::Front)
        );
    }

    #[test]
    fn test_wireframe_state() {
        assert_eq!(
            primitive_state(DrawStyle::Wireframe).polygon_mode,
            wgpu::PolygonMode::Line
        );
        assert!(depth_state(DrawStyle::Wireframe).depth_write_enabled);
    }

    #[test]
    fn test_pipeline_creation() {
        let Some((device, _queue)) = create_test_device_queue() else {
            return;
        };
        let textures = TextureLoader::new(&device, false);
        let pipeline = SpherePipeline::new(
            &device,
            wgpu::TextureFormat::Rgba8UnormSrgb,
            textures.bind_group_layout(),
            false,
        );
        assert!(!pipeline.supports_wireframe());
        let _ = pipeline.pipeline(DrawStyle::Wireframe);
        let _ = SceneUniforms::new(&device, &pipeline);
        let _ = ModelBinding::new(&device, &pipeline, "earth");
    }
}
