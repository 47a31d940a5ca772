//! GPU-resident sphere geometry with single, explicit release.

use orrery_mesh::{Mesh, Vertex};
use wgpu::util::DeviceExt;

const SPHERE_ATTRIBUTES: [wgpu::VertexAttribute; 3] = [
    wgpu::VertexAttribute {
        offset: 0,
        shader_location: 0,
        format: wgpu::VertexFormat::Float32x3,
    },
    wgpu::VertexAttribute {
        offset: Vertex::NORMAL_OFFSET,
        shader_location: 1,
        format: wgpu::VertexFormat::Float32x3,
    },
    wgpu::VertexAttribute {
        offset: Vertex::UV_OFFSET,
        shader_location: 2,
        format: wgpu::VertexFormat::Float32x2,
    },
];

/// Interleaved position / normal / uv at locations 0, 1 and 2.
pub fn sphere_vertex_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: Vertex::STRIDE,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &SPHERE_ATTRIBUTES,
    }
}

struct MeshBuffers {
    vertex: wgpu::Buffer,
    index: wgpu::Buffer,
}

/// Owning handle over the vertex and index buffers of one [`Mesh`].
///
/// [`release`](Self::release) destroys the buffers the first time it is
/// called and does nothing afterwards; dropping the handle releases too.
/// A released mesh is skipped when drawn.
pub struct GpuMesh {
    label: String,
    buffers: Option<MeshBuffers>,
    vertex_count: u32,
    index_count: u32,
}

impl GpuMesh {
    pub fn upload(device: &wgpu::Device, label: &str, mesh: &Mesh) -> Self {
        let vertex = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label}-vertices")),
            contents: mesh.vertex_bytes(),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label}-indices")),
            contents: mesh.index_bytes(),
            usage: wgpu::BufferUsages::INDEX,
        });

        log::debug!(
            "Uploaded mesh '{label}' ({} vertices, {} triangles)",
            mesh.vertex_count(),
            mesh.triangle_count()
        );

        // Mesh generation already guarantees both counts fit in u32.
        Self {
            label: label.to_string(),
            buffers: Some(MeshBuffers { vertex, index }),
            vertex_count: mesh.vertex_count() as u32,
            index_count: mesh.index_count() as u32,
        }
    }

    /// Bind and draw the whole mesh. Returns `false` if the mesh was
    /// already released and nothing was recorded.
    pub fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>) -> bool {
        let Some(buffers) = &self.buffers else {
            log::warn!("Skipping draw of released mesh '{}'", self.label);
            return false;
        };
        render_pass.set_vertex_buffer(0, buffers.vertex.slice(..));
        render_pass.set_index_buffer(buffers.index.slice(..), wgpu::IndexFormat::Uint32);
        render_pass.draw_indexed(0..self.index_count, 0, 0..1);
        true
    }

    /// Destroy the GPU buffers. Returns `true` only on the call that
    /// actually released them.
    pub fn release(&mut self) -> bool {
        let Some(buffers) = self.buffers.take() else {
            return false;
        };
        buffers.vertex.destroy();
        buffers.index.destroy();
        log::debug!("Released mesh '{}'", self.label);
        true
    }

    pub fn is_released(&self) -> bool {
        self.buffers.is_none()
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    pub fn index_count(&self) -> u32 {
        self.index_count
    }
}

impl Drop for GpuMesh {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gpu::create_test_device_queue;
    use orrery_mesh::generate_sphere;

    #[test]
    fn test_layout_matches_vertex() {
        let layout = sphere_vertex_layout();
        assert_eq!(layout.array_stride, 32);
        assert_eq!(layout.attributes.len(), 3);
        assert_eq!(layout.attributes[1].offset, 12);
        assert_eq!(layout.attributes[2].offset, 24);
        assert_eq!(layout.attributes[2].format, wgpu::VertexFormat::Float32x2);
    }

    #[test]
    fn test_upload_keeps_counts() {
        let Some((device, _queue)) = create_test_device_queue() else {
            return;
        };
        let mesh = generate_sphere(1.0, 4, 2).unwrap();
        let gpu = GpuMesh::upload(&device, "tiny", &mesh);
        assert_eq!(gpu.vertex_count(), 15);
        assert_eq!(gpu.index_count(), 24);
        assert_eq!(gpu.label(), "tiny");
        assert!(!gpu.is_released());
    }

    #[test]
    fn test_release_is_idempotent() {
        let Some((device, _queue)) = create_test_device_queue() else {
            return;
        };
        let mesh = generate_sphere(1.0, 8, 4).unwrap();
        let mut gpu = GpuMesh::upload(&device, "moon", &mesh);
        assert!(gpu.release());
        assert!(gpu.is_released());
        assert!(!gpu.release());
        assert!(!gpu.release());
        drop(gpu);
    }

    #[test]
    fn test_released_mesh_is_not_drawn() {
        let Some((device, queue)) = create_test_device_queue() else {
            return;
        };
        let mesh = generate_sphere(1.0, 8, 4).unwrap();
        let mut gpu = GpuMesh::upload(&device, "earth", &mesh);
        gpu.release();

        let target = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("test-target"),
            size: wgpu::Extent3d {
                width: 4,
                height: 4,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8Unorm,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = target.create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("test-encoder"),
        });
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("test-pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                ..Default::default()
            });
            assert!(!gpu.draw(&mut pass));
        }
        queue.submit(std::iter::once(encoder.finish()));
    }
}
