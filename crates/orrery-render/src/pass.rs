//! Per-frame command encoding: [`RenderPassBuilder`] describes the single
//! scene pass, [`FrameEncoder`] owns the encoder and the acquired surface
//! texture until the frame is submitted and presented.

use crate::depth::DepthBuffer;

/// Convert a configured `[r, g, b]` clear color to an opaque `wgpu::Color`.
pub fn clear_color(rgb: [f64; 3]) -> wgpu::Color {
    wgpu::Color {
        r: rgb[0],
        g: rgb[1],
        b: rgb[2],
        a: 1.0,
    }
}

/// Color clear plus an optional depth attachment cleared to the far plane.
#[derive(Debug)]
pub struct RenderPassBuilder<'a> {
    clear_color: wgpu::Color,
    depth: Option<&'a wgpu::TextureView>,
    label: Option<&'static str>,
}

impl Default for RenderPassBuilder<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> RenderPassBuilder<'a> {
    /// Black clear, no depth.
    pub fn new() -> Self {
        Self {
            clear_color: wgpu::Color::BLACK,
            depth: None,
            label: None,
        }
    }

    pub fn clear_color(mut self, color: wgpu::Color) -> Self {
        self.clear_color = color;
        self
    }

    pub fn depth(mut self, depth: &'a DepthBuffer) -> Self {
        self.depth = Some(&depth.view);
        self
    }

    pub fn label(mut self, label: &'static str) -> Self {
        self.label = Some(label);
        self
    }

    fn begin<'e>(
        &self,
        encoder: &'e mut wgpu::CommandEncoder,
        color_view: &'e wgpu::TextureView,
    ) -> wgpu::RenderPass<'e>
    where
        'a: 'e,
    {
        let depth_stencil_attachment =
            self.depth
                .map(|view| wgpu::RenderPassDepthStencilAttachment {
                    view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(DepthBuffer::CLEAR_VALUE),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                });

        encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: self.label,
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(self.clear_color),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        })
    }
}

/// One frame's encoder and swapchain image. Consumed by [`FrameEncoder::finish`],
/// so a frame cannot be submitted twice.
pub struct FrameEncoder {
    encoder: wgpu::CommandEncoder,
    surface_texture: wgpu::SurfaceTexture,
    surface_view: wgpu::TextureView,
}

impl FrameEncoder {
    pub fn new(device: &wgpu::Device, surface_texture: wgpu::SurfaceTexture) -> Self {
        let encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("frame-encoder"),
        });
        let surface_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        Self {
            encoder,
            surface_texture,
            surface_view,
        }
    }

    pub fn begin_render_pass<'e>(
        &'e mut self,
        builder: &RenderPassBuilder<'e>,
    ) -> wgpu::RenderPass<'e> {
        builder.begin(&mut self.encoder, &self.surface_view)
    }

    /// Submit the recorded commands and present the surface texture.
    pub fn finish(self, queue: &wgpu::Queue) {
        queue.submit([self.encoder.finish()]);
        self.surface_texture.present();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clear_color_conversion() {
        let color = clear_color([0.1, 0.2, 0.3]);
        assert_eq!(color.r, 0.1);
        assert_eq!(color.g, 0.2);
        assert_eq!(color.b, 0.3);
        assert_eq!(color.a, 1.0);
    }

    #[test]
    fn test_default_clear_is_black() {
        let builder = RenderPassBuilder::new();
        assert_eq!(builder.clear_color, wgpu::Color::BLACK);
        assert!(builder.depth.is_none());
        assert!(builder.label.is_none());
    }

    #[test]
    fn test_builder_stores_settings() {
        let builder = RenderPassBuilder::new()
            .clear_color(wgpu::Color::RED)
            .label("scene");
        assert_eq!(builder.clear_color, wgpu::Color::RED);
        assert_eq!(builder.label, Some("scene"));
    }

    #[test]
    fn test_depth_attachment_set() {
        let Some((device, _queue)) = crate::gpu::create_test_device_queue() else {
            return;
        };
        let depth = DepthBuffer::new(&device, 16, 16);
        let builder = RenderPassBuilder::new().depth(&depth);
        assert!(builder.depth.is_some());
    }
}
