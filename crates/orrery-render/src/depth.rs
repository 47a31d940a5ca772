//! Depth buffer matching the camera's 0..1 projection: cleared to the far
//! plane (1.0), nearer fragments win with `Less`.

/// Depth attachment sized to the surface.
pub struct DepthBuffer {
    /// Backing depth texture.
    pub texture: wgpu::Texture,
    /// View bound as the render pass depth attachment.
    pub view: wgpu::TextureView,
    width: u32,
    height: u32,
}

impl DepthBuffer {
    /// 32-bit float depth.
    pub const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

    /// Far plane clear value.
    pub const CLEAR_VALUE: f32 = 1.0;

    /// Nearer fragments have smaller depth values.
    pub const COMPARE_FUNCTION: wgpu::CompareFunction = wgpu::CompareFunction::Less;

    /// Create a depth buffer; zero dimensions are clamped to 1.
    pub fn new(device: &wgpu::Device, width: u32, height: u32) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("depth-buffer"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        Self {
            texture,
            view,
            width: width.max(1),
            height: height.max(1),
        }
    }

    /// Recreate at the new size. No-op when unchanged.
    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        if self.width == width.max(1) && self.height == height.max(1) {
            return;
        }
        *self = Self::new(device, width, height);
    }

    /// Current width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Current height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }
}
