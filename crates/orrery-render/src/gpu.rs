//! GPU device initialization and surface management.
//!
//! [`RenderContext`] owns the wgpu instance, adapter, device, queue and
//! window surface.

use std::sync::Arc;

use winit::window::Window;

/// Error type for render context initialization failures.
#[derive(Debug, thiserror::Error)]
pub enum RenderContextError {
    #[error("no compatible GPU adapter found")]
    NoAdapter,

    #[error("failed to request GPU device: {0}")]
    DeviceRequest(#[from] wgpu::RequestDeviceError),

    #[error("failed to create surface: {0}")]
    SurfaceCreation(#[from] wgpu::CreateSurfaceError),

    #[error("surface reports no supported formats")]
    NoSurfaceFormat,
}

/// Error type for per-frame surface acquisition.
#[derive(Debug, thiserror::Error)]
pub enum SurfaceError {
    /// Lost and still lost after one reconfigure.
    #[error("surface lost")]
    Lost,

    #[error("out of memory")]
    OutOfMemory,

    /// Recoverable, skip the frame.
    #[error("timeout")]
    Timeout,
}

/// Choices made when the context is created.
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOptions {
    pub vsync: bool,
}

pub struct RenderContext {
    pub instance: wgpu::Instance,
    pub adapter: wgpu::Adapter,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub surface: wgpu::Surface<'static>,
    pub surface_config: wgpu::SurfaceConfiguration,
    pub surface_format: wgpu::TextureFormat,
    wireframe_supported: bool,
}

impl RenderContext {
    pub async fn new(window: Arc<Window>, options: RenderOptions) -> Result<Self, RenderContextError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let size = window.inner_size();
        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|_| RenderContextError::NoAdapter)?;

        let info = adapter.get_info();
        log::info!(
            "Selected GPU: {} ({:?}, {:?})",
            info.name,
            info.backend,
            info.device_type
        );

        // Line rasterization is optional; wireframe toggling degrades to a
        // no-op without it.
        let wireframe_supported = adapter
            .features()
            .contains(wgpu::Features::POLYGON_MODE_LINE);
        let required_features = if wireframe_supported {
            wgpu::Features::POLYGON_MODE_LINE
        } else {
            log::info!("Adapter lacks POLYGON_MODE_LINE, wireframe mode disabled");
            wgpu::Features::empty()
        };

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("orrery-device"),
                required_features,
                required_limits: wgpu::Limits::default(),
                memory_hints: wgpu::MemoryHints::default(),
                experimental_features: wgpu::ExperimentalFeatures::default(),
                trace: wgpu::Trace::Off,
            })
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = select_preferred_srgb_format(&surface_caps.formats)
            .ok_or(RenderContextError::NoSurfaceFormat)?;
        let present_mode = select_present_mode(options.vsync, &surface_caps.present_modes);
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &surface_config);
        log::info!(
            "Surface configured: {}x{} {:?} {:?}",
            surface_config.width,
            surface_config.height,
            surface_format,
            present_mode
        );

        Ok(Self {
            instance,
            adapter,
            device,
            queue,
            surface,
            surface_config,
            surface_format,
            wireframe_supported,
        })
    }

    /// Reconfigure the surface after a window resize. Dimensions are clamped
    /// to at least 1.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.surface_config.width = width.max(1);
        self.surface_config.height = height.max(1);
        self.surface.configure(&self.device, &self.surface_config);
    }

    /// Whether the device was created with line rasterization.
    pub fn supports_wireframe(&self) -> bool {
        self.wireframe_supported
    }

    /// Acquire the next frame. A lost or outdated surface is reconfigured
    /// and retried once.
    pub fn get_current_texture(&self) -> Result<wgpu::SurfaceTexture, SurfaceError> {
        match self.surface.get_current_texture() {
            Ok(texture) => Ok(texture),
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("Surface lost or outdated, reconfiguring");
                self.surface.configure(&self.device, &self.surface_config);
                self.surface
                    .get_current_texture()
                    .map_err(|_| SurfaceError::Lost)
            }
            Err(wgpu::SurfaceError::OutOfMemory) => Err(SurfaceError::OutOfMemory),
            Err(wgpu::SurfaceError::Timeout) => Err(SurfaceError::Timeout),
            Err(wgpu::SurfaceError::Other) => {
                log::error!("Unknown surface error occurred");
                Err(SurfaceError::Lost)
            }
        }
    }
}

/// Initialize the GPU synchronously using `pollster`.
pub fn init_render_context_blocking(
    window: Arc<Window>,
    options: RenderOptions,
) -> Result<RenderContext, RenderContextError> {
    pollster::block_on(RenderContext::new(window, options))
}

/// Prefer Bgra8UnormSrgb, then Rgba8UnormSrgb, then any sRGB format, then
/// whatever comes first.
fn select_preferred_srgb_format(formats: &[wgpu::TextureFormat]) -> Option<wgpu::TextureFormat> {
    [
        wgpu::TextureFormat::Bgra8UnormSrgb,
        wgpu::TextureFormat::Rgba8UnormSrgb,
    ]
    .into_iter()
    .find(|f| formats.contains(f))
    .or_else(|| formats.iter().copied().find(|f| f.is_srgb()))
    .or_else(|| formats.first().copied())
}

/// Fifo when vsync is requested (always supported); otherwise the lowest
/// latency mode available.
fn select_present_mode(vsync: bool, modes: &[wgpu::PresentMode]) -> wgpu::PresentMode {
    if vsync {
        return wgpu::PresentMode::Fifo;
    }
    [wgpu::PresentMode::Mailbox, wgpu::PresentMode::Immediate]
        .into_iter()
        .find(|m| modes.contains(m))
        .unwrap_or(wgpu::PresentMode::Fifo)
}

/// Create a headless device and queue. Returns `None` if no GPU is available.
#[cfg(test)]
pub(crate) fn create_test_device_queue() -> Option<(wgpu::Device, wgpu::Queue)> {
    pollster::block_on(async {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .ok()?;

        adapter
            .request_device(&wgpu::DeviceDescriptor::default())
            .await
            .ok()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_selection_prefers_bgra_srgb() {
        let formats = [
            wgpu::TextureFormat::Rgba8Unorm,
            wgpu::TextureFormat::Bgra8UnormSrgb,
            wgpu::TextureFormat::Rgba8UnormSrgb,
        ];
        assert_eq!(
            select_preferred_srgb_format(&formats),
            Some(wgpu::TextureFormat::Bgra8UnormSrgb)
        );
    }

    #[test]
    fn test_format_selection_fallback_rgba_srgb() {
        let formats = [
            wgpu::TextureFormat::Rgba8Unorm,
            wgpu::TextureFormat::Rgba8UnormSrgb,
        ];
        assert_eq!(
            select_preferred_srgb_format(&formats),
            Some(wgpu::TextureFormat::Rgba8UnormSrgb)
        );
    }

    #[test]
    fn test_format_selection_fallback_first() {
        let formats = [
            wgpu::TextureFormat::Bgra8Unorm,
            wgpu::TextureFormat::Rgba8Unorm,
        ];
        assert_eq!(
            select_preferred_srgb_format(&formats),
            Some(wgpu::TextureFormat::Bgra8Unorm)
        );
        assert_eq!(select_preferred_srgb_format(&[]), None);
    }

    #[test]
    fn test_vsync_uses_fifo() {
        let modes = [wgpu::PresentMode::Mailbox, wgpu::PresentMode::Fifo];
        assert_eq!(select_present_mode(true, &modes), wgpu::PresentMode::Fifo);
    }

    #[test]
    fn test_no_vsync_prefers_mailbox() {
        let modes = [
            wgpu::PresentMode::Fifo,
            wgpu::PresentMode::Immediate,
            wgpu::PresentMode::Mailbox,
        ];
        assert_eq!(select_present_mode(false, &modes), wgpu::PresentMode::Mailbox);
        assert_eq!(
            select_present_mode(false, &[wgpu::PresentMode::Fifo]),
            wgpu::PresentMode::Fifo
        );
    }
}
