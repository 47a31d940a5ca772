use orrery_camera::CameraError;
use orrery_config::ConfigError;
use orrery_mesh::MeshError;
use orrery_render::{RenderContextError, TextureError};
use thiserror::Error;

/// Anything that stops the viewer from starting or keeps it from running.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("failed to create event loop: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("GPU initialization failed: {0}")]
    Render(#[from] RenderContextError),

    #[error("invalid sphere mesh: {0}")]
    Mesh(#[from] MeshError),

    #[error("texture upload failed: {0}")]
    Texture(#[from] TextureError),

    #[error("invalid camera settings: {0}")]
    Camera(#[from] CameraError),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}
