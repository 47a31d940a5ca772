//! GPU side of the scene: one mesh, texture and transform binding per body,
//! the shared sphere pipelines, and the depth buffer.

use glam::{Mat4, Vec3};
use orrery_config::Config;
use orrery_mesh::{SphereParams, generate_sphere_with};
use orrery_render::{
    BodyTexture, CameraUniform, DepthBuffer, DrawStyle, FrameEncoder, GpuMesh, ModelBinding,
    RenderContext, RenderPassBuilder, SceneUniforms, SpherePipeline, SurfaceError, TextureLoader,
    clear_color,
};
use std::path::Path;
use tracing::{debug, info};

use crate::animation::SceneAnimation;
use crate::error::AppError;

const EARTH_FALLBACK: [u8; 4] = [40, 90, 200, 255];
const MOON_FALLBACK: [u8; 4] = [150, 150, 150, 255];
const SKY_FALLBACK: [u8; 4] = [0, 0, 0, 255];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    Skybox,
    Earth,
    Moon,
}

/// Draw order for one frame. The sky goes first with its own depth state so
/// that it never hides the bodies.
pub fn draw_order(
    skybox: bool,
    body_style: DrawStyle,
) -> impl Iterator<Item = (BodyKind, DrawStyle)> {
    skybox
        .then_some((BodyKind::Skybox, DrawStyle::Skybox))
        .into_iter()
        .chain([(BodyKind::Earth, body_style), (BodyKind::Moon, body_style)])
}

struct Body {
    mesh: GpuMesh,
    texture: BodyTexture,
    model: ModelBinding,
}

impl Body {
    fn build(
        gpu: &RenderContext,
        pipeline: &SpherePipeline,
        textures: &TextureLoader,
        label: &str,
        params: &SphereParams,
        texture_path: &Path,
        fallback: [u8; 4],
    ) -> Result<Self, AppError> {
        let mesh = generate_sphere_with(params)?;
        debug!(
            label,
            vertices = mesh.vertex_count(),
            indices = mesh.index_count(),
            "generated sphere"
        );
        let texture = textures.load_or_fallback(&gpu.device, &gpu.queue, texture_path, fallback)?;
        Ok(Self {
            mesh: GpuMesh::upload(&gpu.device, label, &mesh),
            texture,
            model: ModelBinding::new(&gpu.device, pipeline, label),
        })
    }
}

pub struct SceneRenderer {
    pipeline: SpherePipeline,
    uniforms: SceneUniforms,
    depth: DepthBuffer,
    earth: Body,
    moon: Body,
    skybox: Option<Body>,
    clear: wgpu::Color,
}

impl SceneRenderer {
    /// Generate and upload every body. Meshes are built once here and never
    /// rebuilt.
    pub fn new(
        gpu: &RenderContext,
        config: &Config,
        width: u32,
        height: u32,
    ) -> Result<Self, AppError> {
        let textures = TextureLoader::new(&gpu.device, config.render.mipmaps);
        let pipeline = SpherePipeline::new(
            &gpu.device,
            gpu.surface_format,
            textures.bind_group_layout(),
            gpu.supports_wireframe(),
        );
        let uniforms = SceneUniforms::new(&gpu.device, &pipeline);
        let depth = DepthBuffer::new(&gpu.device, width, height);

        let scene = &config.scene;
        let earth = Body::build(
            gpu,
            &pipeline,
            &textures,
            "earth",
            &scene.earth.sphere(),
            &scene.earth.texture,
            EARTH_FALLBACK,
        )?;
        let moon = Body::build(
            gpu,
            &pipeline,
            &textures,
            "moon",
            &scene.moon.sphere(),
            &scene.moon.texture,
            MOON_FALLBACK,
        )?;
        let skybox = if scene.skybox.enabled {
            Some(Body::build(
                gpu,
                &pipeline,
                &textures,
                "skybox",
                &scene.skybox.sphere(),
                &scene.skybox.texture,
                SKY_FALLBACK,
            )?)
        } else {
            None
        };

        info!(
            earth_triangles = earth.mesh.index_count() / 3,
            moon_triangles = moon.mesh.index_count() / 3,
            skybox = skybox.is_some(),
            "Scene ready"
        );

        Ok(Self {
            pipeline,
            uniforms,
            depth,
            earth,
            moon,
            skybox,
            clear: clear_color(config.render.clear_color),
        })
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.depth.resize(device, width, height);
    }

    pub fn supports_wireframe(&self) -> bool {
        self.pipeline.supports_wireframe()
    }

    /// Upload this frame's matrices, then draw sky, Earth and Moon in that
    /// order into the next swapchain image.
    pub fn render(
        &self,
        gpu: &RenderContext,
        view: Mat4,
        projection: Mat4,
        camera_position: Vec3,
        animation: &SceneAnimation,
        body_style: DrawStyle,
    ) -> Result<(), SurfaceError> {
        self.uniforms
            .update(&gpu.queue, &CameraUniform::new(view, projection));
        self.earth.model.update(&gpu.queue, animation.earth_model());
        self.moon.model.update(&gpu.queue, animation.moon_model());
        if let Some(skybox) = &self.skybox {
            skybox
                .model
                .update(&gpu.queue, animation.skybox_model(camera_position));
        }

        let surface_texture = gpu.get_current_texture()?;
        let mut frame = FrameEncoder::new(&gpu.device, surface_texture);
        let builder = RenderPassBuilder::new()
            .clear_color(self.clear)
            .depth(&self.depth)
            .label("scene-pass");
        {
            let mut pass = frame.begin_render_pass(&builder);
            for (kind, style) in draw_order(self.skybox.is_some(), body_style) {
                let body = match kind {
                    BodyKind::Skybox => match &self.skybox {
                        Some(skybox) => skybox,
                        None => continue,
                    },
                    BodyKind::Earth => &self.earth,
                    BodyKind::Moon => &self.moon,
                };
                self.pipeline.draw(
                    &mut pass,
                    style,
                    &self.uniforms,
                    &body.model,
                    &body.texture,
                    &body.mesh,
                );
            }
        }
        frame.finish(&gpu.queue);
        Ok(())
    }

    /// Destroy every mesh buffer. Returns how many meshes were released by
    /// this call; a second call returns 0.
    pub fn release(&mut self) -> usize {
        let mut released = 0;
        for body in [Some(&mut self.earth), Some(&mut self.moon), self.skybox.as_mut()]
            .into_iter()
            .flatten()
        {
            if body.mesh.release() {
                released += 1;
            }
        }
        released
    }
}
