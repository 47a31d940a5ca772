//! Body textures: image decoding, upload with a blitted mip chain, and a
//! solid-color stand-in when the image cannot be used.

use std::path::{Path, PathBuf};

/// Surface textures are stored as sRGB and sampled as linear color.
pub const BODY_TEXTURE_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;
const BYTES_PER_TEXEL: u32 = 4;

#[derive(Debug, thiserror::Error)]
pub enum TextureError {
    #[error("failed to decode {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("texture data size ({actual}) does not match expected ({expected}) for {width}x{height}")]
    DataSizeMismatch {
        actual: usize,
        expected: usize,
        width: u32,
        height: u32,
    },

    #[error("texture dimensions must be non-zero, got {width}x{height}")]
    ZeroDimensions { width: u32, height: u32 },

    #[error("texture {width}x{height} exceeds the device limit of {max}")]
    TooLarge { width: u32, height: u32, max: u32 },
}

/// Number of mip levels down to 1x1 for the given dimensions.
pub fn mip_level_count(width: u32, height: u32) -> u32 {
    32 - width.max(height).max(1).leading_zeros()
}

/// An uploaded texture with the bind group the sphere pipeline samples.
pub struct BodyTexture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub bind_group: wgpu::BindGroup,
    pub dimensions: (u32, u32),
    pub mip_level_count: u32,
    /// Whether this is the solid-color stand-in.
    pub fallback: bool,
}

const BLIT_SHADER_SOURCE: &str = r#"
@group(0) @binding(0) var src_texture: texture_2d<f32>;
@group(0) @binding(1) var src_sampler: sampler;

struct VertexOutput {
    @builtin(position) position: vec4<f32>,
    @location(0) uv: vec2<f32>,
};

@vertex
fn vs_main(@builtin(vertex_index) idx: u32) -> VertexOutput {
    let uv = vec2<f32>(f32((idx << 1u) & 2u), f32(idx & 2u));
    var out: VertexOutput;
    out.position = vec4<f32>(uv * 2.0 - 1.0, 0.0, 1.0);
    out.uv = vec2<f32>(uv.x, 1.0 - uv.y);
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    return textureSample(src_texture, src_sampler, in.uv);
}
"#;

/// Creates [`BodyTexture`]s sharing one sampler and bind group layout.
pub struct TextureLoader {
    sampler: wgpu::Sampler,
    bind_group_layout: wgpu::BindGroupLayout,
    blit_pipeline: wgpu::RenderPipeline,
    blit_bind_group_layout: wgpu::BindGroupLayout,
    blit_sampler: wgpu::Sampler,
    generate_mipmaps: bool,
}

impl TextureLoader {
    pub fn new(device: &wgpu::Device, generate_mipmaps: bool) -> Self {
        // Trilinear filtering, wrapping horizontally across the seam.
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("body-sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::MipmapFilterMode::Linear,
            ..Default::default()
        });

        let bind_group_layout = texture_bind_group_layout(device, "body-texture-bind-group-layout");
        let blit_bind_group_layout = texture_bind_group_layout(device, "blit-bind-group-layout");

        let blit_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("blit-shader"),
            source: wgpu::ShaderSource::Wgsl(BLIT_SHADER_SOURCE.into()),
        });
        let blit_pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("blit-pipeline-layout"),
            bind_group_layouts: &[&blit_bind_group_layout],
            immediate_size: 0,
        });
        let blit_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("mipmap-pipeline"),
            layout: Some(&blit_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &blit_shader,
                entry_point: Some("vs_main"),
                buffers: &[],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &blit_shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: BODY_TEXTURE_FORMAT,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            multiview_mask: None,
            cache: None,
        });

        let blit_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("blit-sampler"),
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        Self {
            sampler,
            bind_group_layout,
            blit_pipeline,
            blit_bind_group_layout,
            blit_sampler,
            generate_mipmaps,
        }
    }

    /// Layout of group 2 in the sphere pipeline: texture + sampler.
    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout
    }

    /// Load `path`, or fall back to a 1x1 texture of `fallback` (sRGB RGBA)
    /// if the file is missing, undecodable or too large for the device.
    pub fn load_or_fallback(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        path: &Path,
        fallback: [u8; 4],
    ) -> Result<BodyTexture, TextureError> {
        match self.load(device, queue, path) {
            Ok(texture) => Ok(texture),
            Err(e) => {
                log::warn!("{e}; using solid color {fallback:?}");
                let mut texture = self.solid_color(device, queue, fallback)?;
                texture.fallback = true;
                Ok(texture)
            }
        }
    }

    pub fn load(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        path: &Path,
    ) -> Result<BodyTexture, TextureError> {
        let (pixels, width, height) = decode_rgba(path)?;
        let max = device.limits().max_texture_dimension_2d;
        if width > max || height > max {
            return Err(TextureError::TooLarge { width, height, max });
        }
        let label = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "body".to_string());
        self.from_rgba(device, queue, &label, &pixels, width, height)
    }

    pub fn solid_color(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        rgba: [u8; 4],
    ) -> Result<BodyTexture, TextureError> {
        self.upload(device, queue, "solid-color", &rgba, 1, 1, 1)
    }

    /// Upload tightly packed RGBA8 pixels.
    pub fn from_rgba(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        label: &str,
        pixels: &[u8],
        width: u32,
        height: u32,
    ) -> Result<BodyTexture, TextureError> {
        let mips = if self.generate_mipmaps {
            mip_level_count(width, height)
        } else {
            1
        };
        self.upload(device, queue, label, pixels, width, height, mips)
    }

    #[allow(clippy::too_many_arguments)]
    fn upload(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        label: &str,
        pixels: &[u8],
        width: u32,
        height: u32,
        mip_levels: u32,
    ) -> Result<BodyTexture, TextureError> {
        validate(pixels, width, height)?;

        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: mip_levels,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: BODY_TEXTURE_FORMAT,
            usage: wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::COPY_DST
                | wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            pixels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(width * BYTES_PER_TEXEL),
                rows_per_image: None,
            },
            size,
        );

        if mip_levels > 1 {
            self.blit_mip_chain(device, queue, &texture, mip_levels);
        }

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("{label}-bind-group")),
            layout: &self.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        });

        log::info!("Created texture '{label}' ({width}x{height}, {mip_levels} mips)");
        Ok(BodyTexture {
            texture,
            view,
            bind_group,
            dimensions: (width, height),
            mip_level_count: mip_levels,
            fallback: false,
        })
    }

    /// Fill levels `1..mip_count` by rendering each level from the previous.
    fn blit_mip_chain(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        texture: &wgpu::Texture,
        mip_count: u32,
    ) {
        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("mipmap-encoder"),
        });

        for level in 1..mip_count {
            let src_view = texture.create_view(&wgpu::TextureViewDescriptor {
                base_mip_level: level - 1,
                mip_level_count: Some(1),
                ..Default::default()
            });
            let dst_view = texture.create_view(&wgpu::TextureViewDescriptor {
                base_mip_level: level,
                mip_level_count: Some(1),
                ..Default::default()
            });

            let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("mipmap-bind-group"),
                layout: &self.blit_bind_group_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(&src_view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::Sampler(&self.blit_sampler),
                    },
                ],
            });

            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("mipmap-pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &dst_view,
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
            pass.set_pipeline(&self.blit_pipeline);
            pass.set_bind_group(0, &bind_group, &[]);
            pass.draw(0..3, 0..1);
        }

        queue.submit(std::iter::once(encoder.finish()));
    }
}

/// Decode any supported image file into tightly packed RGBA8.
pub fn decode_rgba(path: &Path) -> Result<(Vec<u8>, u32, u32), TextureError> {
    let image = image::open(path).map_err(|source| TextureError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    let rgba = image.into_rgba8();
    let (width, height) = rgba.dimensions();
    Ok((rgba.into_raw(), width, height))
}

fn texture_bind_group_layout(device: &wgpu::Device, label: &str) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(label),
        entries: &[
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    view_dimension: wgpu::TextureViewDimension::D2,
                    multisampled: false,
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 1,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            },
        ],
    })
}

fn validate(pixels: &[u8], width: u32, height: u32) -> Result<(), TextureError> {
    if width == 0 || height == 0 {
        return Err(TextureError::ZeroDimensions { width, height });
    }
    let expected = width as usize * height as usize * BYTES_PER_TEXEL as usize;
    if pixels.len() != expected {
        return Err(TextureError::DataSizeMismatch {
            actual: pixels.len(),
            expected,
            width,
            height,
        });
    }
    Ok(())
}
