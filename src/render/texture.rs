use std::path::Path;

use anyhow::{Context, Result};
use log::{info, warn};

/// Magenta so a missing texture is obvious on screen.
const PLACEHOLDER_TEXEL: [u8; 4] = [255, 0, 255, 255];

/// Decoded RGBA8 pixels ready for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl TextureImage {
    pub fn placeholder() -> Self {
        Self {
            width: 1,
            height: 1,
            rgba: PLACEHOLDER_TEXEL.to_vec(),
        }
    }

    /// Decodes an image file, flipped so the first row is the bottom of the
    /// image to match the cube's texture coordinates.
    pub fn decode(path: &Path) -> Result<Self> {
        let image = image::open(path)
            .with_context(|| format!("failed to decode texture {}", path.display()))?
            .flipv()
            .to_rgba8();
        let (width, height) = image.dimensions();
        Ok(Self {
            width,
            height,
            rgba: image.into_raw(),
        })
    }

    /// Decodes `path`, or logs the failure and returns the placeholder.
    pub fn load_or_placeholder(path: &Path) -> Self {
        match Self::decode(path) {
            Ok(image) => {
                info!(
                    "loaded texture {} ({}x{})",
                    path.display(),
                    image.width,
                    image.height
                );
                image
            }
            Err(err) => {
                warn!("Texture failed to load at: {}: {err:#}", path.display());
                Self::placeholder()
            }
        }
    }
}

/// Sampled 2D texture living on the GPU.
pub struct GpuTexture {
    _texture: wgpu::Texture,
    pub view: wgpu::TextureView,
}

impl GpuTexture {
    pub fn upload(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        image: &TextureImage,
        format: wgpu::TextureFormat,
        label: &str,
    ) -> Self {
        let size = wgpu::Extent3d {
            width: image.width,
            height: image.height,
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &image.rgba,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * image.width),
                rows_per_image: Some(image.height),
            },
            size,
        );
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self {
            _texture: texture,
            view,
        }
    }
}

pub fn create_sampler(device: &wgpu::Device) -> wgpu::Sampler {
    device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some("material-sampler"),
        address_mode_u: wgpu::AddressMode::Repeat,
        address_mode_v: wgpu::AddressMode::Repeat,
        address_mode_w: wgpu::AddressMode::Repeat,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        ..Default::default()
    })
}
