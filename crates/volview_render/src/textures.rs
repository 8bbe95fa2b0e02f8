//! Uploading slice images to the GPU
//!
//! Slices mode keeps each image as one layer of a 2D array texture. Volume
//! mode packs the same data into a 3D texture so the sampler can filter
//! between neighbouring slices.

use std::fmt;

use volview_core::{SliceStack, Volume};

use crate::composite::CompositeMode;

/// Texel format of uploaded slices (raw, not sRGB)
pub const SLICE_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

/// A stack that does not fit the device's texture limits
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureLimitError {
    pub mode: CompositeMode,
    /// Which limit was exceeded
    pub limit_name: &'static str,
    pub size: u32,
    pub limit: u32,
}

impl fmt::Display for TextureLimitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?} texture needs {} = {}, but the device allows {}",
            self.mode, self.limit_name, self.size, self.limit
        )
    }
}

impl std::error::Error for TextureLimitError {}

/// Check `extent` against `limits` for the texture `mode` creates
pub fn check_extent(
    extent: wgpu::Extent3d,
    mode: CompositeMode,
    limits: &wgpu::Limits,
) -> Result<(), TextureLimitError> {
    let checks = match mode {
        CompositeMode::Slices => [
            ("max_texture_dimension_2d", extent.width, limits.max_texture_dimension_2d),
            ("max_texture_dimension_2d", extent.height, limits.max_texture_dimension_2d),
            ("max_texture_array_layers", extent.depth_or_array_layers, limits.max_texture_array_layers),
        ],
        CompositeMode::Volume => [
            ("max_texture_dimension_3d", extent.width, limits.max_texture_dimension_3d),
            ("max_texture_dimension_3d", extent.height, limits.max_texture_dimension_3d),
            ("max_texture_dimension_3d", extent.depth_or_array_layers, limits.max_texture_dimension_3d),
        ],
    };

    match checks.into_iter().find(|(_, size, limit)| size > limit) {
        Some((limit_name, size, limit)) => Err(TextureLimitError {
            mode,
            limit_name,
            size,
            limit,
        }),
        None => Ok(()),
    }
}

/// A slice stack resident on the GPU
pub struct SliceTextures {
    // Owns the allocation behind `view`
    _texture: wgpu::Texture,
    view: wgpu::TextureView,
    sampler: wgpu::Sampler,
    mode: CompositeMode,
    layers: u32,
}

impl SliceTextures {
    /// Upload `stack` in the layout `mode` samples from
    ///
    /// Fails before touching the device when the stack exceeds its limits.
    pub fn upload(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        stack: &SliceStack,
        mode: CompositeMode,
    ) -> Result<Self, TextureLimitError> {
        let volume = stack.to_volume();
        let size = extent_for(&volume);
        check_extent(size, mode, &device.limits())?;

        let (dimension, view_dimension) = match mode {
            CompositeMode::Slices => (wgpu::TextureDimension::D2, wgpu::TextureViewDimension::D2Array),
            CompositeMode::Volume => (wgpu::TextureDimension::D3, wgpu::TextureViewDimension::D3),
        };

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Slice Texture"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension,
            format: SLICE_FORMAT,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        // Array layers and 3D depth slices share the same tightly packed layout
        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &volume.data,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(volume.width * 4),
                rows_per_image: Some(volume.height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor {
            label: Some("Slice Texture View"),
            dimension: Some(view_dimension),
            ..Default::default()
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Slice Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        log::info!(
            "Uploaded {} slices of {}x{} as {:?} texture",
            volume.depth, volume.width, volume.height, mode
        );

        Ok(Self {
            _texture: texture,
            view,
            sampler,
            mode,
            layers: volume.depth,
        })
    }

    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    pub fn sampler(&self) -> &wgpu::Sampler {
        &self.sampler
    }

    pub fn mode(&self) -> CompositeMode {
        self.mode
    }

    /// Number of slices uploaded
    pub fn layers(&self) -> u32 {
        self.layers
    }
}

/// Texture extent covering every layer of `volume`
pub fn extent_for(volume: &Volume) -> wgpu::Extent3d {
    wgpu::Extent3d {
        width: volume.width,
        height: volume.height,
        depth_or_array_layers: volume.depth.max(1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extent_for_volume() {
        let volume = Volume {
            width: 16,
            height: 8,
            depth: 22,
            data: vec![0; 16 * 8 * 22 * 4],
        };
        let extent = extent_for(&volume);
        assert_eq!(extent.width, 16);
        assert_eq!(extent.height, 8);
        assert_eq!(extent.depth_or_array_layers, 22);
    }

    fn extent(width: u32, height: u32, depth: u32) -> wgpu::Extent3d {
        wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: depth,
        }
    }

    #[test]
    fn test_check_extent_array_layers() {
        let limits = wgpu::Limits::default();
        assert!(check_extent(extent(512, 512, 256), CompositeMode::Slices, &limits).is_ok());

        let err = check_extent(extent(512, 512, 300), CompositeMode::Slices, &limits).unwrap_err();
        assert_eq!(err.limit_name, "max_texture_array_layers");
        assert_eq!(err.size, 300);
        assert_eq!(err.limit, 256);
    }

    #[test]
    fn test_check_extent_volume_side() {
        let limits = wgpu::Limits::default();
        // more layers than an array allows is fine in a 3D texture
        assert!(check_extent(extent(512, 512, 300), CompositeMode::Volume, &limits).is_ok());

        let err = check_extent(extent(4096, 512, 64), CompositeMode::Volume, &limits).unwrap_err();
        assert_eq!(err.limit_name, "max_texture_dimension_3d");
        assert_eq!(err.limit, 2048);
        assert!(check_extent(extent(4096, 4096, 64), CompositeMode::Slices, &limits).is_ok());
    }
}
