//! GPU rendering system
//!
//! Manages GPU rendering including:
//! - Render context and surface
//! - Slice textures and the compositing pipeline
//! - Frame rendering

use std::sync::Arc;
use winit::window::Window;
use volview_core::{SliceStack, ViewerState};
use volview_math::mat4;
use volview_render::{
    build_instances, opacity_exponent,
    pipeline::{FrameUniforms, SlicePipeline},
    CompositeMode, ContextError, RenderContext, SliceTextures, TextureLimitError,
};
use crate::config::{CameraConfig, RenderingConfig};

/// Render error types
#[derive(Debug)]
pub enum RenderError {
    /// GPU setup failed
    Context(ContextError),
    /// The slice stack does not fit the device's texture limits
    Texture(TextureLimitError),
    /// Surface was lost (window resized, minimized, etc.)
    SurfaceLost,
    /// GPU out of memory
    OutOfMemory,
    /// Other surface error
    Other(String),
}

impl std::fmt::Display for RenderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RenderError::Context(e) => write!(f, "GPU setup failed: {}", e),
            RenderError::Texture(e) => write!(f, "Slice upload failed: {}", e),
            RenderError::SurfaceLost => write!(f, "Surface lost"),
            RenderError::OutOfMemory => write!(f, "Out of memory"),
            RenderError::Other(msg) => write!(f, "Render error: {}", msg),
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RenderError::Context(e) => Some(e),
            RenderError::Texture(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ContextError> for RenderError {
    fn from(e: ContextError) -> Self {
        RenderError::Context(e)
    }
}

impl From<TextureLimitError> for RenderError {
    fn from(e: TextureLimitError) -> Self {
        RenderError::Texture(e)
    }
}

/// Manages GPU rendering
pub struct RenderSystem {
    context: RenderContext,
    pipeline: SlicePipeline,
    textures: SliceTextures,
    render_config: RenderingConfig,
    camera_config: CameraConfig,
}

impl RenderSystem {
    /// Create render system from window and config, uploading `stack` for `mode`
    pub fn new(
        window: Arc<Window>,
        stack: &SliceStack,
        mode: CompositeMode,
        render_config: RenderingConfig,
        camera_config: CameraConfig,
        vsync: bool,
    ) -> Result<Self, RenderError> {
        let context = pollster::block_on(RenderContext::with_vsync(window, vsync))?;

        let textures = SliceTextures::upload(&context.device, &context.queue, stack, mode)?;
        let mut pipeline = SlicePipeline::new(&context.device, context.config.format, mode);
        pipeline.bind_textures(&context.device, &textures);

        Ok(Self {
            context,
            pipeline,
            textures,
            render_config,
            camera_config,
        })
    }

    /// Current composite mode
    pub fn mode(&self) -> CompositeMode {
        self.pipeline.mode()
    }

    /// Switch composite mode, re-uploading the stack in the matching layout
    ///
    /// On error the current mode stays in place.
    pub fn set_mode(&mut self, stack: &SliceStack, mode: CompositeMode) -> Result<(), RenderError> {
        if mode == self.pipeline.mode() {
            return Ok(());
        }
        let device = &self.context.device;
        self.textures = SliceTextures::upload(device, &self.context.queue, stack, mode)?;
        self.pipeline = SlicePipeline::new(device, self.context.config.format, mode);
        self.pipeline.bind_textures(device, &self.textures);
        log::info!("Composite mode: {:?}", mode);
        Ok(())
    }

    /// Handle window resize
    pub fn resize(&mut self, width: u32, height: u32) {
        self.context
            .resize(winit::dpi::PhysicalSize::new(width, height));
    }

    /// Reconfigure the surface at its current size
    pub fn recover_surface(&mut self) {
        let size = self.context.size;
        self.context.resize(size);
    }

    /// Render a single frame
    pub fn render_frame(&mut self, state: &ViewerState) -> Result<(), RenderError> {
        let uniforms = frame_uniforms(
            state,
            &self.camera_config,
            self.context.aspect_ratio(),
            self.textures.layers() as usize,
            self.render_config.volume_planes,
            self.mode(),
        );
        self.pipeline.update_uniforms(&self.context.queue, &uniforms);

        let instances = build_instances(
            &state.camera,
            self.mode(),
            self.textures.layers() as usize,
            self.render_config.volume_planes,
        );
        self.pipeline
            .update_instances(&self.context.device, &self.context.queue, &instances);

        // Get surface texture
        let output = match self.context.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost) => return Err(RenderError::SurfaceLost),
            Err(wgpu::SurfaceError::OutOfMemory) => return Err(RenderError::OutOfMemory),
            Err(e) => return Err(RenderError::Other(format!("{:?}", e))),
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .context
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        let bg = &self.render_config.background_color;
        self.pipeline.render(
            &mut encoder,
            &view,
            wgpu::Color {
                r: bg[0] as f64,
                g: bg[1] as f64,
                b: bg[2] as f64,
                a: bg[3] as f64,
            },
        );

        self.context.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }

    /// Get current surface size
    pub fn size(&self) -> (u32, u32) {
        (self.context.size.width, self.context.size.height)
    }
}

/// Uniforms for one frame of `state`
fn frame_uniforms(
    state: &ViewerState,
    camera_config: &CameraConfig,
    aspect: f32,
    slice_count: usize,
    volume_planes: usize,
    mode: CompositeMode,
) -> FrameUniforms {
    let projection_matrix = mat4::perspective(
        camera_config.fov.to_radians(),
        aspect,
        camera_config.near,
        camera_config.far,
    );
    let shading = &state.shading;

    FrameUniforms {
        view_matrix: state.camera.view_matrix(),
        projection_matrix,
        alpha_factor: shading.alpha_factor,
        red_scale: shading.red_scale,
        blue_scale: shading.blue_scale,
        shading_mode: shading.mode.shader_id(),
        opacity_exponent: opacity_exponent(slice_count, mode.plane_count(slice_count, volume_planes)),
        ..FrameUniforms::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use volview_core::{CameraState, InputTuning, ShadingMode, ShadingParams};

    fn state(mode: ShadingMode) -> ViewerState {
        ViewerState::new(
            CameraState::new(1.0, 2.0),
            ShadingParams::new(mode),
            InputTuning::default(),
        )
    }

    #[test]
    fn test_render_error_display() {
        assert_eq!(format!("{}", RenderError::SurfaceLost), "Surface lost");
        assert_eq!(format!("{}", RenderError::OutOfMemory), "Out of memory");
        assert_eq!(
            format!("{}", RenderError::Other("test".to_string())),
            "Render error: test"
        );
        assert_eq!(
            format!("{}", RenderError::from(ContextError::NoAdapter)),
            format!("GPU setup failed: {}", ContextError::NoAdapter)
        );
    }

    #[test]
    fn test_oversized_stack_maps_to_texture_error() {
        let extent = wgpu::Extent3d {
            width: 512,
            height: 512,
            depth_or_array_layers: 300,
        };
        let err: RenderError = volview_render::check_extent(extent, CompositeMode::Slices, &wgpu::Limits::default())
            .unwrap_err()
            .into();
        assert!(matches!(err, RenderError::Texture(_)));
        assert!(std::error::Error::source(&err).is_some());
        assert!(err.to_string().contains("max_texture_array_layers"));
    }

    #[test]
    fn test_slice_mode_uniforms_keep_opacity() {
        let u = frame_uniforms(
            &state(ShadingMode::Grayscale),
            &CameraConfig::default(),
            1.0,
            22,
            128,
            CompositeMode::Slices,
        );
        assert_eq!(u.opacity_exponent, 1.0);
        assert_eq!(u.shading_mode, ShadingMode::Grayscale.shader_id());
        assert_eq!(u.view_matrix, CameraState::new(1.0, 2.0).view_matrix());
    }

    #[test]
    fn test_volume_mode_uniforms_correct_opacity() {
        let u = frame_uniforms(
            &state(ShadingMode::DualChannel),
            &CameraConfig::default(),
            1.0,
            64,
            128,
            CompositeMode::Volume,
        );
        assert!((u.opacity_exponent - 0.5).abs() < 1e-6);
    }
}
