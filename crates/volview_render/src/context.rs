//! WGPU device, queue and surface management

use std::fmt;
use std::sync::Arc;
use winit::dpi::PhysicalSize;
use winit::window::Window;

/// Errors while setting up the GPU
#[derive(Debug)]
pub enum ContextError {
    /// The window could not be turned into a surface
    Surface(String),
    /// No adapter can present to the surface
    NoAdapter,
    /// The adapter refused to create a device
    Device(String),
}

impl fmt::Display for ContextError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContextError::Surface(msg) => write!(f, "Surface creation failed: {}", msg),
            ContextError::NoAdapter => write!(f, "No compatible GPU adapter found"),
            ContextError::Device(msg) => write!(f, "Device creation failed: {}", msg),
        }
    }
}

impl std::error::Error for ContextError {}

/// Everything needed to draw into a window
pub struct RenderContext {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub size: PhysicalSize<u32>,
}

impl RenderContext {
    /// Create a context, choosing the present mode from `vsync`
    pub async fn with_vsync(window: Arc<Window>, vsync: bool) -> Result<Self, ContextError> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window)
            .map_err(|e| ContextError::Surface(e.to_string()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(ContextError::NoAdapter)?;

        log::info!("Using adapter: {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Volview Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: slice_limits(&adapter.limits()),
                    ..Default::default()
                },
                None,
            )
            .await
            .map_err(|e| ContextError::Device(e.to_string()))?;

        device.on_uncaptured_error(Box::new(|e| {
            log::error!("GPU error: {}", e);
        }));

        let caps = surface.get_capabilities(&adapter);
        // Slices are composited in the stored (non-sRGB) space
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| ContextError::Surface("surface reports no formats".to_string()))?;

        let present_mode = if vsync {
            wgpu::PresentMode::AutoVsync
        } else {
            wgpu::PresentMode::AutoNoVsync
        };

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode,
            desired_maximum_frame_latency: 2,
            alpha_mode: caps.alpha_modes[0],
            view_formats: vec![],
        };
        surface.configure(&device, &config);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            size,
        })
    }

    /// Reconfigure the surface for a new window size
    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.size = new_size;
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Width over height of the surface
    pub fn aspect_ratio(&self) -> f32 {
        self.config.width as f32 / self.config.height.max(1) as f32
    }
}

/// Default limits, with the texture size limits taken from the adapter
///
/// Large slice stacks need more array layers and larger 3D textures than
/// the defaults allow.
fn slice_limits(adapter: &wgpu::Limits) -> wgpu::Limits {
    wgpu::Limits {
        max_texture_dimension_2d: adapter.max_texture_dimension_2d,
        max_texture_dimension_3d: adapter.max_texture_dimension_3d,
        max_texture_array_layers: adapter.max_texture_array_layers,
        ..wgpu::Limits::default()
    }
}
