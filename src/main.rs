//! Volview - slice stack viewer
//!
//! Composites a sequence of image slices back to front, with mouse orbit,
//! zoom, and slice spacing controls.

use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::PhysicalKey,
    window::WindowId,
};

use volview::config::AppConfig;
use volview::input::{InputAction, InputMapper};
use volview::systems::{RenderError, RenderSystem, WindowSystem};
use volview_core::{InputTuning, SliceStack, ViewerState, WindowExtent};
use volview_input::ViewerController;
use volview_render::CompositeMode;

/// Main application state
struct App {
    /// Application configuration
    config: AppConfig,
    /// Loaded slice images
    stack: SliceStack,
    /// Viewer state and input reducer
    controller: ViewerController,
    /// Composite mode to use when the renderer is (re)created
    composite: CompositeMode,
    window: Option<WindowSystem>,
    renderer: Option<RenderSystem>,
}

impl App {
    fn new(config: AppConfig, stack: SliceStack, tuning: InputTuning) -> Self {
        let extent = WindowExtent::new(config.window.width as f32, config.window.height as f32);
        let state = ViewerState::new(
            config.initial_camera(),
            config.initial_shading(),
            tuning,
        )
        .with_extent(extent);

        Self {
            composite: config.rendering.composite,
            controller: ViewerController::new(state),
            config,
            stack,
            window: None,
            renderer: None,
        }
    }

    fn handle_action(&mut self, action: InputAction, event_loop: &ActiveEventLoop) {
        match action {
            InputAction::Exit => event_loop.exit(),
            InputAction::ToggleFullscreen => {
                if let Some(window) = &self.window {
                    window.toggle_fullscreen();
                }
            }
            InputAction::ResetView => {
                self.controller.reset();
                log::info!("Camera reset to starting view");
            }
            InputAction::ToggleCompositeMode => {
                let next = self.composite.toggled();
                let switched = match &mut self.renderer {
                    Some(renderer) => renderer.set_mode(&self.stack, next),
                    None => Ok(()),
                };
                match switched {
                    Ok(()) => self.composite = next,
                    Err(e) => log::warn!("Staying in {:?} mode: {}", self.composite, e),
                }
            }
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.update_title(self.controller.camera(), self.composite);
        }

        if let Some(renderer) = &mut self.renderer {
            match renderer.render_frame(self.controller.state()) {
                Ok(()) => {}
                Err(RenderError::SurfaceLost) => renderer.recover_surface(),
                Err(RenderError::OutOfMemory) => {
                    log::error!("GPU out of memory");
                    event_loop.exit();
                    return;
                }
                Err(e) => log::warn!("{}", e),
            }
        }

        // Request next frame
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window = match WindowSystem::create(event_loop, &self.config.window) {
            Ok(window) => window,
            Err(e) => {
                log::error!("{}", e);
                event_loop.exit();
                return;
            }
        };

        let renderer = match RenderSystem::new(
            window.window().clone(),
            &self.stack,
            self.composite,
            self.config.rendering.clone(),
            self.config.camera.clone(),
            self.config.window.vsync,
        ) {
            Ok(renderer) => renderer,
            Err(e) => {
                log::error!("{}", e);
                event_loop.exit();
                return;
            }
        };

        // Drag normalization uses the real surface size, not the requested one
        let (width, height) = renderer.size();
        self.controller.process_resize(width, height);

        log::info!(
            "Viewing {} slices of {}x{} ({:?})",
            self.stack.len(),
            self.stack.width(),
            self.stack.height(),
            self.composite
        );

        self.window = Some(window);
        self.renderer = Some(renderer);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }

            WindowEvent::Resized(physical_size) => {
                if let Some(renderer) = &mut self.renderer {
                    renderer.resize(physical_size.width, physical_size.height);
                }
                self.controller
                    .process_resize(physical_size.width, physical_size.height);
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(key) = event.physical_key {
                    match InputMapper::map_keyboard(key, event.state) {
                        Some(action) => self.handle_action(action, event_loop),
                        None => {
                            self.controller.process_keyboard(key, event.state);
                        }
                    }
                }
            }

            WindowEvent::MouseInput { state, button, .. } => {
                self.controller.process_mouse_button(button, state);
            }

            WindowEvent::CursorMoved { position, .. } => {
                self.controller.process_cursor_moved(position.x, position.y);
            }

            WindowEvent::MouseWheel { delta, .. } => {
                self.controller.process_scroll(delta);
            }

            WindowEvent::RedrawRequested => self.redraw(event_loop),

            _ => {}
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let loaded = AppConfig::load();
    let log_level = loaded
        .as_ref()
        .map(|config| config.debug.log_level.clone())
        .unwrap_or_else(|_| "info".to_string());
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = loaded.unwrap_or_else(|e| {
        log::warn!("Failed to load config: {}. Using defaults.", e);
        AppConfig::default()
    });

    let tuning = config.input.to_tuning()?;
    let stack = SliceStack::load(
        &config.slices.directory,
        &config.slices.naming(),
        config.slices.count,
    )?;

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config, stack, tuning);
    event_loop.run_app(&mut app)?;
    Ok(())
}
