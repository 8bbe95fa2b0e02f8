//! Stateful front for the pure viewer reducer

use volview_core::{reduce, CameraState, ViewerEvent, ViewerState};
use winit::event::{ElementState, MouseButton, MouseScrollDelta};
use winit::keyboard::KeyCode;

use crate::event_map::{map_key, map_mouse_button, scroll_lines};

/// Owns the current [`ViewerState`] and feeds winit input through [`reduce`]
pub struct ViewerController {
    state: ViewerState,
    /// Camera restored by [`ViewerController::reset`]
    home: CameraState,
}

impl ViewerController {
    pub fn new(state: ViewerState) -> Self {
        Self {
            home: state.camera,
            state,
        }
    }

    /// Current viewer state
    pub fn state(&self) -> &ViewerState {
        &self.state
    }

    /// Current camera
    pub fn camera(&self) -> &CameraState {
        &self.state.camera
    }

    /// Feed one event through the reducer
    pub fn dispatch(&mut self, event: ViewerEvent) {
        self.state = reduce(self.state, event);
    }

    /// Process keyboard input, returning whether the key was consumed
    pub fn process_keyboard(&mut self, key: KeyCode, state: ElementState) -> bool {
        match map_key(key, state) {
            Some(event) => {
                self.dispatch(event);
                true
            }
            None => false,
        }
    }

    /// Process mouse button input
    pub fn process_mouse_button(&mut self, button: MouseButton, state: ElementState) {
        if let Some(event) = map_mouse_button(button, state) {
            self.dispatch(event);
        }
    }

    /// Process an absolute cursor position in physical pixels
    pub fn process_cursor_moved(&mut self, x: f64, y: f64) {
        self.dispatch(ViewerEvent::CursorMoved {
            x: x as f32,
            y: y as f32,
        });
    }

    /// Process a mouse wheel or touchpad scroll
    pub fn process_scroll(&mut self, delta: MouseScrollDelta) {
        self.dispatch(ViewerEvent::Scrolled {
            lines: scroll_lines(delta),
        });
    }

    /// Process a window resize
    pub fn process_resize(&mut self, width: u32, height: u32) {
        self.dispatch(ViewerEvent::Resized {
            width: width as f32,
            height: height as f32,
        });
    }

    /// Restore the starting camera, keeping shading and window state
    pub fn reset(&mut self) {
        self.state = self.state.reset_camera(self.home);
    }
}
