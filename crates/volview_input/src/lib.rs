//! Input handling for the volview slice viewer
//!
//! Translates winit events into [`volview_core::ViewerEvent`]s and threads the
//! viewer state through the core reducer.

mod event_map;
mod viewer_controller;

pub use event_map::{map_key, map_mouse_button, scroll_lines};
pub use viewer_controller::ViewerController;
