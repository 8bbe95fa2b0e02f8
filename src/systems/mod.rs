//! Application systems
//!
//! Window and GPU state kept out of main.rs so each can be tested on its own.

mod render;
mod window;

pub use render::{RenderError, RenderSystem};
pub use window::{WindowError, WindowSystem};
