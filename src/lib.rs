//! Volview - slice stack viewer
//!
//! Library half of the `volview` binary, exposing configuration, input
//! actions, and the window and render systems.

pub mod config;
pub mod input;
pub mod systems;
