//! Core types for the volview slice viewer
//!
//! - [`CameraState`] - orbit angles, zoom and slice spacing
//! - [`visibility_order`] - back-to-front draw order for a slice stack
//! - [`ViewerState`] / [`reduce`] - pure `(state, event) -> state` input handling
//! - [`ShadingParams`] - per-channel opacity and intensity
//! - [`SliceStack`] - a loaded image sequence, and the [`Volume`] built from it

pub mod camera;
pub mod shading;
pub mod slice_order;
pub mod slice_stack;
pub mod viewer;

pub use camera::{camera_from_drag, drag_fraction, CameraState, DragMargins, WindowExtent};
pub use shading::{Channel, ShadingMode, ShadingParams};
pub use slice_order::{
    clamp_divisor, slice_depth, split_index, visibility_order, MAX_DIVISOR, MIN_DIVISOR,
};
pub use slice_stack::{decode_slice, SliceNaming, SliceStack, SliceStackError, Volume};
pub use viewer::{reduce, InputState, InputTuning, PointerButton, ViewerEvent, ViewerState};
