//! Slice stack rendering
//!
//! This crate provides the wgpu-based pipeline that composites a stack of
//! slice images into an alpha-blended view.
//!
//! ## Key Components
//!
//! - [`context::RenderContext`] - WGPU device, queue, and surface management
//! - [`textures::SliceTextures`] - slices uploaded as a 2D array or a 3D texture
//! - [`pipeline::SlicePipeline`] - instanced, alpha-blended slice quads
//! - [`composite`] - per-frame instance data in back-to-front order

pub mod composite;
pub mod context;
pub mod pipeline;
pub mod textures;

pub use composite::{build_instances, opacity_exponent, CompositeMode};
pub use context::{ContextError, RenderContext};
pub use textures::{check_extent, SliceTextures, TextureLimitError};
