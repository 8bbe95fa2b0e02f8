//! Rendering pipeline components
//!
//! This module contains the alpha-blended slice pipeline and the GPU data
//! types it consumes.

pub mod slice_pipeline;
pub mod types;

pub use slice_pipeline::SlicePipeline;
pub use types::{FrameUniforms, QuadVertex, SliceInstance, QUAD_INDICES, QUAD_VERTICES};
