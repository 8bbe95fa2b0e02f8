//! GPU-compatible data types for the slice pipeline
//!
//! These types are designed to match the shader layouts exactly.
//! All types derive Pod and Zeroable for safe GPU buffer operations.

use bytemuck::{Pod, Zeroable};
use volview_math::{Mat4, IDENTITY};

/// A corner of the unit slice quad
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct QuadVertex {
    /// Position in slice space (z = 0)
    pub position: [f32; 3],
    /// Texture coordinate, v = 0 at the top row of the image
    pub tex_coord: [f32; 2],
}

/// Unit quad centred on the origin
pub const QUAD_VERTICES: [QuadVertex; 4] = [
    QuadVertex { position: [0.5, 0.5, 0.0], tex_coord: [1.0, 0.0] },   // top right
    QuadVertex { position: [0.5, -0.5, 0.0], tex_coord: [1.0, 1.0] },  // bottom right
    QuadVertex { position: [-0.5, -0.5, 0.0], tex_coord: [0.0, 1.0] }, // bottom left
    QuadVertex { position: [-0.5, 0.5, 0.0], tex_coord: [0.0, 0.0] },  // top left
];

/// Two triangles covering the quad
pub const QUAD_INDICES: [u16; 6] = [0, 1, 3, 1, 2, 3];

/// Per-slice instance data
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct SliceInstance {
    /// Model matrix (column-major)
    pub model: Mat4,
    /// Array layer (slices mode) or depth texture coordinate (volume mode)
    pub layer: f32,
    pub _padding: [f32; 3],
}

impl SliceInstance {
    pub fn new(model: Mat4, layer: f32) -> Self {
        Self {
            model,
            layer,
            _padding: [0.0; 3],
        }
    }
}

/// Per-frame uniforms
/// Layout: 160 bytes total (must match common.wgsl FrameUniforms)
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct FrameUniforms {
    /// View matrix (64 bytes)
    pub view_matrix: Mat4,
    /// Projection matrix (64 bytes)
    pub projection_matrix: Mat4,
    /// Shading factors (16 bytes)
    pub alpha_factor: f32,
    pub red_scale: f32,
    pub blue_scale: f32,
    pub shading_mode: u32,
    /// Exponent applied to `1 - alpha` to correct for plane count (16 bytes)
    pub opacity_exponent: f32,
    pub _padding: [f32; 3],
}

impl Default for FrameUniforms {
    fn default() -> Self {
        Self {
            view_matrix: IDENTITY,
            projection_matrix: IDENTITY,
            alpha_factor: 1.0,
            red_scale: 1.0,
            blue_scale: 1.0,
            shading_mode: 0,
            opacity_exponent: 1.0,
            _padding: [0.0; 3],
        }
    }
}
