//! Matrix helpers for the volview slice viewer
//!
//! All matrices are 4x4, column-major (`m[column][row]`), matching the layout
//! WGSL expects for `mat4x4<f32>` uniforms.
//!
//! - [`mat4`] - construction and composition of transforms
//! - [`vec3`] - small 3-component vector helpers used by the view matrix

pub mod mat4;
pub mod vec3;

pub use mat4::{Mat4, IDENTITY};
pub use vec3::Vec3;
