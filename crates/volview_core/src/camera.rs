//! Orbit camera around the slice stack
//!
//! The camera sits on a circle in the YZ plane at `radius` from the origin and
//! always looks at the origin. Azimuth spins the stack about its own Z axis
//! instead of moving the camera, so the view only depends on elevation and
//! radius.

use std::f32::consts::TAU;

use volview_math::mat4::{self, Mat4};
use volview_math::Vec3;

use crate::slice_order::{clamp_divisor, slice_depth, visibility_order};

/// Camera orientation, zoom and slice spacing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
    /// Spin of the stack about Z, radians (unbounded)
    pub azimuth: f32,
    /// Camera angle above the stack, radians (unbounded)
    pub elevation: f32,
    /// Distance from the origin
    pub radius: f32,
    /// Spacing divisor, always within `[MIN_DIVISOR, MAX_DIVISOR]`
    pub divisor: f32,
}

impl Default for CameraState {
    fn default() -> Self {
        Self {
            azimuth: 0.0,
            elevation: 0.0,
            radius: 1.0,
            divisor: 1.0,
        }
    }
}

impl CameraState {
    /// Camera at zero angles with the given zoom and spacing
    pub fn new(radius: f32, divisor: f32) -> Self {
        Self {
            radius,
            divisor: clamp_divisor(divisor),
            ..Self::default()
        }
    }

    /// Builder: set azimuth and elevation
    pub fn with_angles(mut self, azimuth: f32, elevation: f32) -> Self {
        self.azimuth = azimuth;
        self.elevation = elevation;
        self
    }

    /// Camera position in world space
    pub fn eye(&self) -> Vec3 {
        let (sin, cos) = self.elevation.sin_cos();
        [0.0, self.radius * sin, self.radius * cos]
    }

    /// Up vector for the view matrix
    ///
    /// Flips to -Y once the camera passes over the pole so the image does not
    /// turn upside down.
    pub fn up(&self) -> Vec3 {
        if self.elevation.cos() > 0.0 {
            [0.0, 1.0, 0.0]
        } else {
            [0.0, -1.0, 0.0]
        }
    }

    /// World-to-view matrix
    pub fn view_matrix(&self) -> Mat4 {
        mat4::look_at(self.eye(), [0.0; 3], self.up())
    }

    /// Scaled depth of slice `index` in a stack of `count`
    pub fn slice_offset(&self, index: usize, count: usize) -> f32 {
        slice_depth(index, count) / self.divisor
    }

    /// Model matrix for slice `index`: spin by azimuth, then lift to its depth
    pub fn slice_transform(&self, index: usize, count: usize) -> Mat4 {
        mat4::mul(
            mat4::rotation_z(self.azimuth),
            mat4::translation([0.0, 0.0, self.slice_offset(index, count)]),
        )
    }

    /// Back-to-front draw order for `count` slices
    pub fn draw_order(&self, count: usize) -> Vec<usize> {
        visibility_order(count, self.elevation, self.radius, self.divisor)
    }
}

/// Window size in pixels, used to normalize pointer motion
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowExtent {
    pub width: f32,
    pub height: f32,
}

impl WindowExtent {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

impl Default for WindowExtent {
    fn default() -> Self {
        Self::new(1600.0, 1600.0)
    }
}

/// Window fraction added on each side of a dimension when normalizing drags
///
/// A full turn takes `1.02 * width` horizontally but only `1.01 * height`
/// vertically.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragMargins {
    pub horizontal: f32,
    pub vertical: f32,
}

impl Default for DragMargins {
    fn default() -> Self {
        Self {
            horizontal: 0.01,
            vertical: 0.005,
        }
    }
}

/// Fraction of a window dimension covered by `delta` pixels
///
/// The dimension is widened by `border_margin` on each side, so a drag across
/// the whole client area falls slightly short of 1.
pub fn drag_fraction(delta: f32, extent: f32, border_margin: f32) -> f32 {
    let span = (1.0 + 2.0 * border_margin) * extent;
    if span > 0.0 {
        delta / span
    } else {
        0.0
    }
}

/// Orbit the camera by a pointer drag
///
/// `anchor` is the camera as it was when the drag started and `dx`/`dy` the
/// pointer offset from the drag start. A full (margin-widened) window width
/// turns the azimuth by one revolution; the same holds for height and
/// elevation, each with its own margin. Returns `anchor` unchanged when no
/// drag is active.
pub fn camera_from_drag(
    anchor: &CameraState,
    dx: f32,
    dy: f32,
    drag_active: bool,
    extent: WindowExtent,
    margins: DragMargins,
) -> CameraState {
    if !drag_active {
        return *anchor;
    }

    CameraState {
        azimuth: anchor.azimuth + drag_fraction(dx, extent.width, margins.horizontal) * TAU,
        elevation: anchor.elevation + drag_fraction(dy, extent.height, margins.vertical) * TAU,
        ..*anchor
    }
}
