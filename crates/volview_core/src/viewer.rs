//! Viewer state and the pure input reducer
//!
//! All interactive state lives in [`ViewerState`]. Input arrives as
//! [`ViewerEvent`]s and [`reduce`] produces the next state without touching
//! anything else, so every interaction can be replayed in a unit test.

use crate::camera::{camera_from_drag, drag_fraction, CameraState, DragMargins, WindowExtent};
use crate::shading::{Channel, ShadingParams};
use crate::slice_order::clamp_divisor;

/// Pointer buttons the viewer reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    /// Orbit drag
    Left,
    /// Spacing drag
    Right,
}

/// Input understood by the reducer
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewerEvent {
    CursorMoved { x: f32, y: f32 },
    ButtonPressed(PointerButton),
    ButtonReleased(PointerButton),
    /// Scroll by whole lines, positive away from the user
    Scrolled { lines: f32 },
    Resized { width: f32, height: f32 },
    SelectChannel(Channel),
    /// Step the active channel up (`+1`) or down (`-1`)
    AdjustChannel(i8),
}

/// Tunable constants for turning input into camera motion
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputTuning {
    /// Extra window fraction added on each side when normalizing drags
    pub drag_margins: DragMargins,
    /// Divisor change for a full-height right drag
    pub divisor_sensitivity: f32,
    /// Radius change per scroll line
    pub zoom_step: f32,
    /// Channel factor change per adjustment
    pub shading_step: f32,
    pub min_radius: f32,
    pub max_radius: f32,
}

impl Default for InputTuning {
    fn default() -> Self {
        Self {
            drag_margins: DragMargins::default(),
            divisor_sensitivity: 1.5,
            zoom_step: 0.05,
            shading_step: 0.05,
            min_radius: 0.05,
            max_radius: 20.0,
        }
    }
}

impl InputTuning {
    /// Keep `radius` within `[min_radius, max_radius]`
    ///
    /// Unlike `f32::clamp` this never panics on unordered or NaN bounds, and a
    /// NaN radius lands on `min_radius`.
    pub fn clamp_radius(&self, radius: f32) -> f32 {
        radius.max(self.min_radius).min(self.max_radius)
    }
}

/// Pointer state and drag anchors
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct InputState {
    pub cursor: (f32, f32),
    pub extent: WindowExtent,
    pub orbiting: bool,
    pub spacing: bool,
    /// Cursor position when the orbit drag began
    pub orbit_origin: (f32, f32),
    /// Camera when the orbit drag began
    pub orbit_anchor: CameraState,
    /// Cursor y when the spacing drag began
    pub spacing_origin: f32,
    /// Divisor when the spacing drag began
    pub spacing_anchor: f32,
}

/// Everything the viewer mutates in response to input
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ViewerState {
    pub camera: CameraState,
    pub input: InputState,
    pub shading: ShadingParams,
    pub tuning: InputTuning,
}

impl ViewerState {
    /// Initial state; the camera radius is clamped to the tuning bounds
    pub fn new(camera: CameraState, shading: ShadingParams, tuning: InputTuning) -> Self {
        let camera = CameraState {
            radius: tuning.clamp_radius(camera.radius),
            ..camera
        };
        Self {
            camera,
            input: InputState {
                orbit_anchor: camera,
                spacing_anchor: camera.divisor,
                ..InputState::default()
            },
            shading,
            tuning,
        }
    }

    /// Builder: set the window extent used for drag normalization
    pub fn with_extent(mut self, extent: WindowExtent) -> Self {
        self.input.extent = extent;
        self
    }

    /// Put the camera back to `camera`, dropping any drag in progress
    pub fn reset_camera(&self, camera: CameraState) -> ViewerState {
        let camera = CameraState {
            radius: self.tuning.clamp_radius(camera.radius),
            ..camera
        };
        let mut next = *self;
        next.camera = camera;
        next.input.orbiting = false;
        next.input.spacing = false;
        next.input.orbit_anchor = camera;
        next.input.spacing_anchor = camera.divisor;
        next
    }
}

/// `(previous state, event) -> next state`
pub fn reduce(state: ViewerState, event: ViewerEvent) -> ViewerState {
    let mut next = state;
    let tuning = state.tuning;

    match event {
        ViewerEvent::CursorMoved { x, y } => {
            let input = &state.input;
            if input.orbiting {
                let orbited = camera_from_drag(
                    &input.orbit_anchor,
                    x - input.orbit_origin.0,
                    y - input.orbit_origin.1,
                    true,
                    input.extent,
                    tuning.drag_margins,
                );
                next.camera.azimuth = orbited.azimuth;
                next.camera.elevation = orbited.elevation;
            }
            if input.spacing {
                let dy = drag_fraction(y - input.spacing_origin, input.extent.height, tuning.drag_margins.vertical);
                next.camera.divisor =
                    clamp_divisor(input.spacing_anchor + tuning.divisor_sensitivity * dy);
            }
            next.input.cursor = (x, y);
        }

        ViewerEvent::ButtonPressed(PointerButton::Left) => {
            next.input.orbiting = true;
            next.input.orbit_origin = state.input.cursor;
            next.input.orbit_anchor = state.camera;
        }
        ViewerEvent::ButtonReleased(PointerButton::Left) => {
            next.input.orbiting = false;
        }

        ViewerEvent::ButtonPressed(PointerButton::Right) => {
            next.input.spacing = true;
            next.input.spacing_origin = state.input.cursor.1;
            next.input.spacing_anchor = state.camera.divisor;
        }
        ViewerEvent::ButtonReleased(PointerButton::Right) => {
            next.input.spacing = false;
        }

        ViewerEvent::Scrolled { lines } => {
            next.camera.radius = tuning.clamp_radius(state.camera.radius - tuning.zoom_step * lines);
        }

        ViewerEvent::Resized { width, height } => {
            if width > 0.0 && height > 0.0 {
                next.input.extent = WindowExtent::new(width, height);
            }
        }

        ViewerEvent::SelectChannel(channel) => {
            next.shading = state.shading.with_active(channel);
        }
        ViewerEvent::AdjustChannel(direction) => {
            next.shading = state
                .shading
                .adjusted(f32::from(direction.signum()) * tuning.shading_step);
        }
    }

    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shading::ShadingMode;
    use crate::slice_order::{MAX_DIVISOR, MIN_DIVISOR};
    use std::f32::consts::TAU;

    const EPSILON: f32 = 1e-4;

    fn viewer() -> ViewerState {
        ViewerState::new(
            CameraState::new(1.0, 2.0),
            ShadingParams::new(ShadingMode::DualChannel),
            InputTuning::default(),
        )
        .with_extent(WindowExtent::new(1000.0, 1000.0))
    }

    fn replay(state: ViewerState, events: &[ViewerEvent]) -> ViewerState {
        events.iter().fold(state, |s, e| reduce(s, *e))
    }

    #[test]
    fn test_move_without_button_only_tracks_cursor() {
        let state = replay(viewer(), &[ViewerEvent::CursorMoved { x: 200.0, y: 300.0 }]);
        assert_eq!(state.input.cursor, (200.0, 300.0));
        assert_eq!(state.camera, viewer().camera);
    }

    #[test]
    fn test_left_drag_orbits() {
        let state = replay(
            viewer(),
            &[
                ViewerEvent::CursorMoved { x: 100.0, y: 100.0 },
                ViewerEvent::ButtonPressed(PointerButton::Left),
                ViewerEvent::CursorMoved { x: 355.0, y: 100.0 },
            ],
        );
        assert!((state.camera.azimuth - TAU / 4.0).abs() < EPSILON);
        assert!(state.camera.elevation.abs() < EPSILON);
    }

    #[test]
    fn test_press_without_motion_does_not_rotate() {
        let state = replay(
            viewer(),
            &[
                ViewerEvent::CursorMoved { x: 400.0, y: 400.0 },
                ViewerEvent::ButtonPressed(PointerButton::Left),
                ViewerEvent::CursorMoved { x: 400.0, y: 400.0 },
            ],
        );
        assert_eq!(state.camera.azimuth, 0.0);
        assert_eq!(state.camera.elevation, 0.0);
    }

    #[test]
    fn test_release_keeps_rotation_and_next_drag_continues() {
        let state = replay(
            viewer(),
            &[
                ViewerEvent::ButtonPressed(PointerButton::Left),
                ViewerEvent::CursorMoved { x: 0.0, y: 252.5 },
                ViewerEvent::ButtonReleased(PointerButton::Left),
                ViewerEvent::CursorMoved { x: 900.0, y: 900.0 },
            ],
        );
        assert!((state.camera.elevation - TAU / 4.0).abs() < EPSILON);
        assert_eq!(state.camera.azimuth, 0.0);

        let state = replay(
            state,
            &[
                ViewerEvent::ButtonPressed(PointerButton::Left),
                ViewerEvent::CursorMoved { x: 900.0, y: 1152.5 },
            ],
        );
        assert!((state.camera.elevation - TAU / 2.0).abs() < EPSILON);
    }

    #[test]
    fn test_right_drag_changes_divisor() {
        let state = replay(
            viewer(),
            &[
                ViewerEvent::CursorMoved { x: 0.0, y: 0.0 },
                ViewerEvent::ButtonPressed(PointerButton::Right),
                ViewerEvent::CursorMoved { x: 0.0, y: 505.0 },
            ],
        );
        // half the widened height at sensitivity 1.5
        assert!((state.camera.divisor - 2.75).abs() < EPSILON);
        assert_eq!(state.camera.azimuth, 0.0);
    }

    #[test]
    fn test_right_drag_respects_clamp() {
        let state = replay(
            viewer(),
            &[
                ViewerEvent::ButtonPressed(PointerButton::Right),
                ViewerEvent::CursorMoved { x: 0.0, y: -100_000.0 },
            ],
        );
        assert_eq!(state.camera.divisor, MIN_DIVISOR);

        let state = reduce(state, ViewerEvent::CursorMoved { x: 0.0, y: 100_000.0 });
        assert_eq!(state.camera.divisor, MAX_DIVISOR);

        let released = reduce(state, ViewerEvent::ButtonReleased(PointerButton::Right));
        let moved = reduce(released, ViewerEvent::CursorMoved { x: 0.0, y: 0.0 });
        assert_eq!(moved.camera.divisor, MAX_DIVISOR);
    }

    #[test]
    fn test_scroll_zooms_within_bounds() {
        let state = reduce(viewer(), ViewerEvent::Scrolled { lines: 2.0 });
        assert!((state.camera.radius - 0.9).abs() < EPSILON);

        let state = reduce(state, ViewerEvent::Scrolled { lines: 1000.0 });
        assert_eq!(state.camera.radius, state.tuning.min_radius);

        let state = reduce(state, ViewerEvent::Scrolled { lines: -10_000.0 });
        assert_eq!(state.camera.radius, state.tuning.max_radius);
    }

    #[test]
    fn test_resize_updates_drag_scale() {
        let state = replay(
            viewer(),
            &[
                ViewerEvent::Resized { width: 500.0, height: 500.0 },
                ViewerEvent::ButtonPressed(PointerButton::Left),
                ViewerEvent::CursorMoved { x: 255.0, y: 0.0 },
            ],
        );
        assert!((state.camera.azimuth - TAU / 2.0).abs() < EPSILON);
    }

    #[test]
    fn test_zero_resize_ignored() {
        let state = reduce(viewer(), ViewerEvent::Resized { width: 0.0, height: 0.0 });
        assert_eq!(state.input.extent, WindowExtent::new(1000.0, 1000.0));
    }

    #[test]
    fn test_channel_selection_and_adjustment() {
        let state = replay(
            viewer(),
            &[
                ViewerEvent::SelectChannel(Channel::Red),
                ViewerEvent::AdjustChannel(-1),
                ViewerEvent::AdjustChannel(-1),
                ViewerEvent::SelectChannel(Channel::Alpha),
                ViewerEvent::AdjustChannel(1),
            ],
        );
        assert!((state.shading.red_scale - 0.9).abs() < EPSILON);
        assert_eq!(state.shading.alpha_factor, 1.0);
        assert_eq!(state.shading.blue_scale, 1.0);
        assert_eq!(state.shading.active, Channel::Alpha);
    }

    #[test]
    fn test_reset_camera_ends_drags() {
        let dragging = replay(
            viewer(),
            &[
                ViewerEvent::ButtonPressed(PointerButton::Left),
                ViewerEvent::CursorMoved { x: 300.0, y: 0.0 },
            ],
        );
        let start = CameraState::new(1.0, 2.0);
        let reset = dragging.reset_camera(start);
        assert_eq!(reset.camera, start);
        assert!(!reset.input.orbiting);

        let moved = reduce(reset, ViewerEvent::CursorMoved { x: 900.0, y: 0.0 });
        assert_eq!(moved.camera, start);
    }

    #[test]
    fn test_out_of_range_start_radius_is_clamped() {
        let below = ViewerState::new(
            CameraState::new(-1.0, 1.0),
            ShadingParams::default(),
            InputTuning::default(),
        );
        assert_eq!(below.camera.radius, below.tuning.min_radius);
        assert_eq!(below.input.orbit_anchor.radius, below.tuning.min_radius);
        // camera stays on the +Z side, so the nearest slice is drawn last
        assert_eq!(below.camera.draw_order(5).last(), Some(&0));

        let zoomed = reduce(below, ViewerEvent::Scrolled { lines: 0.0 });
        assert_eq!(zoomed.camera.radius, below.camera.radius);

        let far = ViewerState::new(
            CameraState::new(500.0, 1.0),
            ShadingParams::default(),
            InputTuning::default(),
        );
        assert_eq!(far.camera.radius, far.tuning.max_radius);
    }

    #[test]
    fn test_zero_start_radius_has_usable_view() {
        let state = ViewerState::new(
            CameraState::new(0.0, 1.0),
            ShadingParams::default(),
            InputTuning::default(),
        );
        let view = state.camera.view_matrix();
        assert!(view.iter().flatten().all(|v| v.is_finite()));
        assert!((view[2][2] - 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_reset_camera_clamps_radius() {
        let reset = viewer().reset_camera(CameraState::new(-3.0, 2.0));
        assert_eq!(reset.camera.radius, reset.tuning.min_radius);
    }

    #[test]
    fn test_clamp_radius_tolerates_bad_bounds() {
        let tuning = InputTuning {
            min_radius: f32::NAN,
            ..InputTuning::default()
        };
        assert_eq!(tuning.clamp_radius(3.0), 3.0);
        assert_eq!(tuning.clamp_radius(f32::NAN), tuning.max_radius);
        assert_eq!(InputTuning::default().clamp_radius(f32::NAN), 0.05);
    }
}
