//! Turning the camera and stack size into per-frame instance data
//!
//! Both composite modes draw one quad per plane in back-to-front order. In
//! slices mode every loaded image is a plane. In volume mode the stack is
//! sampled as a 3D texture on a configurable number of evenly spaced planes,
//! with opacity corrected so the stack keeps roughly the same density.

use serde::{Deserialize, Serialize};
use volview_core::CameraState;

use crate::pipeline::SliceInstance;

/// How the slice stack is composited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompositeMode {
    /// One textured quad per loaded slice
    #[default]
    Slices,
    /// Planes resampled from a 3D texture
    Volume,
}

impl CompositeMode {
    /// The other mode
    pub fn toggled(self) -> Self {
        match self {
            CompositeMode::Slices => CompositeMode::Volume,
            CompositeMode::Volume => CompositeMode::Slices,
        }
    }

    /// Number of quads drawn per frame
    pub fn plane_count(self, slice_count: usize, volume_planes: usize) -> usize {
        match self {
            CompositeMode::Slices => slice_count,
            CompositeMode::Volume => volume_planes.max(1),
        }
    }
}

/// Exponent that keeps total opacity stable when `plane_count` planes stand in
/// for `slice_count` slices
pub fn opacity_exponent(slice_count: usize, plane_count: usize) -> f32 {
    if slice_count == 0 || plane_count == 0 {
        return 1.0;
    }
    slice_count as f32 / plane_count as f32
}

/// Depth texture coordinate for plane `plane` of `plane_count`, sampling a
/// volume with `depth` layers at layer centres
fn volume_coord(plane: usize, plane_count: usize, depth: usize) -> f32 {
    if depth == 0 {
        return 0.0;
    }
    let t = if plane_count > 1 {
        plane as f32 / (plane_count - 1) as f32
    } else {
        0.0
    };
    (t * (depth - 1) as f32 + 0.5) / depth as f32
}

/// Instances for one frame, already in draw order
pub fn build_instances(
    camera: &CameraState,
    mode: CompositeMode,
    slice_count: usize,
    volume_planes: usize,
) -> Vec<SliceInstance> {
    let planes = mode.plane_count(slice_count, volume_planes);
    if slice_count == 0 {
        return Vec::new();
    }

    camera
        .draw_order(planes)
        .into_iter()
        .map(|i| {
            let layer = match mode {
                CompositeMode::Slices => i as f32,
                CompositeMode::Volume => volume_coord(i, planes, slice_count),
            };
            SliceInstance::new(camera.slice_transform(i, planes), layer)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_slices_mode_follows_draw_order() {
        let camera = CameraState::new(1.0, 2.0);
        let instances = build_instances(&camera, CompositeMode::Slices, 22, 128);
        let layers: Vec<usize> = instances.iter().map(|i| i.layer as usize).collect();
        assert_eq!(layers, camera.draw_order(22));
        // bottom slice first when looking from above
        assert_eq!(layers[0], 21);
    }

    #[test]
    fn test_instance_depth_matches_layer() {
        let camera = CameraState::new(1.0, 1.0).with_angles(0.0, PI);
        for instance in build_instances(&camera, CompositeMode::Slices, 8, 0) {
            let index = instance.layer as usize;
            let z = instance.model[3][2];
            assert!((z - camera.slice_offset(index, 8)).abs() < 1e-6);
        }
    }

    #[test]
    fn test_volume_mode_plane_count() {
        let camera = CameraState::default();
        let instances = build_instances(&camera, CompositeMode::Volume, 22, 100);
        assert_eq!(instances.len(), 100);
        for instance in &instances {
            assert!(instance.layer > 0.0 && instance.layer < 1.0);
        }
    }

    #[test]
    fn test_volume_coord_hits_layer_centres() {
        // With as many planes as layers every plane samples a layer centre
        for i in 0..4 {
            let w = volume_coord(i, 4, 4);
            assert!((w - (i as f32 + 0.5) / 4.0).abs() < 1e-6);
        }
        assert_eq!(volume_coord(0, 1, 4), 0.125);
    }

    #[test]
    fn test_empty_stack_draws_nothing() {
        let camera = CameraState::default();
        assert!(build_instances(&camera, CompositeMode::Volume, 0, 64).is_empty());
        assert!(build_instances(&camera, CompositeMode::Slices, 0, 64).is_empty());
    }

    #[test]
    fn test_opacity_exponent() {
        assert_eq!(opacity_exponent(64, 64), 1.0);
        assert_eq!(opacity_exponent(32, 128), 0.25);
        assert_eq!(opacity_exponent(0, 128), 1.0);
    }

    #[test]
    fn test_toggle() {
        assert_eq!(CompositeMode::Slices.toggled(), CompositeMode::Volume);
        assert_eq!(CompositeMode::Volume.toggled().toggled(), CompositeMode::Volume);
    }
}
