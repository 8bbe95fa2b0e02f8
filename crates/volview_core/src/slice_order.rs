//! Back-to-front ordering of a parallel slice stack
//!
//! Slices sit on planes perpendicular to Z at evenly spaced depths
//! `slice_depth(i) = 0.2 - 0.4 * i / (N - 1)`, so index 0 is the top of the
//! stack and index N-1 the bottom. Depths are divided by the spacing divisor
//! before use. The camera orbits on the YZ circle, so its position projected
//! onto the stack axis is `radius * cos(elevation)`.

/// Smallest allowed spacing divisor
pub const MIN_DIVISOR: f32 = 0.25;
/// Largest allowed spacing divisor
pub const MAX_DIVISOR: f32 = 10.0;
/// Depth of the first slice; the stack spans `[-STACK_HALF_DEPTH, STACK_HALF_DEPTH]`
pub const STACK_HALF_DEPTH: f32 = 0.2;

/// Depth of slice `index` in a stack of `count` slices, before the divisor
///
/// A single slice sits at depth 0.
pub fn slice_depth(index: usize, count: usize) -> f32 {
    if count <= 1 {
        return 0.0;
    }
    STACK_HALF_DEPTH - 2.0 * STACK_HALF_DEPTH * index as f32 / (count - 1) as f32
}

/// Clamp a spacing divisor to `[MIN_DIVISOR, MAX_DIVISOR]`
///
/// NaN maps to `MIN_DIVISOR`.
pub fn clamp_divisor(value: f32) -> f32 {
    if value.is_nan() {
        return MIN_DIVISOR;
    }
    value.clamp(MIN_DIVISOR, MAX_DIVISOR)
}

/// Index where the draw order wraps around
///
/// Scans from the bottom slice upward and stops at the first slice whose
/// scaled depth is not below `view_depth`. Never goes below 0. `divisor` must
/// be positive.
pub fn split_index(count: usize, view_depth: f32, divisor: f32) -> usize {
    if count == 0 {
        return 0;
    }

    let mut k = count - 1;
    while k > 0 && slice_depth(k, count) / divisor < view_depth {
        k -= 1;
    }
    k
}

/// Draw order for a stack of `count` slices seen from the given camera
///
/// From above (`cos(elevation) >= 0`) the order is `N-1, ..., k` followed by
/// `0, ..., k-1` with `k = split_index(..)`. From below the stack is mirrored:
/// the same split runs on the flipped axis and every index `i` is reported as
/// `N-1-i`, so texture `i` is always drawn at depth `slice_depth(i)`.
///
/// The result is always a permutation of `0..count`.
pub fn visibility_order(count: usize, elevation: f32, radius: f32, divisor: f32) -> Vec<usize> {
    let cos = elevation.cos();
    let view_depth = radius * cos.abs();
    let k = split_index(count, view_depth, divisor);

    let order = (k..count).rev().chain(0..k);
    if cos < 0.0 {
        order.map(|i| count - 1 - i).collect()
    } else {
        order.collect()
    }
}
