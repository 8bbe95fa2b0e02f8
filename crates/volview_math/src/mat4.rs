//! 4x4 matrix utilities
//!
//! Column-major throughout: `m[c]` is column `c`, `m[c][r]` the element in row
//! `r`. Multiplication `mul(a, b)` applies `b` first, then `a`.

use crate::vec3::{self, Vec3};

/// 4x4 matrix type (column-major)
pub type Mat4 = [[f32; 4]; 4];

/// Identity matrix
pub const IDENTITY: Mat4 = [
    [1.0, 0.0, 0.0, 0.0],
    [0.0, 1.0, 0.0, 0.0],
    [0.0, 0.0, 1.0, 0.0],
    [0.0, 0.0, 0.0, 1.0],
];

/// Multiply two 4x4 matrices: result = a * b
#[allow(clippy::needless_range_loop)]
pub fn mul(a: Mat4, b: Mat4) -> Mat4 {
    let mut result = [[0.0f32; 4]; 4];

    for i in 0..4 {
        for j in 0..4 {
            for k in 0..4 {
                result[i][j] += a[k][j] * b[i][k];
            }
        }
    }

    result
}

/// Rotation about the Z axis by `angle` radians (X turns toward Y)
pub fn rotation_z(angle: f32) -> Mat4 {
    let (sn, cs) = angle.sin_cos();

    let mut m = IDENTITY;
    m[0][0] = cs;
    m[1][1] = cs;
    m[0][1] = sn;
    m[1][0] = -sn;
    m
}

/// Translation by `offset`
pub fn translation(offset: Vec3) -> Mat4 {
    let mut m = IDENTITY;
    m[3][0] = offset[0];
    m[3][1] = offset[1];
    m[3][2] = offset[2];
    m
}

/// Right-handed perspective projection with a `[0, 1]` depth range
///
/// `fov_y` is the full vertical field of view in radians.
pub fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
    let f = 1.0 / (fov_y / 2.0).tan();
    let range = far / (near - far);

    [
        [f / aspect, 0.0, 0.0, 0.0],
        [0.0, f, 0.0, 0.0],
        [0.0, 0.0, range, -1.0],
        [0.0, 0.0, range * near, 0.0],
    ]
}

/// Right-handed view matrix looking from `eye` toward `target`
pub fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Mat4 {
    let f = vec3::normalize(vec3::sub(target, eye));
    let s = vec3::normalize(vec3::cross(f, up));
    let u = vec3::cross(s, f);

    [
        [s[0], u[0], -f[0], 0.0],
        [s[1], u[1], -f[1], 0.0],
        [s[2], u[2], -f[2], 0.0],
        [-vec3::dot(s, eye), -vec3::dot(u, eye), vec3::dot(f, eye), 1.0],
    ]
}

/// Transform a point (w = 1) and return the homogeneous result
pub fn transform_point(m: Mat4, p: Vec3) -> [f32; 4] {
    let v = [p[0], p[1], p[2], 1.0];
    let mut out = [0.0f32; 4];
    for (row, value) in out.iter_mut().enumerate() {
        *value = m[0][row] * v[0] + m[1][row] * v[1] + m[2][row] * v[2] + m[3][row] * v[3];
    }
    out
}
