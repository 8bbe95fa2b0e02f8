//! Free functions over `[f32; 3]`

/// 3-component vector
pub type Vec3 = [f32; 3];

/// Dot product
pub fn dot(a: Vec3, b: Vec3) -> f32 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

/// Cross product `a x b`
pub fn cross(a: Vec3, b: Vec3) -> Vec3 {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

/// Euclidean length
pub fn length(v: Vec3) -> f32 {
    dot(v, v).sqrt()
}

/// Unit vector in the direction of `v`, or `v` itself when it has zero length
pub fn normalize(v: Vec3) -> Vec3 {
    let len = length(v);
    if len > 0.0 {
        [v[0] / len, v[1] / len, v[2] / len]
    } else {
        v
    }
}

/// Component-wise `a - b`
pub fn sub(a: Vec3, b: Vec3) -> Vec3 {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}
