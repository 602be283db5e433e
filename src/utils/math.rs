//! 2-D vector helpers layered on top of `glam`.

use glam::DVec2;

/// Scalar type used throughout the kernel.
pub type Real = f64;

/// Explicit 2-D vector with named components and arithmetic operators.
pub type Vector = DVec2;

/// Shorthand constructor.
#[inline]
pub fn vec2(x: Real, y: Real) -> Vector {
    DVec2::new(x, y)
}

/// Euclidean distance between two points.
#[inline]
pub fn distance(a: Vector, b: Vector) -> Real {
    (b - a).length()
}

/// Splits `to - from` into its unit direction and length.
///
/// Returns `None` when the points coincide or the separation is not finite,
/// so callers never divide by zero.
pub fn separation(from: Vector, to: Vector) -> Option<(Vector, Real)> {
    let r = to - from;
    let length = r.length();
    if length > 0.0 && length.is_finite() {
        Some((r / length, length))
    } else {
        None
    }
}

/// Component-wise minimum and maximum corners of the rectangle spanned by
/// two points.
pub fn bounding_corners(a: Vector, b: Vector) -> (Vector, Vector) {
    (a.min(b), a.max(b))
}
