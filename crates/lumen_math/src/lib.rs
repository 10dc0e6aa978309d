//! Math primitives for the Lumen path tracer.
//!
//! All geometry is computed in double precision.

// Re-export glam for convenience
pub use glam;

/// 3-component vector used for points, directions and colors.
pub use glam::DVec3 as Vec3;

/// A position in world space.
pub type Point3 = Vec3;

mod interval;
mod ray;

pub use interval::Interval;
pub use ray::Ray;

/// Convert an angle from degrees to radians.
#[inline]
pub fn degrees_to_radians(degrees: f64) -> f64 {
    degrees.to_radians()
}

/// Component of `v` along `axis`.
///
/// `axis` does not need to be normalized; a zero axis projects to zero.
#[inline]
pub fn project(v: Vec3, axis: Vec3) -> Vec3 {
    let len_sq = axis.length_squared();
    if len_sq == 0.0 {
        return Vec3::ZERO;
    }
    axis * (v.dot(axis) / len_sq)
}

/// True if every component is close to zero.
#[inline]
pub fn near_zero(v: Vec3) -> bool {
    const S: f64 = 1e-8;
    v.x.abs() < S && v.y.abs() < S && v.z.abs() < S
}
