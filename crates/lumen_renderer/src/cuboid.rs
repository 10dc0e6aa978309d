//! Axis-aligned box built from finite planes.

use std::sync::Arc;

use crate::{
    hittable::{HitRecord, Hittable, HittableList},
    plane::FinitePlane,
    Material,
};
use lumen_math::{Interval, Point3, Ray, Vec3};

/// An axis-aligned box made of up to six [`FinitePlane`] sides.
///
/// A box whose extent is not strictly positive on every axis has no sides
/// and never reports a hit.
pub struct Cuboid {
    sides: HittableList,
}

impl Cuboid {
    /// Closed box spanning `min` to `max`.
    pub fn new(min: Point3, max: Point3, material: Arc<dyn Material>) -> Self {
        Self::build(min, max, material, true)
    }

    /// Box without its front side (the face at `min.z`), e.g. a room
    /// looked into from the front.
    pub fn open_front(min: Point3, max: Point3, material: Arc<dyn Material>) -> Self {
        Self::build(min, max, material, false)
    }

    fn build(min: Point3, max: Point3, material: Arc<dyn Material>, include_front: bool) -> Self {
        let mut sides = HittableList::new();

        let d = max - min;
        if d.x <= 0.0 || d.y <= 0.0 || d.z <= 0.0 {
            return Self { sides };
        }

        let dx = Vec3::new(d.x, 0.0, 0.0);
        let dy = Vec3::new(0.0, d.y, 0.0);
        let dz = Vec3::new(0.0, 0.0, d.z);

        // left, right
        sides.add(FinitePlane::new(min, dy, dz, material.clone()));
        sides.add(FinitePlane::new(Point3::new(max.x, min.y, min.z), dz, dy, material.clone()));
        // floor, ceiling
        sides.add(FinitePlane::new(min, dx, dz, material.clone()));
        sides.add(FinitePlane::new(Point3::new(min.x, max.y, min.z), dx, dz, material.clone()));
        // back
        sides.add(FinitePlane::new(Point3::new(min.x, min.y, max.z), dx, dy, material.clone()));

        if include_front {
            sides.add(FinitePlane::new(min, dx, dy, material));
        }

        Self { sides }
    }

    /// Number of planar sides (0 for a degenerate box).
    pub fn side_count(&self) -> usize {
        self.sides.len()
    }
}

impl Hittable for Cuboid {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>) -> bool {
        self.sides.hit(ray, ray_t, rec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::Lambertian;
    use crate::Color;

    fn white() -> Arc<dyn Material> {
        Arc::new(Lambertian::new(Color::splat(0.73)))
    }

    #[test]
    fn test_box_side_counts() {
        let closed = Cuboid::new(Vec3::splat(-1.0), Vec3::ONE, white());
        assert_eq!(closed.side_count(), 6);

        let open = Cuboid::open_front(Vec3::splat(-1.0), Vec3::ONE, white());
        assert_eq!(open.side_count(), 5);

        let flat = Cuboid::new(Vec3::ZERO, Vec3::new(1.0, 0.0, 1.0), white());
        assert_eq!(flat.side_count(), 0);

        let inverted = Cuboid::new(Vec3::ONE, Vec3::ZERO, white());
        assert_eq!(inverted.side_count(), 0);
    }

    #[test]
    fn test_box_nearest_side() {
        let cube = Cuboid::new(Vec3::new(-1.0, 0.0, -1.0), Vec3::new(1.0, 2.0, 1.0), white());
        let ray = Ray::new(Vec3::new(0.0, 1.0, -5.0), Vec3::Z);
        let mut rec = HitRecord::default();

        assert!(cube.hit(&ray, Interval::new(0.001, f64::INFINITY), &mut rec));
        assert!((rec.t - 4.0).abs() < 1e-12);
        // Stored normals always oppose the ray
        assert_eq!(rec.normal, -Vec3::Z);
    }

    #[test]
    fn test_open_front_sees_back_wall() {
        let room = Cuboid::open_front(Vec3::new(-1.0, 0.0, -1.0), Vec3::new(1.0, 2.0, 1.0), white());
        let ray = Ray::new(Vec3::new(0.0, 1.0, -5.0), Vec3::Z);
        let mut rec = HitRecord::default();

        assert!(room.hit(&ray, Interval::new(0.001, f64::INFINITY), &mut rec));
        assert!((rec.t - 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_degenerate_box_never_hits() {
        let flat = Cuboid::new(Vec3::ZERO, Vec3::new(1.0, 0.0, 1.0), white());
        let ray = Ray::new(Vec3::new(0.5, 5.0, 0.5), -Vec3::Y);
        let mut rec = HitRecord::default();
        assert!(!flat.hit(&ray, Interval::UNIVERSE, &mut rec));
    }
}
