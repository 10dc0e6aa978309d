//! Capsule: a cylinder segment closed by hemispherical ends.

use std::sync::Arc;

use crate::{
    cylinder::InfiniteCylinder,
    hittable::{hit_accepting, HitRecord, Hittable},
    sphere::Sphere,
    Material,
};
use lumen_math::{Interval, Point3, Ray, Vec3};

/// A capsule around `axis` through `center`: the tube reaches `half_length`
/// to either side, and each end is closed by a sphere of the same radius.
pub struct Capsule {
    center: Point3,
    half_length: f64,
    body: InfiniteCylinder,
    /// End spheres paired with the outward axis direction at that end
    caps: [(Sphere, Vec3); 2],
}

impl Capsule {
    pub fn new(
        center: Point3,
        axis: Vec3,
        radius: f64,
        half_length: f64,
        material: Arc<dyn Material>,
    ) -> Self {
        let body = InfiniteCylinder::new(center, axis, radius, material.clone());
        let a = body.axis().unwrap_or(Vec3::ZERO);
        let half_length = half_length.max(0.0);

        let caps = [
            (Sphere::new(center + a * half_length, radius, material.clone()), a),
            (Sphere::new(center - a * half_length, radius, material), -a),
        ];

        Self {
            center,
            half_length,
            body,
            caps,
        }
    }
}

impl Hittable for Capsule {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>) -> bool {
        let Some(axis) = self.body.axis() else {
            return false;
        };

        let mut hit_anything = false;
        let mut search = ray_t;

        let within_length = |r: &HitRecord| (r.p - self.center).dot(axis).abs() <= self.half_length;
        if hit_accepting(&self.body, ray, search, rec, within_length) {
            hit_anything = true;
            search = search.with_max(rec.t);
        }

        // Only the front of the outer hemisphere of each end sphere counts
        for (sphere, outward) in &self.caps {
            let on_end = |r: &HitRecord| r.front_face && (r.p - sphere.center()).dot(*outward) >= 0.0;
            if hit_accepting(sphere, ray, search, rec, on_end) {
                hit_anything = true;
                search = search.with_max(rec.t);
            }
        }

        hit_anything
    }
}
