//! Sphere primitive for ray tracing.

use std::f64::consts::PI;
use std::sync::Arc;

use crate::{
    hittable::{HitRecord, Hittable},
    Material,
};
use lumen_math::{Interval, Point3, Ray, Vec3};

/// A sphere primitive.
pub struct Sphere {
    center: Point3,
    radius: f64,
    material: Arc<dyn Material>,
}

impl Sphere {
    /// Create a new sphere. Negative radii are clamped to zero.
    pub fn new(center: Point3, radius: f64, material: Arc<dyn Material>) -> Self {
        Self {
            center,
            radius: radius.max(0.0),
            material,
        }
    }

    pub fn center(&self) -> Point3 {
        self.center
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Get the UV coordinates for a point on the unit sphere.
    pub(crate) fn get_sphere_uv(p: Vec3) -> (f64, f64) {
        // theta: angle down from +Y
        // phi: angle around Y axis from +X
        let theta = (-p.y).clamp(-1.0, 1.0).acos();
        let phi = (-p.z).atan2(p.x) + PI;

        (phi / (2.0 * PI), theta / PI)
    }
}

/// Nearest root of `|ray(t) - center|^2 = radius^2` strictly inside `ray_t`.
///
/// Tries the smaller root first and falls back to the larger one.
pub(crate) fn sphere_root(center: Point3, radius: f64, ray: &Ray, ray_t: Interval) -> Option<f64> {
    let oc = center - ray.origin();
    let a = ray.direction().length_squared();
    if a == 0.0 {
        return None;
    }
    let h = ray.direction().dot(oc);
    let c = oc.length_squared() - radius * radius;

    let discriminant = h * h - a * c;
    if discriminant < 0.0 {
        return None;
    }

    let sqrtd = discriminant.sqrt();

    let root = (h - sqrtd) / a;
    if ray_t.surrounds(root) {
        return Some(root);
    }
    let root = (h + sqrtd) / a;
    ray_t.surrounds(root).then_some(root)
}

impl Hittable for Sphere {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>) -> bool {
        if self.radius <= 0.0 {
            return false;
        }

        let Some(root) = sphere_root(self.center, self.radius, ray, ray_t) else {
            return false;
        };

        rec.t = root;
        rec.p = ray.at(root);
        let outward_normal = (rec.p - self.center) / self.radius;
        rec.set_face_normal(ray, outward_normal);
        (rec.u, rec.v) = Self::get_sphere_uv(outward_normal);
        rec.material = self.material.as_ref();

        true
    }
}
