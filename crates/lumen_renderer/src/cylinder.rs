//! Cylinders: an unbounded tube and a capped finite cylinder built on it.

use std::f64::consts::PI;
use std::sync::Arc;

use crate::{
    hittable::{hit_accepting, HitRecord, Hittable},
    plane::InfinitePlane,
    sphere::sphere_root,
    Material,
};
use lumen_math::{Interval, Point3, Ray, Vec3};

/// Projected directions shorter than this (squared) run along the axis.
const AXIS_PARALLEL_EPSILON: f64 = 1e-12;

/// Angle of `radial` around `axis`, mapped to [0, 1].
pub(crate) fn angular_u(radial: Vec3, tangent: Vec3, bitangent: Vec3) -> f64 {
    (radial.dot(bitangent).atan2(radial.dot(tangent)) + PI) / (2.0 * PI)
}

/// An infinitely long cylinder around an axis through `center`.
pub struct InfiniteCylinder {
    center: Point3,
    axis: Option<Vec3>,
    radius: f64,
    tangent: Vec3,
    bitangent: Vec3,
    material: Arc<dyn Material>,
}

impl InfiniteCylinder {
    pub fn new(center: Point3, axis: Vec3, radius: f64, material: Arc<dyn Material>) -> Self {
        let axis = axis.try_normalize();
        let (tangent, bitangent) = axis
            .map(|a| a.any_orthonormal_pair())
            .unwrap_or((Vec3::X, Vec3::Y));

        Self {
            center,
            axis,
            radius: radius.max(0.0),
            tangent,
            bitangent,
            material,
        }
    }

    /// Unit axis direction, None if constructed with a zero axis.
    pub fn axis(&self) -> Option<Vec3> {
        self.axis
    }
}

impl Hittable for InfiniteCylinder {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>) -> bool {
        let Some(axis) = self.axis else {
            return false;
        };
        if self.radius <= 0.0 {
            return false;
        }

        // Drop the axial components: in the plane through `center`
        // perpendicular to the axis the tube is a circle, which is the
        // cross-section of the sphere with the same center and radius.
        let oc = ray.origin() - self.center;
        let origin_perp = oc - axis * oc.dot(axis);
        let dir_perp = ray.direction() - axis * ray.direction().dot(axis);
        if dir_perp.length_squared() < AXIS_PARALLEL_EPSILON {
            return false;
        }

        let flat = Ray::new(self.center + origin_perp, dir_perp);
        let Some(t) = sphere_root(self.center, self.radius, &flat, ray_t) else {
            return false;
        };

        // Same t on the original ray gives the 3D point
        rec.t = t;
        rec.p = ray.at(t);
        let local = rec.p - self.center;
        let h = local.dot(axis);
        let outward_normal = (local - axis * h) / self.radius;
        rec.set_face_normal(ray, outward_normal);
        rec.u = angular_u(outward_normal, self.tangent, self.bitangent);
        rec.v = h.rem_euclid(1.0);
        rec.material = self.material.as_ref();

        true
    }
}

/// Flat end of a finite shape: a disc on an infinite plane.
pub(crate) struct DiscCap {
    pub(crate) center: Point3,
    pub(crate) plane: InfinitePlane,
}

impl DiscCap {
    pub(crate) fn new(center: Point3, outward: Vec3, material: Arc<dyn Material>) -> Self {
        Self {
            center,
            plane: InfinitePlane::new(center, outward, material),
        }
    }

    /// Front-facing hit on the cap within `radius` of its center.
    pub(crate) fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, radius: f64, rec: &mut HitRecord<'a>) -> bool {
        hit_accepting(&self.plane, ray, ray_t, rec, |r| {
            r.front_face && (r.p - self.center).length() <= radius
        })
    }
}

/// A closed cylinder: the tube around `axis` reaching `half_length` to
/// either side of `center`, with flat caps at both ends.
pub struct Cylinder {
    center: Point3,
    radius: f64,
    half_length: f64,
    body: InfiniteCylinder,
    caps: [DiscCap; 2],
}

impl Cylinder {
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
            DiscCap::new(center + a * half_length, a, material.clone()),
            DiscCap::new(center - a * half_length, -a, material),
        ];

        Self {
            center,
            radius: radius.max(0.0),
            half_length,
            body,
            caps,
        }
    }
}

impl Hittable for Cylinder {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>) -> bool {
        let Some(axis) = self.body.axis() else {
            return false;
        };
        if self.half_length <= 0.0 {
            return false;
        }

        let mut hit_anything = false;
        let mut search = ray_t;

        let within_length = |r: &HitRecord| (r.p - self.center).dot(axis).abs() <= self.half_length;
        if hit_accepting(&self.body, ray, search, rec, within_length) {
            hit_anything = true;
            search = search.with_max(rec.t);
            let h = (rec.p - self.center).dot(axis);
            rec.v = (h + self.half_length) / (2.0 * self.half_length);
        }

        for cap in &self.caps {
            if cap.hit(ray, search, self.radius, rec) {
                hit_anything = true;
                search = search.with_max(rec.t);
            }
        }

        hit_anything
    }
}
