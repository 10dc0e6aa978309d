//! Planar primitives: bounded parallelograms and infinite planes.

use std::sync::Arc;

use crate::{
    hittable::{HitRecord, Hittable},
    Material,
};
use lumen_math::{Interval, Point3, Ray, Vec3};

/// Below this |cos| between ray and normal the ray is treated as parallel.
const PARALLEL_EPSILON: f64 = 1e-8;

/// Below this determinant the plane basis is treated as singular.
const SINGULAR_EPSILON: f64 = 1e-12;

/// A parallelogram spanned by two edge vectors from a corner point.
///
/// Points `corner + a*u + b*v` with `a, b` in `[0, 1]` are on the surface.
pub struct FinitePlane {
    corner: Point3,
    u: Vec3,
    v: Vec3,
    /// None when `u` and `v` are parallel or zero
    normal: Option<Vec3>,
    uu: f64,
    uv: f64,
    vv: f64,
    det: f64,
    material: Arc<dyn Material>,
}

impl FinitePlane {
    pub fn new(corner: Point3, u: Vec3, v: Vec3, material: Arc<dyn Material>) -> Self {
        let uu = u.dot(u);
        let uv = u.dot(v);
        let vv = v.dot(v);

        Self {
            corner,
            u,
            v,
            normal: u.cross(v).try_normalize(),
            uu,
            uv,
            vv,
            det: uu * vv - uv * uv,
            material,
        }
    }

    /// Unit normal, `u x v` normalized; None for a degenerate basis.
    pub fn normal(&self) -> Option<Vec3> {
        self.normal
    }
}

impl Hittable for FinitePlane {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>) -> bool {
        let Some(normal) = self.normal else {
            return false;
        };
        if self.det.abs() < SINGULAR_EPSILON {
            return false;
        }

        let denom = normal.dot(ray.direction());
        if denom.abs() < PARALLEL_EPSILON {
            return false;
        }

        let t = (self.corner - ray.origin()).dot(normal) / denom;
        if !ray_t.surrounds(t) {
            return false;
        }

        let p = ray.at(t);

        // Solve p - corner = a*u + b*v in the plane's own basis
        let w = p - self.corner;
        let wu = w.dot(self.u);
        let wv = w.dot(self.v);
        let a = (wu * self.vv - wv * self.uv) / self.det;
        let b = (wv * self.uu - wu * self.uv) / self.det;

        if !(0.0..=1.0).contains(&a) || !(0.0..=1.0).contains(&b) {
            return false;
        }

        rec.t = t;
        rec.p = p;
        rec.set_face_normal(ray, normal);
        rec.u = a;
        rec.v = b;
        rec.material = self.material.as_ref();

        true
    }
}

/// An unbounded plane through a point.
pub struct InfinitePlane {
    point: Point3,
    normal: Option<Vec3>,
    /// In-plane axes used for tiling UVs
    tangent: Vec3,
    bitangent: Vec3,
    material: Arc<dyn Material>,
}

impl InfinitePlane {
    pub fn new(point: Point3, normal: Vec3, material: Arc<dyn Material>) -> Self {
        let normal = normal.try_normalize();
        let (tangent, bitangent) = normal
            .map(|n| n.any_orthonormal_pair())
            .unwrap_or((Vec3::X, Vec3::Y));

        Self {
            point,
            normal,
            tangent,
            bitangent,
            material,
        }
    }

    pub fn point(&self) -> Point3 {
        self.point
    }
}

impl Hittable for InfinitePlane {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>) -> bool {
        let Some(normal) = self.normal else {
            return false;
        };

        let denom = normal.dot(ray.direction());
        if denom.abs() < PARALLEL_EPSILON {
            return false;
        }

        let t = (self.point - ray.origin()).dot(normal) / denom;
        if !ray_t.surrounds(t) {
            return false;
        }

        rec.t = t;
        rec.p = ray.at(t);
        rec.set_face_normal(ray, normal);
        let local = rec.p - self.point;
        rec.u = local.dot(self.tangent).rem_euclid(1.0);
        rec.v = local.dot(self.bitangent).rem_euclid(1.0);
        rec.material = self.material.as_ref();

        true
    }
}
