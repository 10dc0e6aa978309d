//! Cones: an unbounded single-nappe cone and a finite cone with a base cap.

use std::sync::Arc;

use crate::{
    cylinder::{angular_u, DiscCap},
    hittable::{hit_accepting, HitRecord, Hittable},
    Material,
};
use lumen_math::{Interval, Point3, Ray, Vec3};

const QUADRATIC_EPSILON: f64 = 1e-12;

/// An unbounded cone opening from `apex` along `axis`.
///
/// The circular cross-section at axial distance `h` has radius `slope * h`.
/// Only the nappe on the positive side of the axis is solid.
pub struct InfiniteCone {
    apex: Point3,
    axis: Option<Vec3>,
    slope: f64,
    tangent: Vec3,
    bitangent: Vec3,
    material: Arc<dyn Material>,
}

impl InfiniteCone {
    pub fn new(apex: Point3, axis: Vec3, slope: f64, material: Arc<dyn Material>) -> Self {
        let axis = axis.try_normalize();
        let (tangent, bitangent) = axis
            .map(|a| a.any_orthonormal_pair())
            .unwrap_or((Vec3::X, Vec3::Y));

        Self {
            apex,
            axis,
            slope: slope.abs(),
            tangent,
            bitangent,
            material,
        }
    }

    pub fn axis(&self) -> Option<Vec3> {
        self.axis
    }

    /// Roots of the projected circle test, in ascending order.
    ///
    /// With `o`, `d` the ray origin and direction relative to the apex split
    /// into axial (`h`) and perpendicular (`p`) parts, the ray is on the cone
    /// when `|o_p + t d_p| = slope * (o_h + t d_h)`.
    fn roots(&self, axis: Vec3, ray: &Ray) -> Option<(f64, f64)> {
        let o = ray.origin() - self.apex;
        let d = ray.direction();
        let oh = o.dot(axis);
        let dh = d.dot(axis);
        let op = o - axis * oh;
        let dp = d - axis * dh;
        let k2 = self.slope * self.slope;

        let a = dp.length_squared() - k2 * dh * dh;
        let half_b = op.dot(dp) - k2 * oh * dh;
        let c = op.length_squared() - k2 * oh * oh;

        if a.abs() < QUADRATIC_EPSILON {
            // Ray parallel to a generating line: one crossing at most
            if half_b.abs() < QUADRATIC_EPSILON {
                return None;
            }
            let t = -c / (2.0 * half_b);
            return Some((t, t));
        }

        let discriminant = half_b * half_b - a * c;
        if discriminant < 0.0 {
            return None;
        }
        let sqrtd = discriminant.sqrt();
        let r0 = (-half_b - sqrtd) / a;
        let r1 = (-half_b + sqrtd) / a;
        Some((r0.min(r1), r0.max(r1)))
    }
}

impl Hittable for InfiniteCone {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>) -> bool {
        let Some(axis) = self.axis else {
            return false;
        };
        let Some((t0, t1)) = self.roots(axis, ray) else {
            return false;
        };

        let on_nappe = |t: f64| ray_t.surrounds(t) && (ray.at(t) - self.apex).dot(axis) >= 0.0;
        let t = if on_nappe(t0) {
            t0
        } else if on_nappe(t1) {
            t1
        } else {
            return false;
        };

        rec.t = t;
        rec.p = ray.at(t);
        let local = rec.p - self.apex;
        let h = local.dot(axis);
        let radial = local - axis * h;
        // Gradient of |radial|^2 - slope^2 h^2; undefined at the apex
        let outward_normal = (radial - axis * (self.slope * self.slope * h))
            .try_normalize()
            .unwrap_or(-axis);
        rec.set_face_normal(ray, outward_normal);
        rec.u = angular_u(radial, self.tangent, self.bitangent);
        rec.v = h.rem_euclid(1.0);
        rec.material = self.material.as_ref();

        true
    }
}

/// A finite cone: apex at `apex`, base disc of `radius` at distance
/// `height` along `axis`.
pub struct Cone {
    apex: Point3,
    radius: f64,
    height: f64,
    body: InfiniteCone,
    base: DiscCap,
}

impl Cone {
    pub fn new(apex: Point3, axis: Vec3, radius: f64, height: f64, material: Arc<dyn Material>) -> Self {
        let radius = radius.max(0.0);
        let height = height.max(0.0);
        let slope = if height > 0.0 { radius / height } else { 0.0 };

        let body = InfiniteCone::new(apex, axis, slope, material.clone());
        let a = body.axis().unwrap_or(Vec3::ZERO);
        let base = DiscCap::new(apex + a * height, a, material);

        Self {
            apex,
            radius,
            height,
            body,
            base,
        }
    }
}

impl Hittable for Cone {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>) -> bool {
        let Some(axis) = self.body.axis() else {
            return false;
        };
        if self.height <= 0.0 || self.radius <= 0.0 {
            return false;
        }

        let mut hit_anything = false;
        let mut search = ray_t;

        let below_base = |r: &HitRecord| (r.p - self.apex).dot(axis) <= self.height;
        if hit_accepting(&self.body, ray, search, rec, below_base) {
            hit_anything = true;
            search = search.with_max(rec.t);
            rec.v = (rec.p - self.apex).dot(axis) / self.height;
        }

        if self.base.hit(ray, search, self.radius, rec) {
            hit_anything = true;
        }

        hit_anything
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::Lambertian;
    use crate::Color;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn grey() -> Arc<dyn Material> {
        Arc::new(Lambertian::new(Color::splat(0.5)))
    }

    fn ray_t() -> Interval {
        Interval::new(0.001, f64::INFINITY)
    }

    #[test]
    fn test_infinite_cone_side_hit() {
        // 45 degree cone opening upward from the origin
        let cone = InfiniteCone::new(Vec3::ZERO, Vec3::Y, 1.0, grey());
        let ray = Ray::new(Vec3::new(-5.0, 2.0, 0.0), Vec3::X);
        let mut rec = HitRecord::default();

        assert!(cone.hit(&ray, ray_t(), &mut rec));
        assert!((rec.t - 3.0).abs() < 1e-12);
        assert!((rec.p - Vec3::new(-2.0, 2.0, 0.0)).length() < 1e-12);
        assert!(rec.front_face);
        let expected = Vec3::new(-1.0, -1.0, 0.0).normalize();
        assert!((rec.normal - expected).length() < 1e-12);
    }

    #[test]
    fn test_infinite_cone_ignores_lower_nappe() {
        let cone = InfiniteCone::new(Vec3::ZERO, Vec3::Y, 1.0, grey());
        let ray = Ray::new(Vec3::new(-5.0, -2.0, 0.0), Vec3::X);
        let mut rec = HitRecord::default();
        assert!(!cone.hit(&ray, ray_t(), &mut rec));
    }

    #[test]
    fn test_random_cone_hits_on_surface() {
        let apex = Vec3::new(0.5, -1.0, 0.0);
        let axis = Vec3::new(0.0, 1.0, 1.0).normalize();
        let slope = 0.4;
        let cone = InfiniteCone::new(apex, axis, slope, grey());
        let mut rng = StdRng::seed_from_u64(23);

        for _ in 0..1000 {
            let origin = Vec3::new(rng.gen_range(-5.0..5.0), rng.gen_range(-5.0..5.0), rng.gen_range(-5.0..5.0));
            let dir = Vec3::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0));
            let ray = Ray::new(origin, dir);
            let mut rec = HitRecord::default();

            if cone.hit(&ray, ray_t(), &mut rec) {
                let local = rec.p - apex;
                let h = local.dot(axis);
                let radial = (local - axis * h).length();
                assert!(h >= 0.0);
                assert!((radial - slope * h).abs() < 1e-8);
            }
        }
    }

    #[test]
    fn test_finite_cone_body_and_base() {
        // Apex at the origin, base of radius 1 at y = 2
        let cone = Cone::new(Vec3::ZERO, Vec3::Y, 1.0, 2.0, grey());
        let mut rec = HitRecord::default();

        let side = Ray::new(Vec3::new(-5.0, 1.0, 0.0), Vec3::X);
        assert!(cone.hit(&side, ray_t(), &mut rec));
        assert!((rec.t - 4.5).abs() < 1e-12);
        assert!((rec.v - 0.5).abs() < 1e-12);

        let beyond = Ray::new(Vec3::new(-5.0, 3.0, 0.0), Vec3::X);
        assert!(!cone.hit(&beyond, ray_t(), &mut rec));

        let down = Ray::new(Vec3::new(0.2, 10.0, 0.0), -Vec3::Y);
        assert!(cone.hit(&down, ray_t(), &mut rec));
        assert!((rec.t - 8.0).abs() < 1e-12);
        assert_eq!(rec.normal, Vec3::Y);
    }

    #[test]
    fn test_finite_cone_from_below_hits_body() {
        let cone = Cone::new(Vec3::ZERO, Vec3::Y, 1.0, 2.0, grey());
        let up = Ray::new(Vec3::new(0.25, -3.0, 0.0), Vec3::Y);
        let mut rec = HitRecord::default();

        assert!(cone.hit(&up, ray_t(), &mut rec));
        // |x| = y / 2 on the surface
        assert!((rec.p.y - 0.5).abs() < 1e-12);
        assert!(rec.front_face);
    }

    #[test]
    fn test_base_rejects_hit_from_inside() {
        let cone = Cone::new(Vec3::ZERO, Vec3::Y, 1.0, 2.0, grey());
        let mut rec = HitRecord::default();
        rec.t = 9.0;

        // Up the axis from inside, reaching the base disc from behind at t = 1
        let ray = Ray::new(Vec3::new(0.0, 1.0, 0.0), Vec3::Y);
        assert!(!cone.hit(&ray, ray_t(), &mut rec));
        assert_eq!(rec.t, 9.0);
    }

    #[test]
    fn test_degenerate_cone_never_hits() {
        let flat = Cone::new(Vec3::ZERO, Vec3::Y, 1.0, 0.0, grey());
        let ray = Ray::new(Vec3::new(-5.0, 0.0, 0.0), Vec3::X);
        let mut rec = HitRecord::default();
        assert!(!flat.hit(&ray, Interval::UNIVERSE, &mut rec));
    }
}
