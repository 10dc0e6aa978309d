//! Hittable trait and HitRecord for ray-object intersection.

use crate::material::{Material, ScatterResult};
use lumen_math::{Interval, Point3, Ray, Vec3};
use rand::RngCore;

/// A dummy material used for HitRecord::default().
/// Always absorbs light (returns None from scatter).
struct DummyMaterial;

impl Material for DummyMaterial {
    fn scatter(&self, _ray_in: &Ray, _rec: &HitRecord, _rng: &mut dyn RngCore) -> Option<ScatterResult> {
        None
    }
}

/// Static dummy material instance for Default impl.
static DUMMY_MATERIAL: DummyMaterial = DummyMaterial;

/// Record of a ray-object intersection.
#[derive(Clone)]
pub struct HitRecord<'a> {
    /// Point of intersection
    pub p: Point3,
    /// Surface normal at intersection (always points against ray)
    pub normal: Vec3,
    /// Material at the intersection point
    pub material: &'a dyn Material,
    /// UV texture coordinates
    pub u: f64,
    pub v: f64,
    /// Parameter t where the intersection occurs
    pub t: f64,
    /// Whether the ray hit the front face (outside) of the surface
    pub front_face: bool,
}

impl<'a> Default for HitRecord<'a> {
    fn default() -> Self {
        Self {
            p: Point3::ZERO,
            normal: Vec3::ZERO,
            material: &DUMMY_MATERIAL,
            u: 0.0,
            v: 0.0,
            t: 0.0,
            front_face: false,
        }
    }
}

impl<'a> HitRecord<'a> {
    /// Set the face normal based on ray direction and outward normal.
    ///
    /// The normal is always stored pointing against the ray direction,
    /// so we need to track whether we hit the front or back face.
    pub fn set_face_normal(&mut self, ray: &Ray, outward_normal: Vec3) {
        self.front_face = ray.direction().dot(outward_normal) < 0.0;

        self.normal = if self.front_face {
            outward_normal
        } else {
            -outward_normal
        };
    }
}

/// Trait for objects that can be hit by rays.
pub trait Hittable: Send + Sync {
    /// Test if a ray hits this object strictly inside the given interval.
    ///
    /// Returns true if hit, and fills in the hit record. On a miss the
    /// record is left untouched.
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>) -> bool;
}

/// Nearest hit on `object` inside `ray_t` that also passes `accept`.
///
/// Rejected hits move the lower bound past the rejected root and retry, so
/// the far root of a quadric is considered when the near one is clipped
/// away. `rec` is only written when a hit is accepted.
pub(crate) fn hit_accepting<'a, H>(
    object: &'a H,
    ray: &Ray,
    ray_t: Interval,
    rec: &mut HitRecord<'a>,
    accept: impl Fn(&HitRecord) -> bool,
) -> bool
where
    H: Hittable + ?Sized,
{
    let mut search = ray_t;

    // Quadrics have at most two roots, planes one
    for _ in 0..2 {
        let mut candidate = HitRecord::default();
        if !object.hit(ray, search, &mut candidate) {
            return false;
        }
        if accept(&candidate) {
            *rec = candidate;
            return true;
        }
        search = search.with_min(candidate.t);
    }

    false
}

/// A list of hittable objects, scanned linearly.
pub struct HittableList {
    objects: Vec<Box<dyn Hittable>>,
}

impl HittableList {
    /// Create a new empty hittable list.
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
        }
    }

    /// Add an object to the list.
    pub fn add(&mut self, object: impl Hittable + 'static) {
        self.objects.push(Box::new(object));
    }

    /// Get the number of objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Check if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl Default for HittableList {
    fn default() -> Self {
        Self::new()
    }
}

impl Hittable for HittableList {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>) -> bool {
        let mut hit_anything = false;
        let mut closest_so_far = ray_t.max;

        for object in &self.objects {
            if object.hit(ray, ray_t.with_max(closest_so_far), rec) {
                hit_anything = true;
                closest_so_far = rec.t;
            }
        }

        hit_anything
    }
}
