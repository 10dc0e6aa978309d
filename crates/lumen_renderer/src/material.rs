//! Material trait for surface scattering.

use std::sync::Arc;

use crate::{
    hittable::HitRecord,
    sampling::{gen_f64, random_in_unit_sphere, random_unit_vector},
    texture::{SolidColor, Texture},
};
use lumen_math::{near_zero, Point3, Ray, Vec3};
use rand::RngCore;

/// Color type alias (linear RGB, typically 0-1)
pub type Color = Vec3;

/// Outcome of a scatter event.
#[derive(Debug, Clone, Copy)]
pub struct ScatterResult {
    /// Fraction of light kept per channel
    pub attenuation: Color,
    /// Continuation ray leaving the surface
    pub scattered: Ray,
}

/// Trait for materials that describe how light interacts with surfaces.
pub trait Material: Send + Sync {
    /// Scatter an incoming ray.
    ///
    /// Returns Some(result) if the ray scatters, or None if it is absorbed.
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<ScatterResult>;

    /// Get emitted light from this material.
    ///
    /// Most materials return black (no emission).
    fn emitted(&self, _u: f64, _v: f64, _p: Point3) -> Color {
        Color::ZERO
    }
}

/// Lambertian (diffuse) material.
#[derive(Clone)]
pub struct Lambertian {
    albedo: Arc<dyn Texture>,
}

impl Lambertian {
    /// Create a new Lambertian material with the given albedo color.
    pub fn new(albedo: Color) -> Self {
        Self::from_texture(Arc::new(SolidColor::new(albedo)))
    }

    /// Create a Lambertian material whose albedo is sampled from a texture.
    pub fn from_texture(albedo: Arc<dyn Texture>) -> Self {
        Self { albedo }
    }
}

impl Material for Lambertian {
    fn scatter(&self, _ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<ScatterResult> {
        let mut scatter_direction = rec.normal + random_unit_vector(rng);

        // Catch degenerate scatter direction
        if near_zero(scatter_direction) {
            scatter_direction = rec.normal;
        }

        Some(ScatterResult {
            attenuation: self.albedo.value(rec.u, rec.v, rec.p),
            scattered: Ray::new(rec.p, scatter_direction),
        })
    }
}

/// Metal (specular) material.
pub struct Metal {
    albedo: Color,
    fuzz: f64,
}

impl Metal {
    /// Create a new Metal material.
    ///
    /// - `albedo`: The color of the metal
    /// - `fuzz`: Roughness, 0.0 = perfect mirror, 1.0 = very rough
    pub fn new(albedo: Color, fuzz: f64) -> Self {
        Self {
            albedo,
            fuzz: fuzz.clamp(0.0, 1.0),
        }
    }

    pub fn fuzz(&self) -> f64 {
        self.fuzz
    }
}

impl Material for Metal {
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<ScatterResult> {
        let reflected = reflect(ray_in.direction().normalize(), rec.normal);
        let scattered_dir = reflected + self.fuzz * random_in_unit_sphere(rng);

        // Only scatter if the reflected ray is in the same hemisphere as the normal
        if scattered_dir.dot(rec.normal) > 0.0 {
            Some(ScatterResult {
                attenuation: self.albedo,
                scattered: Ray::new(rec.p, scattered_dir),
            })
        } else {
            None
        }
    }
}

/// Dielectric (glass) material.
pub struct Dielectric {
    /// Index of refraction
    ior: f64,
}

impl Dielectric {
    /// Create a new Dielectric material.
    ///
    /// - `ior`: Index of refraction (1.0 = air, 1.5 = glass, 2.4 = diamond)
    pub fn new(ior: f64) -> Self {
        Self { ior }
    }

    /// Schlick's approximation for reflectance.
    ///
    /// An index-matched boundary (ratio 1) has no interface to reflect from.
    fn reflectance(cosine: f64, refraction_ratio: f64) -> f64 {
        if refraction_ratio == 1.0 {
            return 0.0;
        }
        let r0 = ((1.0 - refraction_ratio) / (1.0 + refraction_ratio)).powi(2);
        r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
    }
}

impl Material for Dielectric {
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<ScatterResult> {
        let refraction_ratio = if rec.front_face { 1.0 / self.ior } else { self.ior };

        let unit_direction = ray_in.direction().normalize();
        let cos_theta = (-unit_direction).dot(rec.normal).min(1.0);
        let sin_theta = (1.0 - cos_theta * cos_theta).sqrt();

        // Check for total internal reflection
        let cannot_refract = refraction_ratio * sin_theta > 1.0;

        let direction = if cannot_refract || Self::reflectance(cos_theta, refraction_ratio) > gen_f64(rng) {
            reflect(unit_direction, rec.normal)
        } else {
            refract(unit_direction, rec.normal, refraction_ratio)
        };

        Some(ScatterResult {
            attenuation: Color::ONE,
            scattered: Ray::new(rec.p, direction),
        })
    }
}

/// Diffuse light emitter.
pub struct DiffuseLight {
    emit: Color,
}

impl DiffuseLight {
    /// Create a new diffuse light with the given emission color.
    pub fn new(emit: Color) -> Self {
        Self { emit }
    }
}

impl Material for DiffuseLight {
    fn scatter(&self, _ray_in: &Ray, _rec: &HitRecord, _rng: &mut dyn RngCore) -> Option<ScatterResult> {
        // Lights don't scatter rays
        None
    }

    fn emitted(&self, _u: f64, _v: f64, _p: Point3) -> Color {
        self.emit
    }
}

// =============================================================================
// Helper functions
// =============================================================================

/// Reflect a vector about a normal.
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Refract a unit vector through a surface.
#[inline]
pub fn refract(uv: Vec3, n: Vec3, etai_over_etat: f64) -> Vec3 {
    let cos_theta = (-uv).dot(n).min(1.0);
    let r_out_perp = etai_over_etat * (uv + cos_theta * n);
    let r_out_parallel = -(1.0 - r_out_perp.length_squared()).abs().sqrt() * n;
    r_out_perp + r_out_parallel
}
