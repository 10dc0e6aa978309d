//! Random sampling helpers.
//!
//! Every function takes the generator explicitly so renders can be seeded.

use lumen_math::Vec3;
use rand::{Rng, RngCore};

/// Uniform random number in [0, 1).
#[inline]
pub fn gen_f64(rng: &mut dyn RngCore) -> f64 {
    rng.gen::<f64>()
}

/// Uniform random number in [min, max).
#[inline]
pub fn gen_range_f64(rng: &mut dyn RngCore, min: f64, max: f64) -> f64 {
    min + (max - min) * gen_f64(rng)
}

/// Random point inside the unit sphere (rejection sampling from the cube).
pub fn random_in_unit_sphere(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let p = Vec3::new(
            gen_range_f64(rng, -1.0, 1.0),
            gen_range_f64(rng, -1.0, 1.0),
            gen_range_f64(rng, -1.0, 1.0),
        );
        if p.length_squared() < 1.0 {
            return p;
        }
    }
}

/// Random unit vector, uniformly distributed on the unit sphere.
pub fn random_unit_vector(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let p = random_in_unit_sphere(rng);
        let len_sq = p.length_squared();
        // Reject points too close to the origin to normalize reliably
        if len_sq > 1e-160 {
            return p / len_sq.sqrt();
        }
    }
}

/// Random point inside the unit disk in the XY plane.
pub fn random_in_unit_disk(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let p = Vec3::new(gen_range_f64(rng, -1.0, 1.0), gen_range_f64(rng, -1.0, 1.0), 0.0);
        if p.length_squared() < 1.0 {
            return p;
        }
    }
}

/// Random point in the square [-0.5, 0.5] x [-0.5, 0.5] (z = 0).
pub fn sample_square(rng: &mut dyn RngCore) -> Vec3 {
    Vec3::new(gen_f64(rng) - 0.5, gen_f64(rng) - 0.5, 0.0)
}
