//! Path tracing integrator.
//!
//! Implements Monte Carlo path tracing with:
//! - Recursive ray tracing bounded by the camera's maximum depth
//! - Procedural sky background
//! - Anti-aliasing via multi-sampling
//! - A normal-visualisation debug mode

use crate::{Camera, Color, HitRecord, Hittable};
use lumen_core::RenderMode;
use lumen_math::{Interval, Ray};
use rand::RngCore;

/// Lower bound of every scene query, keeps bounces off the surface they left.
pub const SHADOW_ACNE_EPSILON: f64 = 0.001;

/// Compute the color seen by a ray.
///
/// This is the core path tracing function. It traces the ray through
/// the scene, bouncing off surfaces and accumulating color.
pub fn ray_color(ray: &Ray, world: &dyn Hittable, depth: u32, rng: &mut dyn RngCore) -> Color {
    // Out of bounces, no more light is gathered
    if depth == 0 {
        return Color::ZERO;
    }

    let mut rec = HitRecord::default();

    if !world.hit(ray, Interval::new(SHADOW_ACNE_EPSILON, f64::INFINITY), &mut rec) {
        return sky_gradient(ray);
    }

    // Get emission from material (for lights)
    let emission = rec.material.emitted(rec.u, rec.v, rec.p);

    match rec.material.scatter(ray, &rec, rng) {
        Some(result) => {
            let scattered_color = ray_color(&result.scattered, world, depth - 1, rng);
            emission + result.attenuation * scattered_color
        }
        None => emission,
    }
}

/// Debug shading: the facing normal mapped into [0, 1], sky on a miss.
pub fn normal_color(ray: &Ray, world: &dyn Hittable) -> Color {
    let mut rec = HitRecord::default();

    if world.hit(ray, Interval::new(SHADOW_ACNE_EPSILON, f64::INFINITY), &mut rec) {
        0.5 * (rec.normal + Color::ONE)
    } else {
        sky_gradient(ray)
    }
}

/// Vertical blend from white at the horizon to sky blue at the zenith.
pub fn sky_gradient(ray: &Ray) -> Color {
    let unit_direction = ray.direction().normalize();
    let a = 0.5 * (unit_direction.y + 1.0);
    let white = Color::new(1.0, 1.0, 1.0);
    let blue = Color::new(0.5, 0.7, 1.0);
    white * (1.0 - a) + blue * a
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f64) -> f64 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Convert an accumulated sample sum into an 8-bit RGB triple.
pub fn color_to_rgb8(sum: Color, samples_per_pixel: u32) -> [u8; 3] {
    let color = sum / samples_per_pixel.max(1) as f64;
    let intensity = Interval::new(0.0, 0.999);

    let quantize = |linear: f64| (256.0 * intensity.clamp(linear_to_gamma(linear))) as u8;
    [quantize(color.x), quantize(color.y), quantize(color.z)]
}

/// Sum of all samples for pixel (i, j).
pub fn render_pixel(
    camera: &Camera,
    world: &dyn Hittable,
    i: u32,
    j: u32,
    mode: RenderMode,
    rng: &mut dyn RngCore,
) -> Color {
    let mut pixel_color = Color::ZERO;

    for _ in 0..camera.samples_per_pixel() {
        // get_ray already adds the antialiasing jitter
        let ray = camera.get_ray(i, j, rng);
        pixel_color += match mode {
            RenderMode::Path => ray_color(&ray, world, camera.max_depth(), rng),
            RenderMode::Normals => normal_color(&ray, world),
        };
    }

    pixel_color
}

/// Render image row `j` into `row`, one accumulated sum per pixel.
pub fn render_row(
    camera: &Camera,
    world: &dyn Hittable,
    j: u32,
    mode: RenderMode,
    rng: &mut dyn RngCore,
    row: &mut [Color],
) {
    for (i, pixel) in row.iter_mut().enumerate() {
        *pixel = render_pixel(camera, world, i as u32, j, mode, rng);
    }
}
