//! Lumen renderer - CPU Monte Carlo path tracing.
//!
//! Scenes are flat lists of analytic primitives with shared materials.
//! Images are rendered row-parallel and written as ASCII P3 files.

mod camera;
mod capsule;
mod cone;
mod cuboid;
mod cylinder;
mod error;
mod framebuffer;
mod hittable;
mod material;
mod plane;
pub mod progress;
pub mod renderer;
pub mod sampling;
mod scheduler;
mod sphere;
mod texture;

pub use camera::Camera;
pub use capsule::Capsule;
pub use cone::{Cone, InfiniteCone};
pub use cuboid::Cuboid;
pub use cylinder::{Cylinder, InfiniteCylinder};
pub use error::{RenderError, RenderResult};
pub use framebuffer::Framebuffer;
pub use hittable::{HitRecord, Hittable, HittableList};
pub use material::{reflect, refract, Color, Dielectric, DiffuseLight, Lambertian, Material, Metal, ScatterResult};
pub use plane::{FinitePlane, InfinitePlane};
pub use renderer::{color_to_rgb8, ray_color, render_pixel};
pub use scheduler::{render, render_to_file, RenderReport};
pub use sphere::Sphere;
pub use texture::{ImageTexture, SolidColor, Texture, MISSING_TEXTURE_COLOR};

/// Re-export math and settings types so scenes can be built from this crate alone
pub use lumen_core::{CameraSettings, RenderMode, RenderSettings};
pub use lumen_math::{Interval, Point3, Ray, Vec3};
