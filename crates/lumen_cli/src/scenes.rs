//! Built-in demo scenes and their camera presets.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::bail;
use lumen_core::{CameraSettings, RenderSettings};
use lumen_math::{Point3, Vec3};
use lumen_renderer::{
    Capsule, Color, Cone, Cuboid, Cylinder, Dielectric, DiffuseLight, FinitePlane, HittableList, ImageTexture,
    InfinitePlane, Lambertian, Material, Metal, Sphere,
};
use rand::Rng;

/// Where the textured scene looks for its images, relative to the working directory.
pub const EARTH_TEXTURE: &str = "Textures/earth.jpg";
pub const MOON_TEXTURE: &str = "Textures/moon.jpg";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DemoScene {
    /// Large field of small random spheres around three big ones
    #[default]
    Spheres,
    /// Closed room lit by a ceiling panel, with nested glass and metal spheres
    Cornell,
    /// A single open-fronted box
    Box,
    /// Image-textured earth and moon
    Earth,
    /// Cylinder, cone, capsule and an open box on an infinite ground plane
    Shapes,
}

impl DemoScene {
    pub const ALL: [DemoScene; 5] = [
        DemoScene::Spheres,
        DemoScene::Cornell,
        DemoScene::Box,
        DemoScene::Earth,
        DemoScene::Shapes,
    ];

    pub fn name(self) -> &'static str {
        match self {
            DemoScene::Spheres => "spheres",
            DemoScene::Cornell => "cornell",
            DemoScene::Box => "box",
            DemoScene::Earth => "earth",
            DemoScene::Shapes => "shapes",
        }
    }

    /// Build the scene. Only the sphere field draws random numbers.
    pub fn build(self, rng: &mut impl Rng) -> HittableList {
        match self {
            DemoScene::Spheres => random_spheres(rng),
            DemoScene::Cornell => cornell_room(),
            DemoScene::Box => box_test(),
            DemoScene::Earth => earth(),
            DemoScene::Shapes => shapes(),
        }
    }

    /// Camera framing this scene.
    pub fn camera(self) -> CameraSettings {
        let base = CameraSettings::default()
            .with_resolution(1080, 16.0 / 9.0)
            .with_quality(100, 10);

        match self {
            DemoScene::Spheres => base
                .with_position(Point3::new(13.0, 2.0, 3.0), Point3::ZERO, Vec3::Y)
                .with_lens(20.0, 0.6, 10.0),
            DemoScene::Cornell | DemoScene::Box => base
                .with_position(Point3::new(0.0, 1.0, -4.0), Point3::new(0.0, 1.0, 0.0), Vec3::Y)
                .with_lens(40.0, 0.0, 4.0),
            DemoScene::Earth => base
                .with_position(Point3::new(0.0, 0.0, 12.0), Point3::ZERO, Vec3::Y)
                .with_lens(20.0, 0.0, 12.0),
            DemoScene::Shapes => base
                .with_position(Point3::new(0.0, 8.0, 20.0), Point3::new(0.0, 1.0, 0.0), Vec3::Y)
                .with_lens(40.0, 0.0, 20.0),
        }
    }

    pub fn default_settings(self) -> RenderSettings {
        RenderSettings::default().with_camera(self.camera())
    }
}

impl FromStr for DemoScene {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match DemoScene::ALL.iter().find(|scene| scene.name().eq_ignore_ascii_case(s)) {
            Some(scene) => Ok(*scene),
            None => bail!(
                "Unknown scene '{}', expected one of: {}",
                s,
                DemoScene::ALL.map(DemoScene::name).join(", ")
            ),
        }
    }
}

impl fmt::Display for DemoScene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn lambertian(r: f64, g: f64, b: f64) -> Arc<dyn Material> {
    Arc::new(Lambertian::new(Color::new(r, g, b)))
}

fn random_color(rng: &mut impl Rng, min: f64, max: f64) -> Color {
    Color::new(rng.gen_range(min..max), rng.gen_range(min..max), rng.gen_range(min..max))
}

fn random_spheres(rng: &mut impl Rng) -> HittableList {
    let mut world = HittableList::new();

    world.add(Sphere::new(Point3::new(0.0, -1000.0, 0.0), 1000.0, lambertian(0.5, 0.5, 0.5)));

    for a in -11..11 {
        for b in -11..11 {
            let choose_mat: f64 = rng.gen();
            let center = Point3::new(a as f64 + 0.9 * rng.gen::<f64>(), 0.2, b as f64 + 0.9 * rng.gen::<f64>());

            // Keep clear of the big metal sphere
            if (center - Point3::new(4.0, 0.2, 0.0)).length() <= 0.9 {
                continue;
            }

            let material: Arc<dyn Material> = if choose_mat < 0.8 {
                let albedo = random_color(rng, 0.0, 1.0) * random_color(rng, 0.0, 1.0);
                Arc::new(Lambertian::new(albedo))
            } else if choose_mat < 0.95 {
                Arc::new(Metal::new(random_color(rng, 0.5, 1.0), rng.gen_range(0.0..0.5)))
            } else {
                Arc::new(Dielectric::new(1.5))
            };

            world.add(Sphere::new(center, 0.2, material));
        }
    }

    world.add(Sphere::new(Point3::new(0.0, 1.0, 0.0), 1.0, Arc::new(Dielectric::new(1.5))));
    world.add(Sphere::new(Point3::new(-4.0, 1.0, 0.0), 1.0, lambertian(0.4, 0.2, 0.1)));
    world.add(Sphere::new(
        Point3::new(4.0, 1.0, 0.0),
        1.0,
        Arc::new(Metal::new(Color::new(0.7, 0.6, 0.5), 0.0)),
    ));

    world
}

/// Walls, floor and ceiling of a 2x2x2 room open towards -z.
fn room(world: &mut HittableList) {
    let red = lambertian(0.65, 0.05, 0.05);
    let green = lambertian(0.12, 0.45, 0.15);
    let white = lambertian(0.73, 0.73, 0.73);

    let (x0, x1, y0, y1, z0, z1) = (-1.0, 1.0, 0.0, 2.0, -1.0, 1.0);

    // Left
    world.add(FinitePlane::new(
        Point3::new(x0, y0, z0),
        Vec3::new(0.0, y1 - y0, 0.0),
        Vec3::new(0.0, 0.0, z1 - z0),
        green,
    ));
    // Right
    world.add(FinitePlane::new(
        Point3::new(x1, y0, z0),
        Vec3::new(0.0, 0.0, z1 - z0),
        Vec3::new(0.0, y1 - y0, 0.0),
        red,
    ));
    // Floor
    world.add(FinitePlane::new(
        Point3::new(x0, y0, z0),
        Vec3::new(x1 - x0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, z1 - z0),
        white.clone(),
    ));
    // Ceiling
    world.add(FinitePlane::new(
        Point3::new(x0, y1, z0),
        Vec3::new(x1 - x0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, z1 - z0),
        white.clone(),
    ));
    // Back
    world.add(FinitePlane::new(
        Point3::new(x0, y0, z1),
        Vec3::new(x1 - x0, 0.0, 0.0),
        Vec3::new(0.0, y1 - y0, 0.0),
        white,
    ));

    let light: Arc<dyn Material> = Arc::new(DiffuseLight::new(Color::splat(6.0)));
    world.add(FinitePlane::new(
        Point3::new(-0.3, y1 - 1e-4, -0.3),
        Vec3::new(0.6, 0.0, 0.0),
        Vec3::new(0.0, 0.0, 0.6),
        light,
    ));
}

fn cornell_room() -> HittableList {
    let mut world = HittableList::new();
    room(&mut world);

    let glass: Arc<dyn Material> = Arc::new(Dielectric::new(1.5));
    let metal: Arc<dyn Material> = Arc::new(Metal::new(Color::splat(0.9), 0.05));

    // Glass shell around a mirror ball
    let center = Point3::new(0.0, 1.0, -0.2);
    world.add(Sphere::new(center, 0.35, glass));
    world.add(Sphere::new(center, 0.30, metal));

    world
}

fn box_test() -> HittableList {
    let mut world = HittableList::new();
    world.add(Cuboid::open_front(
        Point3::new(-1.0, 0.0, -1.0),
        Point3::new(1.0, 2.0, 1.0),
        lambertian(0.73, 0.73, 0.73),
    ));
    world
}

fn earth() -> HittableList {
    let earth: Arc<dyn Material> = Arc::new(Lambertian::from_texture(Arc::new(ImageTexture::open(EARTH_TEXTURE))));
    let moon: Arc<dyn Material> = Arc::new(Lambertian::from_texture(Arc::new(ImageTexture::open(MOON_TEXTURE))));

    let mut world = HittableList::new();
    world.add(Sphere::new(Point3::ZERO, 1.0, earth));
    world.add(Sphere::new(Point3::new(4.0, 0.0, 7.0), 0.25, moon));
    world
}

fn shapes() -> HittableList {
    let mut world = HittableList::new();

    world.add(InfinitePlane::new(Point3::ZERO, Vec3::Y, lambertian(0.5, 0.5, 0.5)));

    world.add(Cylinder::new(
        Point3::new(-6.0, 1.5, 0.0),
        Vec3::Y,
        1.0,
        1.5,
        lambertian(0.8, 0.3, 0.2),
    ));
    world.add(Cone::new(
        Point3::new(-2.0, 3.0, 0.0),
        -Vec3::Y,
        1.2,
        3.0,
        Arc::new(Metal::new(Color::new(0.8, 0.8, 0.6), 0.1)),
    ));
    world.add(Capsule::new(
        Point3::new(2.0, 2.0, 0.0),
        Vec3::Y,
        0.8,
        1.2,
        lambertian(0.2, 0.4, 0.8),
    ));
    world.add(Cuboid::open_front(
        Point3::new(4.5, 0.0, -1.0),
        Point3::new(7.5, 3.0, 1.0),
        lambertian(0.73, 0.73, 0.73),
    ));
    world.add(Sphere::new(Point3::new(6.0, 1.0, 0.0), 1.0, Arc::new(Dielectric::new(1.5))));

    let light: Arc<dyn Material> = Arc::new(DiffuseLight::new(Color::splat(4.0)));
    world.add(Sphere::new(Point3::new(0.0, 7.0, 4.0), 1.0, light));

    world
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_math::{Interval, Ray};
    use lumen_renderer::{HitRecord, Hittable};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_parse_names() {
        for scene in DemoScene::ALL {
            assert_eq!(scene.name().parse::<DemoScene>().unwrap(), scene);
            assert_eq!(scene.to_string(), scene.name());
        }
        assert_eq!("Cornell".parse::<DemoScene>().unwrap(), DemoScene::Cornell);
        assert!("teapot".parse::<DemoScene>().is_err());
    }

    #[test]
    fn test_every_scene_builds_and_validates() {
        let _ = env_logger::builder().is_test(true).try_init();
        let mut rng = StdRng::seed_from_u64(1);

        for scene in DemoScene::ALL {
            assert!(!scene.build(&mut rng).is_empty(), "{} is empty", scene);
            scene.default_settings().validate().unwrap();
        }
    }

    #[test]
    fn test_sphere_field_is_seeded() {
        let a = random_spheres(&mut StdRng::seed_from_u64(3));
        let b = random_spheres(&mut StdRng::seed_from_u64(3));
        assert_eq!(a.len(), b.len());
        // Ground, three large spheres, and most of the 22x22 grid
        assert!(a.len() > 400);
    }

    #[test]
    fn test_cornell_camera_sees_back_wall() {
        let world = cornell_room();
        let ray = Ray::new(Point3::new(0.5, 0.5, -4.0), Vec3::Z);
        let mut rec = HitRecord::default();

        assert!(world.hit(&ray, Interval::new(0.001, f64::INFINITY), &mut rec));
        assert!((rec.p.z - 1.0).abs() < 1e-9);
        assert!(rec.normal.dot(Vec3::Z) < 0.0);
    }

    #[test]
    fn test_box_is_open_towards_camera() {
        let world = box_test();
        let ray = Ray::new(Point3::new(0.0, 1.0, -4.0), Vec3::Z);
        let mut rec = HitRecord::default();

        // Passes the missing front and stops on the back side
        assert!(world.hit(&ray, Interval::new(0.001, f64::INFINITY), &mut rec));
        assert!((rec.t - 5.0).abs() < 1e-9);
    }
}
