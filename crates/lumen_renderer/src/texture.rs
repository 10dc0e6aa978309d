//! Textures sampled by materials at surface UV coordinates.

use std::path::Path;

use crate::Color;
use lumen_core::{load_texture_image, TextureImage};
use lumen_math::{Interval, Point3};

/// Returned for every sample of an image texture that failed to load.
pub const MISSING_TEXTURE_COLOR: Color = Color::new(1.0, 0.0, 1.0);

/// A color source evaluated at a surface point.
pub trait Texture: Send + Sync {
    fn value(&self, u: f64, v: f64, p: Point3) -> Color;
}

/// A constant color.
#[derive(Debug, Clone, Copy)]
pub struct SolidColor {
    color: Color,
}

impl SolidColor {
    pub fn new(color: Color) -> Self {
        Self { color }
    }
}

impl Texture for SolidColor {
    fn value(&self, _u: f64, _v: f64, _p: Point3) -> Color {
        self.color
    }
}

/// Nearest-neighbour lookup into a decoded RGB image.
pub struct ImageTexture {
    image: Option<TextureImage>,
}

impl ImageTexture {
    pub fn new(image: TextureImage) -> Self {
        Self { image: Some(image) }
    }

    /// Load an image file. A file that cannot be decoded is reported once
    /// here and the texture samples as [`MISSING_TEXTURE_COLOR`].
    pub fn open(path: impl AsRef<Path>) -> Self {
        match load_texture_image(path.as_ref()) {
            Ok(image) => Self::new(image),
            Err(err) => {
                log::error!("Could not load image texture: {}", err);
                Self { image: None }
            }
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.image.is_some()
    }
}

impl Texture for ImageTexture {
    fn value(&self, u: f64, v: f64, _p: Point3) -> Color {
        let Some(image) = &self.image else {
            return MISSING_TEXTURE_COLOR;
        };

        let unit = Interval::new(0.0, 1.0);
        let u = unit.clamp(u);
        // Image rows run top to bottom
        let v = 1.0 - unit.clamp(v);

        let i = (u * (image.width() - 1) as f64) as u32;
        let j = (v * (image.height() - 1) as f64) as u32;
        let [r, g, b] = image.pixel(i, j);

        let scale = 1.0 / 255.0;
        Color::new(r as f64 * scale, g as f64 * scale, b as f64 * scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker_2x2() -> TextureImage {
        // Top row: red, green. Bottom row: blue, white.
        TextureImage::from_rgb8(
            2,
            2,
            vec![255, 0, 0, 0, 255, 0, 0, 0, 255, 255, 255, 255],
        )
        .unwrap()
    }

    #[test]
    fn test_solid_color() {
        let tex = SolidColor::new(Color::new(1.0, 0.5, 0.0));
        assert_eq!(tex.value(0.3, 0.9, Point3::ZERO), Color::new(1.0, 0.5, 0.0));
    }

    #[test]
    fn test_image_lookup_flips_v() {
        let tex = ImageTexture::new(checker_2x2());
        assert!(tex.is_loaded());

        // v = 1 is the top row of the image
        assert_eq!(tex.value(0.0, 1.0, Point3::ZERO), Color::new(1.0, 0.0, 0.0));
        assert_eq!(tex.value(1.0, 1.0, Point3::ZERO), Color::new(0.0, 1.0, 0.0));
        assert_eq!(tex.value(0.0, 0.0, Point3::ZERO), Color::new(0.0, 0.0, 1.0));
        assert_eq!(tex.value(1.0, 0.0, Point3::ZERO), Color::ONE);
    }

    #[test]
    fn test_image_lookup_clamps_uv() {
        let tex = ImageTexture::new(checker_2x2());
        assert_eq!(tex.value(-3.0, 7.0, Point3::ZERO), Color::new(1.0, 0.0, 0.0));
        assert_eq!(tex.value(4.0, -1.0, Point3::ZERO), Color::ONE);
    }

    #[test]
    fn test_missing_image_falls_back() {
        let _ = env_logger::builder().is_test(true).try_init();

        let tex = ImageTexture::open("Textures/not_there.jpg");
        assert!(!tex.is_loaded());
        assert_eq!(tex.value(0.5, 0.5, Point3::ZERO), MISSING_TEXTURE_COLOR);
    }
}
