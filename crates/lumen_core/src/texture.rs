//! Texture image decoding.
//!
//! Images are decoded once into a tightly packed RGB8 buffer. Sampling and
//! the fallback policy for missing images live with the renderer's textures.

use std::path::Path;

use thiserror::Error;

/// Errors that can occur during texture loading.
#[derive(Error, Debug)]
pub enum TextureError {
    #[error("Failed to load texture {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: image::ImageError,
    },

    #[error("Texture buffer has {actual} bytes, expected {expected} for {width}x{height} RGB")]
    BufferSize {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    #[error("Texture has zero size")]
    Empty,
}

pub type TextureResult<T> = Result<T, TextureError>;

/// A decoded image: row-major RGB bytes, top row first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextureImage {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl TextureImage {
    /// Wrap an existing RGB8 buffer, checking that its size matches.
    pub fn from_rgb8(width: u32, height: u32, data: Vec<u8>) -> TextureResult<Self> {
        if width == 0 || height == 0 {
            return Err(TextureError::Empty);
        }

        let expected = width as usize * height as usize * 3;
        if data.len() != expected {
            return Err(TextureError::BufferSize {
                width,
                height,
                expected,
                actual: data.len(),
            });
        }

        Ok(Self { width, height, data })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGB bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// RGB bytes of the pixel at column `x`, row `y` (clamped to the image).
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        let x = x.min(self.width - 1) as usize;
        let y = y.min(self.height - 1) as usize;
        let idx = (y * self.width as usize + x) * 3;
        [self.data[idx], self.data[idx + 1], self.data[idx + 2]]
    }
}

/// Load an image file and convert it to RGB8.
pub fn load_texture_image(path: impl AsRef<Path>) -> TextureResult<TextureImage> {
    let path = path.as_ref();

    let img = image::open(path).map_err(|source| TextureError::Decode {
        path: path.display().to_string(),
        source,
    })?;

    let rgb = img.to_rgb8();
    let (width, height) = rgb.dimensions();

    log::debug!(
        "Loaded texture: {} ({}x{}, {:.1} KB)",
        path.display(),
        width,
        height,
        (width as usize * height as usize * 3) as f64 / 1024.0
    );

    TextureImage::from_rgb8(width, height, rgb.into_raw())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rgb8() {
        let img = TextureImage::from_rgb8(2, 1, vec![255, 0, 0, 0, 255, 0]).unwrap();
        assert_eq!(img.width(), 2);
        assert_eq!(img.height(), 1);
        assert_eq!(img.pixel(0, 0), [255, 0, 0]);
        assert_eq!(img.pixel(1, 0), [0, 255, 0]);

        // Out of range coordinates clamp to the edge
        assert_eq!(img.pixel(5, 3), [0, 255, 0]);
    }

    #[test]
    fn test_from_rgb8_rejects_bad_size() {
        let err = TextureImage::from_rgb8(2, 2, vec![0; 5]).unwrap_err();
        assert!(matches!(err, TextureError::BufferSize { expected: 12, actual: 5, .. }));

        assert!(matches!(
            TextureImage::from_rgb8(0, 4, Vec::new()),
            Err(TextureError::Empty)
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let _ = env_logger::builder().is_test(true).try_init();

        let err = load_texture_image("definitely/not/a/texture.png").unwrap_err();
        assert!(matches!(err, TextureError::Decode { .. }));
        assert!(err.to_string().contains("definitely/not/a/texture.png"));
    }

    #[test]
    fn test_load_round_trip_png() {
        let path = std::env::temp_dir().join(format!("lumen_texture_{}.png", std::process::id()));
        let source = image::RgbImage::from_raw(2, 2, vec![
            10, 20, 30, 40, 50, 60,
            70, 80, 90, 100, 110, 120,
        ])
        .unwrap();
        source.save(&path).unwrap();

        let loaded = load_texture_image(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded.width(), 2);
        assert_eq!(loaded.height(), 2);
        assert_eq!(loaded.pixel(1, 1), [100, 110, 120]);
    }
}
