//! Accumulation framebuffer and P3 serialization.

use std::io::{self, Write};

use crate::renderer::color_to_rgb8;
use crate::Color;
use rayon::prelude::*;

/// Write progress is reported once every this many rows (and on the last row).
pub const WRITE_PROGRESS_INTERVAL: u32 = 10;

/// Per-pixel sample sums for a whole image, stored row-major from the top-left.
#[derive(Debug, Clone)]
pub struct Framebuffer {
    width: u32,
    height: u32,
    samples_per_pixel: u32,
    pixels: Vec<Color>,
}

impl Framebuffer {
    /// Create a framebuffer filled with black.
    pub fn new(width: u32, height: u32, samples_per_pixel: u32) -> Self {
        Self {
            width,
            height,
            samples_per_pixel: samples_per_pixel.max(1),
            pixels: vec![Color::ZERO; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of samples summed into each pixel.
    pub fn samples_per_pixel(&self) -> u32 {
        self.samples_per_pixel
    }

    /// Accumulated sum at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[self.index(x, y)]
    }

    pub fn set(&mut self, x: u32, y: u32, sum: Color) {
        let index = self.index(x, y);
        self.pixels[index] = sum;
    }

    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    /// Disjoint mutable rows, top to bottom.
    pub fn rows_mut(&mut self) -> std::slice::ChunksExactMut<'_, Color> {
        self.pixels.chunks_exact_mut(self.width.max(1) as usize)
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Average, gamma-correct and quantize every pixel into packed RGB bytes.
    pub fn to_rgb8(&self) -> Vec<u8> {
        let mut bytes = vec![0u8; self.pixels.len() * 3];
        let samples = self.samples_per_pixel;

        bytes
            .par_chunks_exact_mut(3)
            .zip(self.pixels.par_iter())
            .for_each(|(rgb, sum)| rgb.copy_from_slice(&color_to_rgb8(*sum, samples)));

        bytes
    }

    /// Serialize as an ASCII P3 image.
    pub fn write_ppm<W: Write>(&self, out: W) -> io::Result<()> {
        self.write_ppm_with_progress(out, |_, _| {})
    }

    /// Serialize as an ASCII P3 image, calling `progress(rows_written, height)`
    /// every [`WRITE_PROGRESS_INTERVAL`] rows and after the last row.
    pub fn write_ppm_with_progress<W, F>(&self, mut out: W, mut progress: F) -> io::Result<()>
    where
        W: Write,
        F: FnMut(u32, u32),
    {
        write!(out, "P3\n{} {}\n255\n", self.width, self.height)?;

        let bytes = self.to_rgb8();
        let row_len = self.width as usize * 3;
        if row_len == 0 {
            return out.flush();
        }

        for (j, row) in bytes.chunks_exact(row_len).enumerate() {
            for rgb in row.chunks_exact(3) {
                writeln!(out, "{} {} {}", rgb[0], rgb[1], rgb[2])?;
            }

            let j = j as u32;
            if j % WRITE_PROGRESS_INTERVAL == 0 || j + 1 == self.height {
                progress(j + 1, self.height);
            }
        }

        out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_pixel_p3() {
        let mut framebuffer = Framebuffer::new(2, 1, 1);
        framebuffer.set(0, 0, Color::new(1.0, 0.0, 0.0));
        framebuffer.set(1, 0, Color::new(0.0, 1.0, 0.0));

        let mut out = Vec::new();
        framebuffer.write_ppm(&mut out).unwrap();

        assert_eq!(String::from_utf8(out).unwrap(), "P3\n2 1\n255\n255 0 0\n0 255 0\n");
    }

    #[test]
    fn test_row_major_order() {
        let mut framebuffer = Framebuffer::new(2, 2, 4);
        framebuffer.set(1, 0, Color::splat(4.0));
        framebuffer.set(0, 1, Color::new(0.0, 0.0, 4.0));

        let bytes = framebuffer.to_rgb8();
        assert_eq!(bytes.len(), 12);
        assert_eq!(&bytes[0..3], &[0, 0, 0]);
        assert_eq!(&bytes[3..6], &[255, 255, 255]);
        assert_eq!(&bytes[6..9], &[0, 0, 255]);
        assert_eq!(framebuffer.get(1, 0), Color::splat(4.0));
    }

    #[test]
    fn test_rows_mut_are_disjoint_rows() {
        let mut framebuffer = Framebuffer::new(3, 2, 1);
        for (j, row) in framebuffer.rows_mut().enumerate() {
            assert_eq!(row.len(), 3);
            row.fill(Color::splat(j as f64));
        }
        assert_eq!(framebuffer.get(2, 0), Color::ZERO);
        assert_eq!(framebuffer.get(0, 1), Color::ONE);
    }

    #[test]
    fn test_write_progress_cadence() {
        let framebuffer = Framebuffer::new(1, 25, 1);
        let mut reports = Vec::new();
        framebuffer
            .write_ppm_with_progress(io::sink(), |done, total| reports.push((done, total)))
            .unwrap();

        assert_eq!(reports, vec![(1, 25), (11, 25), (21, 25), (25, 25)]);
    }

    #[test]
    fn test_line_count() {
        let framebuffer = Framebuffer::new(4, 3, 1);
        let mut out = Vec::new();
        framebuffer.write_ppm(&mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 3 + 12);
        assert!(text.lines().skip(3).all(|line| line == "0 0 0"));
    }
}
