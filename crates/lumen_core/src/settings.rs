//! Render and camera configuration.
//!
//! Settings are plain data: they can be built in code with the `with_*`
//! methods or loaded from JSON. Derived camera geometry is computed by the
//! renderer when a render starts.

use std::num::NonZeroUsize;
use std::path::Path;

use lumen_math::{Point3, Vec3};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while loading or validating settings.
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid settings JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid setting `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: String,
    },
}

pub type SettingsResult<T> = Result<T, SettingsError>;

/// Camera and image settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    /// Ratio of image width over height
    pub aspect_ratio: f64,
    /// Rendered image width in pixels
    pub image_width: u32,
    /// Monte Carlo samples per pixel
    pub samples_per_pixel: u32,
    /// Maximum number of ray bounces
    pub max_depth: u32,

    /// Vertical field of view in degrees
    pub vfov: f64,
    pub look_from: Point3,
    pub look_at: Point3,
    pub vup: Vec3,

    /// Variation angle of rays through each pixel, in degrees (<= 0 disables depth of field)
    pub defocus_angle: f64,
    /// Distance from camera to plane of perfect focus
    pub focus_dist: f64,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            aspect_ratio: 16.0 / 9.0,
            image_width: 500,
            samples_per_pixel: 50,
            max_depth: 10,
            vfov: 20.0,
            look_from: Point3::new(13.0, 2.0, 3.0),
            look_at: Point3::ZERO,
            vup: Vec3::Y,
            defocus_angle: 0.0,
            focus_dist: 10.0,
        }
    }
}

impl CameraSettings {
    /// Set image width and aspect ratio. Height is derived.
    pub fn with_resolution(mut self, image_width: u32, aspect_ratio: f64) -> Self {
        self.image_width = image_width;
        self.aspect_ratio = aspect_ratio;
        self
    }

    /// Set quality settings.
    pub fn with_quality(mut self, samples_per_pixel: u32, max_depth: u32) -> Self {
        self.samples_per_pixel = samples_per_pixel;
        self.max_depth = max_depth;
        self
    }

    /// Set camera position.
    pub fn with_position(mut self, look_from: Point3, look_at: Point3, vup: Vec3) -> Self {
        self.look_from = look_from;
        self.look_at = look_at;
        self.vup = vup;
        self
    }

    /// Set lens settings.
    pub fn with_lens(mut self, vfov: f64, defocus_angle: f64, focus_dist: f64) -> Self {
        self.vfov = vfov;
        self.defocus_angle = defocus_angle;
        self.focus_dist = focus_dist;
        self
    }

    /// Image height: `floor(width / aspect_ratio)`, never less than 1.
    pub fn image_height(&self) -> u32 {
        let height = (self.image_width as f64 / self.aspect_ratio) as u32;
        height.max(1)
    }

    /// Check that every value is usable for a render.
    pub fn validate(&self) -> SettingsResult<()> {
        if self.image_width == 0 {
            return Err(invalid("image_width", "must be greater than zero"));
        }
        if !(self.aspect_ratio.is_finite() && self.aspect_ratio > 0.0) {
            return Err(invalid("aspect_ratio", format!("must be positive, got {}", self.aspect_ratio)));
        }
        if self.samples_per_pixel == 0 {
            return Err(invalid("samples_per_pixel", "must be at least 1"));
        }
        if !(self.vfov.is_finite() && self.vfov > 0.0 && self.vfov < 180.0) {
            return Err(invalid("vfov", format!("must be in (0, 180), got {}", self.vfov)));
        }
        if !(self.focus_dist.is_finite() && self.focus_dist > 0.0) {
            return Err(invalid("focus_dist", format!("must be positive, got {}", self.focus_dist)));
        }
        if !self.defocus_angle.is_finite() {
            return Err(invalid("defocus_angle", "must be finite"));
        }
        if !(self.look_from.is_finite() && self.look_at.is_finite() && self.vup.is_finite()) {
            return Err(invalid("look_from", "camera vectors must be finite"));
        }
        if self.look_from == self.look_at {
            return Err(invalid("look_at", "must differ from look_from"));
        }
        if self.vup.cross(self.look_from - self.look_at).length_squared() == 0.0 {
            return Err(invalid("vup", "must not be parallel to the view direction"));
        }
        Ok(())
    }
}

/// Which estimator the renderer evaluates per sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderMode {
    /// Full Monte Carlo path tracing
    #[default]
    Path,
    /// Surface normals mapped to colors, for debugging geometry
    Normals,
}

/// Top-level render configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    pub camera: CameraSettings,
    /// Worker thread count (defaults to the available hardware parallelism)
    pub threads: Option<usize>,
    /// Fixed seed for reproducible renders; `None` seeds from system entropy
    pub seed: Option<u64>,
    pub mode: RenderMode,
    /// Print a live progress line on stderr
    pub show_progress: bool,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            camera: CameraSettings::default(),
            threads: None,
            seed: None,
            mode: RenderMode::Path,
            show_progress: true,
        }
    }
}

impl RenderSettings {
    pub fn with_camera(mut self, camera: CameraSettings) -> Self {
        self.camera = camera;
        self
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_mode(mut self, mode: RenderMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Number of worker threads to launch, never less than 1.
    pub fn thread_count(&self) -> usize {
        self.threads
            .unwrap_or_else(|| {
                std::thread::available_parallelism()
                    .map(NonZeroUsize::get)
                    .unwrap_or(1)
            })
            .max(1)
    }

    pub fn validate(&self) -> SettingsResult<()> {
        self.camera.validate()
    }

    /// Parse settings from a JSON string and validate them.
    ///
    /// Missing fields take their default values.
    pub fn from_json_str(json: &str) -> SettingsResult<Self> {
        let settings: RenderSettings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file and validate them.
    pub fn from_json_file(path: impl AsRef<Path>) -> SettingsResult<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let settings = Self::from_json_str(&text)?;
        log::debug!("Loaded render settings from {}", path.as_ref().display());
        Ok(settings)
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> SettingsError {
    SettingsError::Invalid {
        field,
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_camera_is_valid() {
        let camera = CameraSettings::default();
        assert!(camera.validate().is_ok());
        assert_eq!(camera.image_width, 500);
        assert_eq!(camera.image_height(), 281);
    }

    #[test]
    fn test_image_height_floors_to_one() {
        let camera = CameraSettings::default().with_resolution(10, 100.0);
        assert_eq!(camera.image_height(), 1);

        let camera = CameraSettings::default().with_resolution(2, 2.0);
        assert_eq!(camera.image_height(), 1);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let zero_width = CameraSettings::default().with_resolution(0, 1.0);
        assert!(matches!(
            zero_width.validate(),
            Err(SettingsError::Invalid { field: "image_width", .. })
        ));

        let bad_aspect = CameraSettings::default().with_resolution(100, -1.0);
        assert!(bad_aspect.validate().is_err());

        let no_samples = CameraSettings::default().with_quality(0, 10);
        assert!(matches!(
            no_samples.validate(),
            Err(SettingsError::Invalid { field: "samples_per_pixel", .. })
        ));

        let bad_focus = CameraSettings::default().with_lens(40.0, 0.0, 0.0);
        assert!(bad_focus.validate().is_err());

        let degenerate_up = CameraSettings::default().with_position(Vec3::ZERO, Vec3::Y, Vec3::Y);
        assert!(degenerate_up.validate().is_err());
    }

    #[test]
    fn test_thread_count_floor() {
        let settings = RenderSettings::default().with_threads(0);
        assert_eq!(settings.thread_count(), 1);

        let settings = RenderSettings::default();
        assert!(settings.thread_count() >= 1);
    }

    #[test]
    fn test_from_json_partial() {
        let json = r#"{
            "camera": { "image_width": 64, "look_from": [0.0, 0.0, 3.0], "look_at": [0.0, 0.0, 0.0] },
            "seed": 7,
            "mode": "normals"
        }"#;
        let settings = RenderSettings::from_json_str(json).unwrap();

        assert_eq!(settings.camera.image_width, 64);
        assert_eq!(settings.camera.look_from, Vec3::new(0.0, 0.0, 3.0));
        // Unspecified fields keep their defaults
        assert_eq!(settings.camera.samples_per_pixel, 50);
        assert_eq!(settings.seed, Some(7));
        assert_eq!(settings.mode, RenderMode::Normals);
        assert!(settings.show_progress);
    }

    #[test]
    fn test_from_json_invalid() {
        assert!(matches!(
            RenderSettings::from_json_str("{ not json"),
            Err(SettingsError::Json(_))
        ));
        assert!(matches!(
            RenderSettings::from_json_str(r#"{ "camera": { "samples_per_pixel": 0 } }"#),
            Err(SettingsError::Invalid { .. })
        ));
    }

    #[test]
    fn test_json_round_trip_file() {
        let path = std::env::temp_dir().join(format!("lumen_settings_{}.json", std::process::id()));
        let settings = RenderSettings::default().with_seed(11).with_threads(3);
        std::fs::write(&path, serde_json::to_string_pretty(&settings).unwrap()).unwrap();

        let loaded = RenderSettings::from_json_file(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            RenderSettings::from_json_file("no/such/settings.json"),
            Err(SettingsError::Io(_))
        ));
    }
}
