//! Lumen Core - settings and asset loading shared by the renderer and CLI.
//!
//! This crate provides:
//!
//! - **Settings**: `CameraSettings`, `RenderSettings`, loadable from JSON
//! - **Textures**: decoding image files into RGB8 buffers
//!
//! # Example
//!
//! ```ignore
//! use lumen_core::RenderSettings;
//!
//! let settings = RenderSettings::from_json_file("render.json")?;
//! println!("{}x{}", settings.camera.image_width, settings.camera.image_height());
//! ```

pub mod settings;
pub mod texture;

pub use settings::{CameraSettings, RenderMode, RenderSettings, SettingsError, SettingsResult};
pub use texture::{load_texture_image, TextureError, TextureImage, TextureResult};
