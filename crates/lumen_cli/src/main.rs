//! Lumen command line renderer.
//!
//! Usage: `lumen [SCENE] [SETTINGS.json]`
//!
//! Renders one of the built-in demo scenes into `Outputs/` under the working
//! directory. A settings file replaces the scene's camera preset and render
//! options; fields it leaves out take their defaults.

mod scenes;

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use lumen_core::RenderSettings;
use lumen_renderer::render_to_file;
use rand::rngs::StdRng;
use rand::SeedableRng;
use scenes::DemoScene;

/// Directory, relative to the working directory, that receives rendered images.
const OUTPUT_DIR: &str = "Outputs";

/// File name encoding the settings an image was rendered with.
fn output_file_name(settings: &RenderSettings) -> String {
    let camera = &settings.camera;
    format!(
        "out_{}x{}_spp{}_fd{}_thr{}.ppm",
        camera.image_width,
        camera.image_height(),
        camera.samples_per_pixel,
        camera.focus_dist,
        settings.thread_count()
    )
}

fn output_path(root: &Path, settings: &RenderSettings) -> Result<PathBuf> {
    let dir = root.join(OUTPUT_DIR);
    fs::create_dir_all(&dir).with_context(|| format!("Failed to create output directory {}", dir.display()))?;
    Ok(dir.join(output_file_name(settings)))
}

fn print_usage(program: &str) {
    let names: Vec<&str> = DemoScene::ALL.iter().map(|scene| scene.name()).collect();
    eprintln!("Usage: {} [SCENE] [SETTINGS.json]", program);
    eprintln!("Scenes: {} (default: {})", names.join(", "), DemoScene::default());
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("lumen");
    if args.iter().skip(1).any(|arg| arg == "-h" || arg == "--help") {
        print_usage(program);
        return Ok(());
    }

    let scene = match args.get(1) {
        Some(name) => name.parse::<DemoScene>()?,
        None => DemoScene::default(),
    };

    let settings = match args.get(2) {
        Some(path) => RenderSettings::from_json_file(path)
            .with_context(|| format!("Failed to load settings from {}", path))?,
        None => scene.default_settings(),
    };

    log::info!("Building scene: {}", scene);
    let mut rng = match settings.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let world = scene.build(&mut rng);
    log::info!("Scene has {} objects", world.len());

    let path = output_path(&env::current_dir()?, &settings)?;
    let report = render_to_file(&world, &settings, &path)?;
    log::debug!("{:?}", report);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_core::CameraSettings;

    #[test]
    fn test_output_file_name() {
        let camera = CameraSettings::default()
            .with_resolution(1080, 16.0 / 9.0)
            .with_quality(100, 10)
            .with_lens(40.0, 0.0, 6.0);
        let settings = RenderSettings::default().with_camera(camera).with_threads(8);

        assert_eq!(output_file_name(&settings), "out_1080x607_spp100_fd6_thr8.ppm");

        let settings = settings.with_camera(CameraSettings::default().with_lens(20.0, 0.6, 3.5));
        assert_eq!(output_file_name(&settings), "out_500x281_spp50_fd3.5_thr8.ppm");
    }

    #[test]
    fn test_output_path_creates_directory() {
        let root = env::temp_dir().join(format!("lumen_cli_{}", std::process::id()));
        let settings = RenderSettings::default().with_threads(2);

        let path = output_path(&root, &settings).unwrap();
        assert!(root.join(OUTPUT_DIR).is_dir());
        assert_eq!(path.parent(), Some(root.join(OUTPUT_DIR).as_path()));

        fs::remove_dir_all(&root).ok();
    }
}
