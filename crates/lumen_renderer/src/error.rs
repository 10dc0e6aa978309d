//! Render errors.

use std::path::PathBuf;

use lumen_core::SettingsError;
use thiserror::Error;

/// Errors that can occur while rendering or writing an image.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Invalid render settings: {0}")]
    Settings(#[from] SettingsError),

    #[error("Failed to build render thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("Failed to write output file {path:?}: {source}")]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type RenderResult<T> = Result<T, RenderError>;
