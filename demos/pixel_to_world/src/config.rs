use std::path::{Path, PathBuf};

use camtf::{CameraExtrinsicParams, CameraIntrinsicParams};
use serde::Deserialize;
use thiserror::Error;

/// Error types for loading the demo configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read
    #[error("Failed to read config {path}: {source}")]
    Io {
        /// Path of the config file
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// The config file is not valid JSON or misses a required field
    #[error("Failed to parse config {path}: {source}")]
    Parse {
        /// Path of the config file
        path: PathBuf,
        /// Underlying decoding error
        source: serde_json::Error,
    },
}

/// Sections of a JSON config file. Absent sections keep the sample values.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    intrinsics: Option<CameraIntrinsicParams>,
    extrinsics: Option<CameraExtrinsicParams>,
    pixel: Option<[f64; 2]>,
}

/// Camera parameters and the pixel to map into the world.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    /// Image and sensor geometry
    pub intrinsics: CameraIntrinsicParams,
    /// Camera orientation and translation
    pub extrinsics: CameraExtrinsicParams,
    /// Pixel `(u, v)` to map
    pub pixel: [f64; 2],
}

impl Default for Scene {
    fn default() -> Self {
        Self {
            intrinsics: CameraIntrinsicParams {
                image_width: 1920,
                image_height: 1080,
                sensor_width: 5.18,
                sensor_height: 3.89,
                focal_length: 3.93,
            },
            extrinsics: CameraExtrinsicParams {
                yaw: 326.5061,
                pitch: 8.7828,
                roll: 0.0404,
                x_t: 0.0,
                y_t: 0.0,
                z_t: 0.0,
            },
            pixel: [720.0, 619.0],
        }
    }
}

impl Scene {
    fn merge(file: ConfigFile) -> Self {
        let defaults = Self::default();
        Self {
            intrinsics: file.intrinsics.unwrap_or(defaults.intrinsics),
            extrinsics: file.extrinsics.unwrap_or(defaults.extrinsics),
            pixel: file.pixel.unwrap_or(defaults.pixel),
        }
    }
}

/// Parse a scene from JSON text; `path` is only used in error messages.
pub fn parse_scene(text: &str, path: &Path) -> Result<Scene, ConfigError> {
    let file: ConfigFile = serde_json::from_str(text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Scene::merge(file))
}

/// Load a scene from a JSON config file.
pub fn load_scene(path: &Path) -> Result<Scene, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    log::info!("loading camera config from {}", path.display());
    parse_scene(&text, path)
}
