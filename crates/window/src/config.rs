use std::path::Path;

use kedarium_camera::CameraConfig;
use kedarium_common::Color;
use kedarium_input::KeyBindings;
use serde::{Deserialize, Serialize};

use crate::error::WindowError;

/// Startup configuration for a window. Missing JSON fields take defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Size restored when leaving fullscreen.
    pub windowed_width: u32,
    pub windowed_height: u32,
    pub clear_color: Color,
    /// MSAA samples requested from the context; 0 disables multisampling.
    pub samples: u8,
    pub vsync: bool,
    pub keys: KeyBindings,
    pub camera: CameraConfig,
}

impl WindowConfig {
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, WindowError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| WindowError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config = serde_json::from_str(&text).map_err(|source| WindowError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!(path = %path.display(), "loaded window config");
        Ok(config)
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Kedarium".to_string(),
            width: 800,
            height: 600,
            windowed_width: 800,
            windowed_height: 600,
            clear_color: Color::rgb8(30, 30, 36),
            samples: 4,
            vsync: true,
            keys: KeyBindings::default(),
            camera: CameraConfig::default(),
        }
    }
}
