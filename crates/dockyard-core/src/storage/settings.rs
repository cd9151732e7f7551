//! TOML-backed settings.
//!
//! [`AppSettings`] configures the shell itself (plugin search paths,
//! verbosity, stylesheet). [`WindowSettings`] is the file written next to a
//! saved config document, holding the window geometry and layout blob.
use std::fs;
use std::path::{Path, PathBuf};

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};

use crate::kernel::constants;
use crate::storage::config::WindowState;
use crate::storage::error::StorageSystemError;

type StorageResult<T> = std::result::Result<T, StorageSystemError>;

/// Extension used for the settings file written next to a saved config.
pub const WINDOW_SETTINGS_EXTENSION: &str = "settings.toml";

/// Shell-level configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Environment variable holding extra plugin directories
    pub plugin_path_env: String,
    /// Directories searched before the environment variable
    pub plugin_paths: Vec<PathBuf>,
    /// 0 (silent) to 4 (debug)
    pub verbosity: u8,
    /// Stylesheet applied at init; the built-in style is used when unset
    pub stylesheet: Option<PathBuf>,
    pub window_title: String,
    /// Watch for Ctrl-C and request a graceful shutdown
    pub install_signal_handler: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            plugin_path_env: constants::DEFAULT_PLUGIN_PATH_ENV.to_string(),
            plugin_paths: Vec::new(),
            verbosity: constants::DEFAULT_VERBOSITY,
            stylesheet: None,
            window_title: constants::DEFAULT_WINDOW_TITLE.to_string(),
            install_signal_handler: true,
        }
    }
}

impl AppSettings {
    pub fn from_toml_str(data: &str) -> StorageResult<Self> {
        toml::from_str(data).map_err(|e| StorageSystemError::DeserializationError {
            format: "toml".to_string(),
            source: Box::new(e),
        })
    }

    pub fn load(path: &Path) -> StorageResult<Self> {
        let data = fs::read_to_string(path)
            .map_err(|e| StorageSystemError::io(e, "read_settings", path.to_path_buf()))?;
        Self::from_toml_str(&data)
    }

    /// Reads the configured stylesheet, falling back to the built-in style.
    pub fn stylesheet_contents(&self) -> StorageResult<String> {
        match &self.stylesheet {
            Some(path) => fs::read_to_string(path)
                .map_err(|e| StorageSystemError::io(e, "read_stylesheet", path.clone())),
            None => Ok(constants::DEFAULT_STYLESHEET.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowGeometryEntry {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

/// Contents of the `<config>.settings.toml` file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowSettings {
    pub geometry: WindowGeometryEntry,
    /// Base64 of the layout blob
    pub state: String,
}

impl WindowSettings {
    pub fn from_window_state(state: &WindowState) -> Self {
        Self {
            geometry: WindowGeometryEntry {
                x: state.position.0,
                y: state.position.1,
                width: state.size.0,
                height: state.size.1,
            },
            state: BASE64.encode(&state.layout),
        }
    }

    pub fn to_window_state(&self) -> StorageResult<WindowState> {
        let layout = BASE64
            .decode(self.state.trim())
            .map_err(|e| StorageSystemError::InvalidValue {
                element: "state".to_string(),
                value: self.state.clone(),
                reason: e.to_string(),
            })?;
        Ok(WindowState {
            layout,
            position: (self.geometry.x, self.geometry.y),
            size: (self.geometry.width, self.geometry.height),
        })
    }

    /// Path of the settings file that accompanies `config_path`.
    pub fn path_for(config_path: &Path) -> PathBuf {
        config_path.with_extension(WINDOW_SETTINGS_EXTENSION)
    }

    pub fn save(&self, path: &Path) -> StorageResult<()> {
        let data = toml::to_string_pretty(self).map_err(|e| StorageSystemError::SerializationError {
            format: "toml".to_string(),
            source: Box::new(e),
        })?;
        fs::write(path, data).map_err(|e| StorageSystemError::io(e, "write_settings", path.to_path_buf()))
    }

    pub fn load(path: &Path) -> StorageResult<Self> {
        let data = fs::read_to_string(path)
            .map_err(|e| StorageSystemError::io(e, "read_settings", path.to_path_buf()))?;
        toml::from_str(&data).map_err(|e| StorageSystemError::DeserializationError {
            format: "toml".to_string(),
            source: Box::new(e),
        })
    }
}
