//! # Dockyard Plugin System Errors
//!
//! [`PluginSystemError`] covers resolving a plugin name on the search paths,
//! loading the shared library, validating the exported contract and the
//! plugin's own configuration step.
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum PluginSystemError {
    #[error("Plugin '{filename}' not found on search paths [{}]", .searched.iter().map(|p| p.display().to_string()).collect::<Vec<_>>().join(", "))]
    NotFound {
        filename: String,
        searched: Vec<PathBuf>,
    },

    #[error("Plugin loading failed for '{plugin_id}': {source}")]
    LoadingError {
        plugin_id: String,
        path: Option<PathBuf>,
        #[source]
        source: Box<PluginSystemErrorSource>,
    },

    #[error("FFI error in plugin '{plugin_id}' during operation '{operation}': {message}")]
    FfiError {
        plugin_id: String,
        operation: String,
        message: String,
    },

    #[error("Plugin '{plugin_id}' targets API {plugin_api}, host provides {host_api}")]
    IncompatibleApi {
        plugin_id: String,
        plugin_api: String,
        host_api: String,
    },

    #[error("Plugin '{plugin_id}' rejected its configuration: {source}")]
    ConfigurationRejected {
        plugin_id: String,
        #[source]
        source: crate::plugin_system::traits::PluginError,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum PluginSystemErrorSource {
    #[error(transparent)]
    Library(#[from] libloading::Error),
    #[error("Version parse error: {0}")]
    Version(#[from] semver::Error),
    #[error("Other: {0}")]
    Other(String),
}

impl From<String> for PluginSystemErrorSource {
    fn from(message: String) -> Self {
        PluginSystemErrorSource::Other(message)
    }
}

impl PluginSystemError {
    pub(crate) fn loading(
        plugin_id: impl Into<String>,
        path: Option<PathBuf>,
        source: impl Into<PluginSystemErrorSource>,
    ) -> Self {
        PluginSystemError::LoadingError {
            plugin_id: plugin_id.into(),
            path,
            source: Box::new(source.into()),
        }
    }
}
