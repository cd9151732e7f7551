use std::fmt;

use crate::storage::config::ConfigNode;

/// Error type for plugin operations
#[derive(Debug)]
pub enum PluginError {
    /// The plugin could not make sense of its configuration node.
    ConfigError(String),
    /// The plugin failed to set itself up.
    LoadError(String),
    /// A plugin behind the C ABI reported a failure code.
    Ffi(String),
}

impl fmt::Display for PluginError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PluginError::ConfigError(msg) => write!(f, "Plugin configuration error: {}", msg),
            PluginError::LoadError(msg) => write!(f, "Plugin loading error: {}", msg),
            PluginError::Ffi(msg) => write!(f, "Plugin FFI error: {}", msg),
        }
    }
}

impl std::error::Error for PluginError {}

/// Contract every hosted plugin implements.
///
/// A plugin provides the widget shown inside one dock container or dialog.
/// The host only needs two things from it: a title for the container, and a
/// way to hand over the plugin's own `<plugin>` config element.
pub trait Plugin {
    /// Title shown on the dock container or dialog.
    fn title(&self) -> String;

    /// Apply plugin-specific configuration.
    ///
    /// `config` is the whole `<plugin>` element from the config document, or
    /// `None` when the plugin was loaded without one (standalone runs). Its
    /// children are opaque to the host: text of leaf elements arrives
    /// untrimmed.
    fn load(&mut self, config: Option<&ConfigNode>) -> Result<(), PluginError>;
}
