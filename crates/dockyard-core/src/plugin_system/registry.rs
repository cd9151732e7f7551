use std::collections::VecDeque;
use std::fmt;

use crate::plugin_system::traits::Plugin;
use crate::storage::config::ConfigNode;

/// A plugin instance together with what it was loaded from.
pub struct LoadedPlugin {
    filename: String,
    config: Option<ConfigNode>,
    plugin: Box<dyn Plugin>,
}

impl LoadedPlugin {
    pub fn new(filename: impl Into<String>, config: Option<ConfigNode>, plugin: Box<dyn Plugin>) -> Self {
        Self {
            filename: filename.into(),
            config,
            plugin,
        }
    }

    /// Name the plugin was requested by (the `filename` attribute).
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// The `<plugin>` element the plugin was configured with, if any.
    pub fn config(&self) -> Option<&ConfigNode> {
        self.config.as_ref()
    }

    pub fn title(&self) -> String {
        self.plugin.title()
    }

    pub fn plugin(&self) -> &dyn Plugin {
        self.plugin.as_ref()
    }

    pub fn plugin_mut(&mut self) -> &mut dyn Plugin {
        self.plugin.as_mut()
    }
}

impl fmt::Debug for LoadedPlugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadedPlugin")
            .field("filename", &self.filename)
            .field("title", &self.plugin.title())
            .finish()
    }
}

/// Ordered holding area for loaded plugins that are not attached to a container yet.
///
/// The registry owns every entry until a composition step moves it out with
/// [`take_all`](Self::take_all) or [`take_next`](Self::take_next). Nothing is
/// handed out by reference for keeps, so a moved entry can never be reached
/// through the registry again.
#[derive(Debug, Default)]
pub struct PluginRegistry {
    entries: VecDeque<LoadedPlugin>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a plugin; insertion order is load order.
    pub fn register(&mut self, plugin: LoadedPlugin) {
        log::debug!("Registered plugin '{}' ({} pending)", plugin.filename, self.entries.len() + 1);
        self.entries.push_back(plugin);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LoadedPlugin> {
        self.entries.iter()
    }

    pub fn filenames(&self) -> Vec<&str> {
        self.entries.iter().map(LoadedPlugin::filename).collect()
    }

    pub fn titles(&self) -> Vec<String> {
        self.entries.iter().map(LoadedPlugin::title).collect()
    }

    /// Moves every entry out, leaving the registry empty.
    pub fn take_all(&mut self) -> Vec<LoadedPlugin> {
        self.entries.drain(..).collect()
    }

    /// Moves the oldest entry out.
    pub fn take_next(&mut self) -> Option<LoadedPlugin> {
        self.entries.pop_front()
    }

    /// Destroys every pending entry. Returns how many were dropped.
    pub fn clear(&mut self) -> usize {
        let dropped = self.entries.len();
        self.entries.clear();
        dropped
    }
}
