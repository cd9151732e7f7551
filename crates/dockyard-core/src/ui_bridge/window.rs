use std::fmt;

use serde::{Deserialize, Serialize};

use crate::kernel::constants;
use crate::plugin_system::registry::LoadedPlugin;
use crate::storage::config::{ConfigDocument, ConfigNode, PLUGIN_TAG, PluginDescriptor, TITLE_TAG, WindowState};
use crate::ui_bridge::MenuAction;
use crate::ui_bridge::error::UiBridgeError;

/// Non-owning reference to a dock attached to a [`MainWindow`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DockHandle(u64);

impl DockHandle {
    pub fn id(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for DockHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "dock#{}", self.0)
    }
}

/// Edge of the window a dock is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DockArea {
    #[default]
    Left,
    Right,
    Top,
    Bottom,
}

/// A dockable panel that owns exactly one plugin.
#[derive(Debug)]
pub struct DockContainer {
    handle: DockHandle,
    title: String,
    area: DockArea,
    floating: bool,
    visible: bool,
    plugin: LoadedPlugin,
}

impl DockContainer {
    pub fn handle(&self) -> DockHandle {
        self.handle
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn area(&self) -> DockArea {
        self.area
    }

    pub fn set_area(&mut self, area: DockArea) {
        self.area = area;
    }

    pub fn is_floating(&self) -> bool {
        self.floating
    }

    pub fn set_floating(&mut self, floating: bool) {
        self.floating = floating;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn plugin(&self) -> &LoadedPlugin {
        &self.plugin
    }

    pub fn plugin_mut(&mut self) -> &mut LoadedPlugin {
        &mut self.plugin
    }
}

/// Modal container for standalone runs. Owns its plugin like a dock does.
#[derive(Debug)]
pub struct DialogContainer {
    title: String,
    plugin: LoadedPlugin,
}

impl DialogContainer {
    pub fn new(plugin: LoadedPlugin) -> Self {
        Self {
            title: plugin.title(),
            plugin,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn plugin(&self) -> &LoadedPlugin {
        &self.plugin
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct LayoutState {
    version: u32,
    #[serde(default)]
    docks: Vec<DockLayoutEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
struct DockLayoutEntry {
    title: String,
    area: DockArea,
    floating: bool,
    visible: bool,
}

const LAYOUT_VERSION: u32 = 1;

/// The single top-level window: a menu plus an ordered set of docks.
#[derive(Debug)]
pub struct MainWindow {
    title: String,
    position: (i32, i32),
    size: (u32, u32),
    docks: Vec<DockContainer>,
    next_handle: u64,
    close_requested: bool,
}

impl MainWindow {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            position: (0, 0),
            size: constants::DEFAULT_WINDOW_SIZE,
            docks: Vec::new(),
            next_handle: 1,
            close_requested: false,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn position(&self) -> (i32, i32) {
        self.position
    }

    pub fn set_position(&mut self, x: i32, y: i32) {
        self.position = (x, y);
    }

    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    pub fn set_size(&mut self, width: u32, height: u32) {
        self.size = (width, height);
    }

    pub fn menu_actions(&self) -> &'static [MenuAction] {
        &MenuAction::ALL
    }

    /// Wraps `plugin` in a new dock stacked after the existing ones.
    ///
    /// Ownership moves into the window; the returned handle only identifies the dock.
    pub fn attach(&mut self, plugin: LoadedPlugin) -> DockHandle {
        let handle = DockHandle(self.next_handle);
        self.next_handle += 1;
        let title = plugin.title();
        log::debug!("Docking '{}' ({}) as {}", title, plugin.filename(), handle);
        self.docks.push(DockContainer {
            handle,
            title,
            area: DockArea::default(),
            floating: false,
            visible: true,
            plugin,
        });
        handle
    }

    pub fn dock(&self, handle: DockHandle) -> Option<&DockContainer> {
        self.docks.iter().find(|d| d.handle == handle)
    }

    pub fn dock_mut(&mut self, handle: DockHandle) -> Option<&mut DockContainer> {
        self.docks.iter_mut().find(|d| d.handle == handle)
    }

    pub fn docks(&self) -> &[DockContainer] {
        &self.docks
    }

    pub fn dock_count(&self) -> usize {
        self.docks.len()
    }

    pub fn dock_titles(&self) -> Vec<&str> {
        self.docks.iter().map(DockContainer::title).collect()
    }

    pub fn dock_filenames(&self) -> Vec<&str> {
        self.docks.iter().map(|d| d.plugin.filename()).collect()
    }

    /// Closes one dock, destroying its plugin.
    pub fn close_dock(&mut self, handle: DockHandle) -> Result<(), UiBridgeError> {
        let index = self
            .docks
            .iter()
            .position(|d| d.handle == handle)
            .ok_or(UiBridgeError::UnknownDock(handle.id()))?;
        let dock = self.docks.remove(index);
        log::debug!("Closed dock '{}'", dock.title);
        Ok(())
    }

    /// Closes every dock but keeps the window. Returns how many were closed.
    pub fn close_all_docks(&mut self) -> usize {
        let closed = self.docks.len();
        self.docks.clear();
        closed
    }

    pub fn request_close(&mut self) {
        self.close_requested = true;
    }

    pub fn is_close_requested(&self) -> bool {
        self.close_requested
    }

    /// Clears a previous close request so the window can run again.
    pub fn reopen(&mut self) {
        self.close_requested = false;
    }

    /// Encodes the dock arrangement as an opaque blob.
    pub fn save_layout(&self) -> Result<Vec<u8>, UiBridgeError> {
        let state = LayoutState {
            version: LAYOUT_VERSION,
            docks: self
                .docks
                .iter()
                .map(|d| DockLayoutEntry {
                    title: d.title.clone(),
                    area: d.area,
                    floating: d.floating,
                    visible: d.visible,
                })
                .collect(),
        };
        toml::to_string(&state)
            .map(String::into_bytes)
            .map_err(|e| UiBridgeError::InvalidLayoutState(e.to_string()))
    }

    /// Applies a blob from [`save_layout`](Self::save_layout).
    ///
    /// Entries are matched to docks by title, preferring the dock at the same
    /// position. Entries without a matching dock are ignored.
    pub fn restore_layout(&mut self, layout: &[u8]) -> Result<(), UiBridgeError> {
        let text = std::str::from_utf8(layout)
            .map_err(|e| UiBridgeError::InvalidLayoutState(e.to_string()))?;
        let state: LayoutState =
            toml::from_str(text).map_err(|e| UiBridgeError::InvalidLayoutState(e.to_string()))?;
        if state.version != LAYOUT_VERSION {
            return Err(UiBridgeError::InvalidLayoutState(format!(
                "unsupported layout version {}",
                state.version
            )));
        }

        let mut used = vec![false; self.docks.len()];
        for (index, entry) in state.docks.iter().enumerate() {
            let same_slot = index < self.docks.len()
                && !used[index]
                && self.docks[index].title == entry.title;
            let target = if same_slot {
                Some(index)
            } else {
                (0..self.docks.len()).find(|&j| !used[j] && self.docks[j].title == entry.title)
            };
            match target {
                Some(j) => {
                    used[j] = true;
                    let dock = &mut self.docks[j];
                    dock.area = entry.area;
                    dock.floating = entry.floating;
                    dock.visible = entry.visible;
                }
                None => log::debug!("No dock titled '{}' to restore layout into", entry.title),
            }
        }
        Ok(())
    }

    pub fn window_state(&self) -> Result<WindowState, UiBridgeError> {
        Ok(WindowState {
            layout: self.save_layout()?,
            position: self.position,
            size: self.size,
        })
    }

    /// Applies geometry, then the layout blob when one is present.
    pub fn apply_window_state(&mut self, state: &WindowState) -> Result<(), UiBridgeError> {
        self.position = state.position;
        self.size = state.size;
        if state.layout.is_empty() {
            return Ok(());
        }
        self.restore_layout(&state.layout)
    }

    /// Describes the live window as a config document.
    ///
    /// Each dock keeps the `<plugin>` element it was loaded with; a `<title>`
    /// child is added when that element had none.
    pub fn to_config_document(&self) -> Result<ConfigDocument, UiBridgeError> {
        let plugins = self
            .docks
            .iter()
            .map(|dock| {
                let mut node = dock
                    .plugin
                    .config()
                    .cloned()
                    .unwrap_or_else(|| ConfigNode::new(PLUGIN_TAG));
                if node.child(TITLE_TAG).is_none() {
                    node.push_child(ConfigNode::new(TITLE_TAG).with_text(dock.title.as_str()));
                }
                PluginDescriptor::new(dock.plugin.filename(), node)
            })
            .collect();
        Ok(ConfigDocument {
            plugins,
            window: Some(self.window_state()?),
        })
    }
}
