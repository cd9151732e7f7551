//! Dockyard: a plugin-hosting desktop shell.
//!
//! Plugins are resolved by name on a set of search paths (or registered as
//! builtins), configured from an XML document, and composed into dock
//! containers of a single main window or presented one by one as modal
//! dialogs.
pub mod kernel;
pub mod plugin_system;
pub mod storage;
pub mod ui_bridge;
pub mod utils;

pub use kernel::{ApplicationController, Error as KernelError, ErrorKind, LoadReport};
pub use plugin_system::{Plugin, PluginError, PluginLoader, PluginRegistry, SearchPaths};
pub use storage::{AppSettings, ConfigDocument, ConfigNode};
pub use ui_bridge::{HeadlessMode, HeadlessProbe, HeadlessToolkit, MainWindow, Toolkit};
