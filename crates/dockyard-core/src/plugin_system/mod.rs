//! # Dockyard Plugin System
//!
//! Everything between a plugin name in a config file and an owned plugin
//! instance waiting to be docked.
//!
//! ## Key Submodules and Responsibilities:
//!
//! - **[`traits`]**: the [`Plugin`] contract (title plus configuration load).
//! - **[`ffi`]**: the C ABI used by plugins built as shared libraries, and the
//!   [`export_plugin!`](crate::export_plugin) macro that implements it.
//! - **[`loader`]**: [`SearchPaths`] and [`PluginLoader`], which resolve a name
//!   to a builtin factory or a library on disk and instantiate it.
//! - **[`registry`]**: [`PluginRegistry`], the ordered owner of loaded plugins
//!   until they are transferred into a dock or dialog.
//! - **[`version`]**: plugin API compatibility checks.
//! - **[`error`]**: [`PluginSystemError`](error::PluginSystemError).
pub mod error;
pub mod ffi;
pub mod loader;
pub mod registry;
pub mod traits;
pub mod version;

pub use loader::{PluginFactory, PluginListing, PluginLoader, PluginLocation, SearchPaths};
pub use registry::{LoadedPlugin, PluginRegistry};
pub use traits::{Plugin, PluginError};

// Test module declaration
#[cfg(test)]
mod tests;
