//! # Dockyard Storage
//!
//! The config store: reading and writing the XML documents that describe
//! which plugins to load and how the main window is arranged, plus the TOML
//! settings files that sit beside them.
//!
//! - **[`config`]**: [`ConfigDocument`], [`ConfigNode`] and the XML schema.
//! - **[`settings`]**: [`AppSettings`] for the shell and [`WindowSettings`]
//!   for the parallel file written on save.
//! - **[`error`]**: [`StorageSystemError`](error::StorageSystemError).
pub mod config;
pub mod error;
pub mod settings;

pub use config::{ConfigDocument, ConfigNode, PluginDescriptor, WindowState};
pub use settings::{AppSettings, WindowSettings};

// Test module declaration
#[cfg(test)]
mod tests;
