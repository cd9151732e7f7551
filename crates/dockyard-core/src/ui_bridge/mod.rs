//! # Dockyard UI Bridge
//!
//! The narrow boundary between the shell and whatever GUI toolkit renders it.
//!
//! The shell owns the model ([`MainWindow`], its [`DockContainer`]s and any
//! [`DialogContainer`]); a [`Toolkit`] presents that model, reports user
//! input as [`UiEvent`]s, runs modal dialogs and answers file prompts.
//! [`HeadlessToolkit`] is the in-tree backend: scripted for tests, or blocking
//! until interrupted for the command-line binary.
pub mod error;
pub mod headless;
pub mod window;

use std::path::PathBuf;
use std::time::Duration;

use crate::kernel::signal::ShutdownSignal;
use crate::ui_bridge::error::UiBridgeError;

pub use headless::{HeadlessMode, HeadlessProbe, HeadlessToolkit};
pub use window::{DialogContainer, DockArea, DockContainer, DockHandle, MainWindow};

/// Entries of the main window's menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    LoadConfiguration,
    SaveConfiguration,
    Quit,
}

impl MenuAction {
    /// Menu order.
    pub const ALL: [MenuAction; 3] = [
        MenuAction::LoadConfiguration,
        MenuAction::SaveConfiguration,
        MenuAction::Quit,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            MenuAction::LoadConfiguration => "&Load configuration",
            MenuAction::SaveConfiguration => "&Save configuration",
            MenuAction::Quit => "&Quit",
        }
    }
}

/// Input reported by the toolkit while the main window runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    Menu(MenuAction),
    /// The user closed the window.
    CloseRequested,
    Moved { x: i32, y: i32 },
    Resized { width: u32, height: u32 },
}

/// How a modal dialog ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogOutcome {
    Closed,
    /// Ended early because shutdown was requested.
    Interrupted,
}

/// The toolkit application object.
///
/// One instance exists between `init_app` and `stop`. All calls happen on the
/// thread that created it.
pub trait Toolkit {
    fn name(&self) -> &str;

    fn apply_style(&mut self, stylesheet: &str) -> Result<(), UiBridgeError>;

    fn show_window(&mut self, window: &MainWindow) -> Result<(), UiBridgeError>;

    /// Waits up to `timeout` for the next input event.
    fn next_event(&mut self, window: &MainWindow, timeout: Duration) -> Option<UiEvent>;

    fn close_window(&mut self, window: &MainWindow);

    /// Presents `dialog` modally and blocks until it is closed or `shutdown` is requested.
    fn run_dialog(
        &mut self,
        dialog: &DialogContainer,
        shutdown: &ShutdownSignal,
    ) -> Result<DialogOutcome, UiBridgeError>;

    fn prompt_open_path(&mut self, caption: &str) -> Option<PathBuf>;

    fn prompt_save_path(&mut self, caption: &str) -> Option<PathBuf>;

    /// Leaves the toolkit's event processing. Called once, right before the object is dropped.
    fn quit(&mut self);
}

/// Builds the toolkit application object on `init_app`.
pub type ToolkitFactory = Box<dyn Fn() -> Result<Box<dyn Toolkit>, UiBridgeError>>;

// Test module declaration
#[cfg(test)]
mod tests;
