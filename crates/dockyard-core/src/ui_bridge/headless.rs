//! A toolkit backend with no display.
//!
//! In [`HeadlessMode::Scripted`] every interaction comes from a
//! [`HeadlessProbe`]: queued events, queued file-prompt answers. When the
//! event queue runs dry the user is taken to have closed the window, and
//! dialogs close as soon as they open. In [`HeadlessMode::Interactive`] the
//! window and dialogs stay up until shutdown is requested, which is what the
//! command-line binary uses.
//!
//! The probe also records what the shell asked the toolkit to do.
use std::cell::RefCell;
use std::collections::VecDeque;
use std::path::PathBuf;
use std::rc::Rc;
use std::thread;
use std::time::Duration;

use log::info;

use crate::kernel::constants;
use crate::kernel::signal::ShutdownSignal;
use crate::ui_bridge::error::UiBridgeError;
use crate::ui_bridge::{DialogContainer, DialogOutcome, MainWindow, Toolkit, ToolkitFactory, UiEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadlessMode {
    Scripted,
    Interactive,
}

#[derive(Debug, Default)]
struct HeadlessState {
    events: VecDeque<UiEvent>,
    open_paths: VecDeque<PathBuf>,
    save_paths: VecDeque<PathBuf>,
    instances_created: usize,
    quit_calls: usize,
    styles: Vec<String>,
    shown_windows: Vec<Vec<String>>,
    closed_windows: usize,
    dialogs: Vec<String>,
}

/// Shared script and record for headless toolkit instances.
#[derive(Debug, Clone, Default)]
pub struct HeadlessProbe(Rc<RefCell<HeadlessState>>);

impl HeadlessProbe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_event(&self, event: UiEvent) {
        self.0.borrow_mut().events.push_back(event);
    }

    pub fn push_open_path(&self, path: impl Into<PathBuf>) {
        self.0.borrow_mut().open_paths.push_back(path.into());
    }

    pub fn push_save_path(&self, path: impl Into<PathBuf>) {
        self.0.borrow_mut().save_paths.push_back(path.into());
    }

    pub fn instances_created(&self) -> usize {
        self.0.borrow().instances_created
    }

    pub fn quit_calls(&self) -> usize {
        self.0.borrow().quit_calls
    }

    pub fn styles(&self) -> Vec<String> {
        self.0.borrow().styles.clone()
    }

    /// Dock titles of the window, once per `show_window` call.
    pub fn shown_windows(&self) -> Vec<Vec<String>> {
        self.0.borrow().shown_windows.clone()
    }

    pub fn closed_windows(&self) -> usize {
        self.0.borrow().closed_windows
    }

    /// Titles of presented dialogs, in presentation order.
    pub fn dialogs(&self) -> Vec<String> {
        self.0.borrow().dialogs.clone()
    }

    pub fn pending_events(&self) -> usize {
        self.0.borrow().events.len()
    }
}

pub struct HeadlessToolkit {
    mode: HeadlessMode,
    probe: HeadlessProbe,
}

impl HeadlessToolkit {
    pub fn new(mode: HeadlessMode, probe: HeadlessProbe) -> Self {
        probe.0.borrow_mut().instances_created += 1;
        Self { mode, probe }
    }

    /// Factory producing a fresh toolkit that shares `probe` on each `init_app`.
    pub fn factory(mode: HeadlessMode, probe: HeadlessProbe) -> ToolkitFactory {
        Box::new(move || -> Result<Box<dyn Toolkit>, UiBridgeError> {
            Ok(Box::new(HeadlessToolkit::new(mode, probe.clone())))
        })
    }
}

impl Toolkit for HeadlessToolkit {
    fn name(&self) -> &str {
        "headless"
    }

    fn apply_style(&mut self, stylesheet: &str) -> Result<(), UiBridgeError> {
        self.probe.0.borrow_mut().styles.push(stylesheet.to_string());
        Ok(())
    }

    fn show_window(&mut self, window: &MainWindow) -> Result<(), UiBridgeError> {
        let titles = window.dock_titles().into_iter().map(str::to_string).collect::<Vec<_>>();
        info!("Showing '{}' with {} dock(s): {:?}", window.title(), titles.len(), titles);
        self.probe.0.borrow_mut().shown_windows.push(titles);
        Ok(())
    }

    fn next_event(&mut self, _window: &MainWindow, timeout: Duration) -> Option<UiEvent> {
        let next = self.probe.0.borrow_mut().events.pop_front();
        match (next, self.mode) {
            (Some(event), _) => Some(event),
            (None, HeadlessMode::Scripted) => Some(UiEvent::CloseRequested),
            (None, HeadlessMode::Interactive) => {
                thread::sleep(timeout);
                None
            }
        }
    }

    fn close_window(&mut self, _window: &MainWindow) {
        self.probe.0.borrow_mut().closed_windows += 1;
    }

    fn run_dialog(
        &mut self,
        dialog: &DialogContainer,
        shutdown: &ShutdownSignal,
    ) -> Result<DialogOutcome, UiBridgeError> {
        info!("Presenting dialog '{}'", dialog.title());
        self.probe.0.borrow_mut().dialogs.push(dialog.title().to_string());
        match self.mode {
            HeadlessMode::Scripted => Ok(DialogOutcome::Closed),
            HeadlessMode::Interactive => {
                while !shutdown.is_requested() {
                    thread::sleep(Duration::from_millis(constants::EVENT_POLL_INTERVAL_MS));
                }
                Ok(DialogOutcome::Interrupted)
            }
        }
    }

    fn prompt_open_path(&mut self, _caption: &str) -> Option<PathBuf> {
        self.probe.0.borrow_mut().open_paths.pop_front()
    }

    fn prompt_save_path(&mut self, _caption: &str) -> Option<PathBuf> {
        self.probe.0.borrow_mut().save_paths.pop_front()
    }

    fn quit(&mut self) {
        self.probe.0.borrow_mut().quit_calls += 1;
    }
}
