use std::path::Path;
use std::time::Duration;

use log::{debug, error, info, warn};

use crate::kernel::constants;
use crate::kernel::context::{ApplicationContext, LifecycleState};
use crate::kernel::error::{Error, Result};
use crate::kernel::logging;
use crate::kernel::signal::{self, ShutdownSignal};
use crate::plugin_system::error::PluginSystemError;
use crate::plugin_system::{LoadedPlugin, PluginFactory, PluginListing};
use crate::storage::config::{ConfigDocument, ConfigNode};
use crate::storage::settings::{AppSettings, WindowSettings};
use crate::ui_bridge::{
    DialogContainer, DialogOutcome, MainWindow, MenuAction, Toolkit, ToolkitFactory, UiEvent,
};

/// Outcome of [`ApplicationController::load_config`].
///
/// Entries are loaded best-effort: a failing entry is recorded here and the
/// remaining entries are still attempted.
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Plugins appended to the registry
    pub loaded: usize,
    /// `(filename, error)` for every entry that could not be loaded
    pub failures: Vec<(String, Error)>,
}

impl LoadReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Top-level orchestration of the shell.
///
/// Owns the [`ApplicationContext`] and drives the lifecycle
/// `Uninitialized -> Initialized -> (RunningMainWindow | RunningDialogs)* -> Uninitialized`.
/// Everything except the setters, [`init_app`](Self::init_app) and
/// [`stop`](Self::stop) fails with [`Error::NotInitialized`] before
/// `init_app`.
pub struct ApplicationController {
    context: ApplicationContext,
    toolkit_factory: ToolkitFactory,
}

impl ApplicationController {
    pub fn new(settings: AppSettings, toolkit_factory: ToolkitFactory) -> Self {
        info!("Creating {} v{}", constants::APP_NAME, constants::APP_VERSION);
        Self {
            context: ApplicationContext::new(settings),
            toolkit_factory,
        }
    }

    pub fn context(&self) -> &ApplicationContext {
        &self.context
    }

    pub fn state(&self) -> LifecycleState {
        self.context.state
    }

    /// Handle on the flag the interrupt handler sets.
    pub fn shutdown_signal(&self) -> ShutdownSignal {
        self.context.shutdown.clone()
    }

    /// Makes a statically linked plugin resolvable by `name`.
    pub fn register_builtin(&mut self, name: impl Into<String>, factory: PluginFactory) {
        self.context.loader.register_builtin(name, factory);
    }

    // --- Lifecycle ---

    /// Creates the toolkit application object, applies the style and installs
    /// the interrupt handler.
    pub fn init_app(&mut self) -> Result<()> {
        if self.context.state.is_initialized() {
            error!("init_app called on an initialized application");
            return Err(Error::AlreadyInitialized);
        }

        let mut toolkit = (self.toolkit_factory)().inspect_err(|e| {
            error!("Failed to create the toolkit application object: {}", e);
        })?;
        info!("Initialized toolkit '{}'", toolkit.name());

        let style = match self.context.settings.stylesheet_contents() {
            Ok(style) => style,
            Err(e) => {
                warn!("{}; using the built-in style", e);
                constants::DEFAULT_STYLESHEET.to_string()
            }
        };
        toolkit.apply_style(&style)?;

        self.context.shutdown.reset();
        if self.context.settings.install_signal_handler {
            if let Err(e) = signal::install_interrupt_handler(&self.context.shutdown) {
                warn!("Could not install the interrupt handler: {}", e);
            }
        }

        self.context.toolkit = Some(toolkit);
        self.context.state = LifecycleState::Initialized;
        Ok(())
    }

    /// Tears everything down: main window (and its docks), pending plugins,
    /// then the application object. Does nothing when not initialized.
    pub fn stop(&mut self) {
        if !self.context.state.is_initialized() && self.context.toolkit.is_none() {
            debug!("stop: nothing to tear down");
            return;
        }

        if let Some(window) = self.context.main_window.take() {
            if let Some(toolkit) = self.context.toolkit.as_mut() {
                toolkit.close_window(&window);
            }
            info!("Destroying main window with {} dock(s)", window.dock_count());
        }

        let dropped = self.context.registry.clear();
        if dropped > 0 {
            debug!("Dropped {} unattached plugin(s)", dropped);
        }
        self.context.pending_window_state = None;

        if let Some(mut toolkit) = self.context.toolkit.take() {
            toolkit.quit();
        }
        if self.context.settings.install_signal_handler {
            signal::clear_interrupt_target();
        }
        self.context.state = LifecycleState::Uninitialized;
        info!("Application stopped");
    }

    // --- Loading ---

    /// Reads a config document and loads each of its plugin entries.
    ///
    /// Fails only when the document itself cannot be read or parsed; per-entry
    /// failures end up in the returned [`LoadReport`]. A `<window>` element is
    /// kept for the next [`create_main_window`](Self::create_main_window).
    pub fn load_config(&mut self, path: &Path) -> Result<LoadReport> {
        self.require_initialized("load_config")?;
        if path.as_os_str().is_empty() {
            error!("load_config: missing config file path");
            return Err(Error::invalid_argument("load_config", "empty config file path"));
        }

        info!("Loading config [{}]", path.display());
        let document = ConfigDocument::load(path).inspect_err(|e| {
            error!("Failed to load config [{}]: {}", path.display(), e);
        })?;

        let mut report = LoadReport::default();
        for (index, descriptor) in document.plugins.into_iter().enumerate() {
            let Some(filename) = descriptor.filename else {
                error!("Plugin entry #{} has no filename attribute", index);
                report.failures.push((
                    format!("#{}", index),
                    Error::invalid_argument("load_config", "plugin element without a filename attribute"),
                ));
                continue;
            };
            match self.load_plugin(&filename, Some(descriptor.node)) {
                Ok(()) => report.loaded += 1,
                Err(e) => report.failures.push((filename, e)),
            }
        }

        if let Some(window) = document.window {
            self.context.pending_window_state = Some(window);
        }
        info!(
            "Config [{}]: {} plugin(s) loaded, {} failed",
            path.display(),
            report.loaded,
            report.failures.len()
        );
        Ok(report)
    }

    /// Resolves, instantiates and configures one plugin, then appends it to the registry.
    pub fn load_plugin(&mut self, filename: &str, config: Option<ConfigNode>) -> Result<()> {
        self.require_initialized("load_plugin")?;
        if filename.is_empty() {
            error!("load_plugin: empty plugin filename");
            return Err(Error::invalid_argument("load_plugin", "empty plugin filename"));
        }

        debug!("Loading plugin [{}]", filename);
        let (location, mut plugin) = self.context.loader.load(filename).inspect_err(|e| {
            error!("Failed to load plugin [{}]: {}", filename, e);
        })?;

        if let Err(e) = plugin.load(config.as_ref()) {
            error!("Plugin [{}] rejected its configuration: {}", filename, e);
            return Err(PluginSystemError::ConfigurationRejected {
                plugin_id: filename.to_string(),
                source: e,
            }
            .into());
        }

        info!("Loaded plugin [{}] from {}", filename, location);
        self.context
            .registry
            .register(LoadedPlugin::new(filename, config, plugin));
        Ok(())
    }

    // --- Run modes ---

    /// `init_app`, `load_config`, `create_main_window`, `run_main_window`, `stop`.
    ///
    /// Only an empty path is reported. Failures of the inner steps are logged
    /// and the sequence carries on; `stop` always runs.
    pub fn run_config(&mut self, path: &Path) -> Result<()> {
        if path.as_os_str().is_empty() {
            error!("run_config: missing config file path");
            return Err(Error::invalid_argument("run_config", "empty config file path"));
        }

        log_step("init_app", self.init_app());
        log_step("load_config", self.load_config(path));
        log_step("create_main_window", self.create_main_window());
        log_step("run_main_window", self.run_main_window());
        self.stop();
        Ok(())
    }

    /// `init_app`, `load_plugin`, `run_dialogs`, `stop`, best-effort like [`run_config`](Self::run_config).
    pub fn run_standalone(&mut self, filename: &str) -> Result<()> {
        if filename.is_empty() {
            error!("run_standalone: missing plugin filename");
            return Err(Error::invalid_argument("run_standalone", "empty plugin filename"));
        }

        log_step("init_app", self.init_app());
        log_step("load_plugin", self.load_plugin(filename, None));
        log_step("run_dialogs", self.run_dialogs());
        self.stop();
        Ok(())
    }

    // --- Composition ---

    /// Moves every registry entry into a dock of the main window, creating the
    /// window if needed. Returns the number of docks attached.
    ///
    /// An existing window is reused; its previous docks are closed first.
    pub fn create_main_window(&mut self) -> Result<usize> {
        self.require_initialized("create_main_window")?;

        let mut window = match self.context.main_window.take() {
            Some(mut window) => {
                let closed = window.close_all_docks();
                debug!("Reusing main window, closed {} dock(s)", closed);
                window.reopen();
                window
            }
            None => MainWindow::new(self.context.settings.window_title.as_str()),
        };

        let plugins = self.context.registry.take_all();
        let attached = plugins.len();
        for plugin in plugins {
            window.attach(plugin);
        }

        if let Some(state) = self.context.pending_window_state.take() {
            if let Err(e) = window.apply_window_state(&state) {
                warn!("Could not restore window state: {}", e);
            }
        }

        info!("Main window has {} dock(s)", window.dock_count());
        self.context.main_window = Some(window);
        Ok(attached)
    }

    /// Shows the main window and pumps toolkit events until it closes or
    /// shutdown is requested.
    pub fn run_main_window(&mut self) -> Result<()> {
        self.require_initialized("run_main_window")?;
        let (Some(window), Some(toolkit)) =
            (self.context.main_window.as_ref(), self.context.toolkit.as_mut())
        else {
            error!("run_main_window: no main window");
            return Err(Error::NoMainWindow { operation: "run_main_window" });
        };
        toolkit.show_window(window)?;

        self.context.state = LifecycleState::RunningMainWindow;
        let result = self.event_loop();
        self.context.state = LifecycleState::Initialized;

        if let (Some(window), Some(toolkit)) =
            (self.context.main_window.as_ref(), self.context.toolkit.as_mut())
        {
            toolkit.close_window(window);
        }
        result
    }

    fn event_loop(&mut self) -> Result<()> {
        let poll_interval = Duration::from_millis(constants::EVENT_POLL_INTERVAL_MS);
        loop {
            if self.context.shutdown.is_requested() {
                if let Some(window) = self.context.main_window.as_mut() {
                    if !window.is_close_requested() {
                        info!("Shutdown requested, closing main window");
                        window.request_close();
                    }
                }
            }

            let Some(window) = self.context.main_window.as_ref() else {
                return Ok(());
            };
            if window.is_close_requested() {
                return Ok(());
            }
            let toolkit = self
                .context
                .toolkit
                .as_mut()
                .ok_or(Error::NotInitialized { operation: "run_main_window" })?;

            if let Some(event) = toolkit.next_event(window, poll_interval) {
                if let Err(e) = self.handle_event(event) {
                    error!("Failed to handle UI event: {}", e);
                }
            }
        }
    }

    fn handle_event(&mut self, event: UiEvent) -> Result<()> {
        debug!("UI event: {:?}", event);
        match event {
            UiEvent::Menu(MenuAction::LoadConfiguration) => self.on_load_config(),
            UiEvent::Menu(MenuAction::SaveConfiguration) => self.on_save_config(),
            UiEvent::Menu(MenuAction::Quit) | UiEvent::CloseRequested => {
                if let Some(window) = self.context.main_window.as_mut() {
                    window.request_close();
                }
                Ok(())
            }
            UiEvent::Moved { x, y } => {
                if let Some(window) = self.context.main_window.as_mut() {
                    window.set_position(x, y);
                }
                Ok(())
            }
            UiEvent::Resized { width, height } => {
                if let Some(window) = self.context.main_window.as_mut() {
                    window.set_size(width, height);
                }
                Ok(())
            }
        }
    }

    // Keeps the current docks when the chosen document cannot be read.
    fn on_load_config(&mut self) -> Result<()> {
        let Some(path) = self
            .toolkit_mut("load_config")?
            .prompt_open_path(MenuAction::LoadConfiguration.label())
        else {
            debug!("Load configuration cancelled");
            return Ok(());
        };

        self.load_config(&path)?;
        self.create_main_window()?;
        if let (Some(window), Some(toolkit)) =
            (self.context.main_window.as_ref(), self.context.toolkit.as_mut())
        {
            toolkit.show_window(window)?;
        }
        Ok(())
    }

    fn on_save_config(&mut self) -> Result<()> {
        let Some(path) = self
            .toolkit_mut("save_config")?
            .prompt_save_path(MenuAction::SaveConfiguration.label())
        else {
            debug!("Save configuration cancelled");
            return Ok(());
        };
        self.save_config(&path)
    }

    /// Presents each registry entry as a modal dialog, one after another.
    /// Returns the number of dialogs presented.
    ///
    /// A shutdown request ends the current dialog and drops the entries that
    /// were not presented yet.
    pub fn run_dialogs(&mut self) -> Result<usize> {
        self.require_initialized("run_dialogs")?;
        self.context.state = LifecycleState::RunningDialogs;

        let mut presented = 0;
        while let Some(plugin) = self.context.registry.take_next() {
            if self.context.shutdown.is_requested() {
                let dropped = self.context.registry.clear() + 1;
                info!("Shutdown requested, skipping {} dialog(s)", dropped);
                break;
            }

            let dialog = DialogContainer::new(plugin);
            let Some(toolkit) = self.context.toolkit.as_mut() else {
                break;
            };
            presented += 1;
            match toolkit.run_dialog(&dialog, &self.context.shutdown) {
                Ok(DialogOutcome::Closed) => debug!("Dialog '{}' closed", dialog.title()),
                Ok(DialogOutcome::Interrupted) => {
                    let dropped = self.context.registry.clear();
                    info!("Dialog '{}' interrupted, skipping {} more", dialog.title(), dropped);
                    break;
                }
                Err(e) => error!("Dialog '{}' failed: {}", dialog.title(), e),
            }
        }

        self.context.state = LifecycleState::Initialized;
        Ok(presented)
    }

    // --- Persistence ---

    /// Writes the live window as a config document, plus the
    /// `.settings.toml` file next to it.
    pub fn save_config(&self, path: &Path) -> Result<()> {
        self.require_initialized("save_config")?;
        if path.as_os_str().is_empty() {
            error!("save_config: missing destination path");
            return Err(Error::invalid_argument("save_config", "empty config file path"));
        }
        let window = self.context.main_window.as_ref().ok_or_else(|| {
            error!("save_config: no main window");
            Error::NoMainWindow { operation: "save_config" }
        })?;

        let document = window.to_config_document()?;
        document.save(path)?;

        let settings_path = WindowSettings::path_for(path);
        let state = document.window.unwrap_or_default();
        WindowSettings::from_window_state(&state).save(&settings_path)?;

        info!("Saved config [{}] and [{}]", path.display(), settings_path.display());
        Ok(())
    }

    // --- Setters ---

    /// Name of the environment variable read for extra plugin directories.
    pub fn set_plugin_path_env(&mut self, name: &str) {
        self.context.settings.plugin_path_env = name.to_string();
        self.context.loader.search_paths_mut().set_env_var(name);
    }

    pub fn add_plugin_path(&mut self, dir: &Path) {
        if !self.context.settings.plugin_paths.iter().any(|p| p == dir) {
            self.context.settings.plugin_paths.push(dir.to_path_buf());
        }
        self.context.loader.search_paths_mut().add_path(dir);
    }

    pub fn set_verbosity(&mut self, verbosity: u8) {
        self.context.settings.verbosity = verbosity.min(constants::MAX_VERBOSITY);
        logging::set_verbosity(verbosity);
    }

    /// Builtin plugins, then libraries found on the search paths. Nothing is loaded.
    pub fn list_plugins(&self) -> Vec<PluginListing> {
        self.context.loader.list_plugins()
    }

    // --- Helpers ---

    fn require_initialized(&self, operation: &'static str) -> Result<()> {
        if self.context.state.is_initialized() {
            Ok(())
        } else {
            error!("{} called before init_app", operation);
            Err(Error::NotInitialized { operation })
        }
    }

    fn toolkit_mut(&mut self, operation: &'static str) -> Result<&mut Box<dyn Toolkit>> {
        self.context
            .toolkit
            .as_mut()
            .ok_or(Error::NotInitialized { operation })
    }
}

impl Drop for ApplicationController {
    fn drop(&mut self) {
        self.stop();
    }
}

fn log_step<T>(step: &str, result: Result<T>) {
    if let Err(e) = result {
        warn!("{} failed: {}", step, e);
    }
}
