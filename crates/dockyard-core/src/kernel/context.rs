use std::fmt;

use crate::kernel::signal::ShutdownSignal;
use crate::plugin_system::{PluginLoader, PluginRegistry, SearchPaths};
use crate::storage::config::WindowState;
use crate::storage::settings::AppSettings;
use crate::ui_bridge::{MainWindow, Toolkit};

/// Where the application is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Uninitialized,
    Initialized,
    RunningMainWindow,
    RunningDialogs,
}

impl LifecycleState {
    /// True whenever the application object exists.
    pub fn is_initialized(&self) -> bool {
        !matches!(self, LifecycleState::Uninitialized)
    }
}

/// Everything the controller owns between `init_app` and `stop`.
pub struct ApplicationContext {
    pub(crate) state: LifecycleState,
    pub(crate) toolkit: Option<Box<dyn Toolkit>>,
    pub(crate) main_window: Option<MainWindow>,
    pub(crate) registry: PluginRegistry,
    pub(crate) loader: PluginLoader,
    pub(crate) shutdown: ShutdownSignal,
    pub(crate) settings: AppSettings,
    /// `<window>` state read by `load_config`, applied by the next window build.
    pub(crate) pending_window_state: Option<WindowState>,
}

impl ApplicationContext {
    pub fn new(settings: AppSettings) -> Self {
        let mut search_paths = SearchPaths::new();
        search_paths.set_env_var(settings.plugin_path_env.as_str());
        for dir in &settings.plugin_paths {
            search_paths.add_path(dir);
        }
        Self {
            state: LifecycleState::Uninitialized,
            toolkit: None,
            main_window: None,
            registry: PluginRegistry::new(),
            loader: PluginLoader::new(search_paths),
            shutdown: ShutdownSignal::new(),
            settings,
            pending_window_state: None,
        }
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn registry(&self) -> &PluginRegistry {
        &self.registry
    }

    pub fn loader(&self) -> &PluginLoader {
        &self.loader
    }

    pub fn main_window(&self) -> Option<&MainWindow> {
        self.main_window.as_ref()
    }

    pub fn settings(&self) -> &AppSettings {
        &self.settings
    }

    pub fn shutdown_signal(&self) -> &ShutdownSignal {
        &self.shutdown
    }

    pub fn pending_window_state(&self) -> Option<&WindowState> {
        self.pending_window_state.as_ref()
    }
}

impl fmt::Debug for ApplicationContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApplicationContext")
            .field("state", &self.state)
            .field("toolkit", &self.toolkit.as_ref().map(|t| t.name().to_string()))
            .field("main_window", &self.main_window)
            .field("registry", &self.registry)
            .field("settings", &self.settings)
            .finish()
    }
}
