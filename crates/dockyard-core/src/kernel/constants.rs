/// Application name
pub const APP_NAME: &str = "Dockyard";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Plugin ABI version exported by the host. Plugins must be semver-compatible.
pub const API_VERSION: &str = "0.1.0";

/// Environment variable consulted for extra plugin directories
pub const DEFAULT_PLUGIN_PATH_ENV: &str = "IGN_GUI_PLUGIN_PATH";

/// Per-user configuration directory, relative to the home directory
pub const HOME_CONFIG_DIR: &str = ".ignition";

/// Default plugin directory, relative to [`HOME_CONFIG_DIR`]
pub const HOME_PLUGINS_DIR: &str = "gui/plugins";

/// Title used for the main window when settings do not override it
pub const DEFAULT_WINDOW_TITLE: &str = "Dockyard";

/// Default main window size (width, height)
pub const DEFAULT_WINDOW_SIZE: (u32, u32) = (1024, 768);

/// Default verbosity (warnings and errors)
pub const DEFAULT_VERBOSITY: u8 = 2;

/// Highest supported verbosity level
pub const MAX_VERBOSITY: u8 = 4;

/// How long the main loop waits for a toolkit event before re-checking the shutdown flag
pub const EVENT_POLL_INTERVAL_MS: u64 = 50;

/// Style applied by `init_app` when no stylesheet file is configured
pub const DEFAULT_STYLESHEET: &str = "\
window { background: #2b2b2b; color: #e0e0e0; }
dock { border: 1px solid #3c3f41; }
dock > title { font-weight: bold; padding: 4px; }
menu { background: #3c3f41; }
";
