use std::path::PathBuf;

use clap::Parser;
use dockyard_core::kernel::constants;
use dockyard_core::storage::AppSettings;

/// Dockyard: a plugin-hosting window shell
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Load a configuration file and show its plugins in the main window
    #[arg(short = 'c', long = "config", value_name = "FILE", conflicts_with = "standalone")]
    pub config: Option<PathBuf>,

    /// Run a single plugin as a standalone dialog
    #[arg(short = 's', long = "standalone", value_name = "PLUGIN")]
    pub standalone: Option<String>,

    /// Verbosity: 0 silent, 1 errors, 2 warnings, 3 info, 4 debug
    #[arg(short = 'v', long = "verbose", value_name = "LEVEL",
          value_parser = clap::value_parser!(u8).range(0..=constants::MAX_VERBOSITY as i64))]
    pub verbose: Option<u8>,

    /// Extra plugin directory, searched before the environment variable (repeatable)
    #[arg(short = 'p', long = "plugin-path", value_name = "DIR")]
    pub plugin_paths: Vec<PathBuf>,

    /// Environment variable holding additional plugin directories
    #[arg(long = "plugin-path-env", value_name = "NAME")]
    pub plugin_path_env: Option<String>,

    /// Settings file (TOML)
    #[arg(long = "settings", value_name = "FILE")]
    pub settings: Option<PathBuf>,

    /// List available plugins and exit
    #[arg(long = "list")]
    pub list: bool,
}

impl CliArgs {
    /// Applies command-line overrides on top of file or default settings.
    pub fn apply_to(&self, settings: &mut AppSettings) {
        if let Some(level) = self.verbose {
            settings.verbosity = level;
        }
        if let Some(name) = &self.plugin_path_env {
            settings.plugin_path_env = name.clone();
        }
        for dir in &self.plugin_paths {
            if !settings.plugin_paths.contains(dir) {
                settings.plugin_paths.push(dir.clone());
            }
        }
    }
}
