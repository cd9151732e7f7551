mod cli;

use std::process::ExitCode;

use clap::Parser;
use dockyard_core::kernel::{ApplicationController, logging};
use dockyard_core::plugin_system::PluginLocation;
use dockyard_core::storage::AppSettings;
use dockyard_core::ui_bridge::{HeadlessMode, HeadlessProbe, HeadlessToolkit};
use log::{error, info};

use crate::cli::CliArgs;

fn main() -> ExitCode {
    let args = CliArgs::parse();

    let mut settings = match &args.settings {
        Some(path) => match AppSettings::load(path) {
            Ok(settings) => settings,
            Err(e) => {
                eprintln!("Failed to read settings: {}", e);
                return ExitCode::FAILURE;
            }
        },
        None => AppSettings::default(),
    };
    args.apply_to(&mut settings);
    logging::init(settings.verbosity);

    let toolkit = HeadlessToolkit::factory(HeadlessMode::Interactive, HeadlessProbe::new());
    let mut app = ApplicationController::new(settings, toolkit);
    app.register_builtin(text_panel::BUILTIN_NAME, text_panel::create);

    if args.list {
        let listings = app.list_plugins();
        if listings.is_empty() {
            println!("No plugins found.");
        }
        for listing in listings {
            match listing.location {
                PluginLocation::Builtin(_) => println!("{} (builtin)", listing.name),
                PluginLocation::Library(path) => println!("{} ({})", listing.name, path.display()),
            }
        }
        return ExitCode::SUCCESS;
    }

    let result = if let Some(config) = &args.config {
        app.run_config(config)
    } else if let Some(plugin) = &args.standalone {
        app.run_standalone(plugin)
    } else {
        info!("No config or plugin given, starting an empty window");
        run_empty_window(&mut app)
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run_empty_window(app: &mut ApplicationController) -> dockyard_core::kernel::Result<()> {
    app.init_app()?;
    let result = app
        .create_main_window()
        .and_then(|_| app.run_main_window());
    app.stop();
    result
}
