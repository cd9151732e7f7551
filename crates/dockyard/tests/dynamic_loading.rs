//! Loads the text-panel example through libloading, as a plugin library on disk.
use std::env::consts::{DLL_PREFIX, DLL_SUFFIX};
use std::path::{Path, PathBuf};

use dockyard_core::kernel::ApplicationController;
use dockyard_core::storage::{AppSettings, ConfigNode};
use dockyard_core::ui_bridge::{HeadlessMode, HeadlessProbe, HeadlessToolkit};
use tempfile::tempdir;

const PLUGIN_NAME: &str = "text_panel";

// The cdylib sits next to the binary, or in deps/ when only this package was built.
fn plugin_dir() -> PathBuf {
    let bin_dir = Path::new(env!("CARGO_BIN_EXE_dockyard"))
        .parent()
        .expect("binary has a parent directory")
        .to_path_buf();
    let library = format!("{}{}{}", DLL_PREFIX, PLUGIN_NAME, DLL_SUFFIX);
    [bin_dir.clone(), bin_dir.join("deps")]
        .into_iter()
        .find(|dir| dir.join(&library).is_file())
        .unwrap_or_else(|| panic!("{} not found near {}", library, bin_dir.display()))
}

fn library_app() -> ApplicationController {
    let settings = AppSettings {
        install_signal_handler: false,
        plugin_path_env: "DOCKYARD_DYNLOAD_TEST_UNSET_PATH".to_string(),
        ..AppSettings::default()
    };
    let mut app = ApplicationController::new(
        settings,
        HeadlessToolkit::factory(HeadlessMode::Scripted, HeadlessProbe::new()),
    );
    app.add_plugin_path(&plugin_dir());
    app
}

fn titled(title: &str) -> ConfigNode {
    ConfigNode::new("plugin")
        .with_attribute("filename", PLUGIN_NAME)
        .with_child(ConfigNode::new("title").with_text(title))
}

#[test]
fn test_library_plugin_is_docked_with_its_configured_title() {
    let mut app = library_app();
    app.init_app().unwrap();

    app.load_plugin(PLUGIN_NAME, Some(titled("X"))).unwrap();
    assert_eq!(app.create_main_window().unwrap(), 1);

    let window = app.context().main_window().unwrap();
    assert_eq!(window.dock_titles(), vec!["X"]);
    assert_eq!(window.dock_filenames(), vec![PLUGIN_NAME]);
    app.stop();
}

#[test]
fn test_library_plugin_without_config_uses_its_default_title() {
    let mut app = library_app();
    app.init_app().unwrap();

    app.load_plugin(PLUGIN_NAME, None).unwrap();
    app.create_main_window().unwrap();
    assert_eq!(app.context().main_window().unwrap().dock_titles(), vec!["Text panel"]);
    app.stop();
}

#[test]
fn test_library_plugins_survive_save_and_reload() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("layout.xml");

    let mut app = library_app();
    app.init_app().unwrap();
    app.load_plugin(PLUGIN_NAME, Some(titled("A & B \"q\""))).unwrap();
    app.load_plugin(PLUGIN_NAME, None).unwrap();
    app.create_main_window().unwrap();
    app.save_config(&config).unwrap();
    app.stop();

    app.init_app().unwrap();
    let report = app.load_config(&config).unwrap();
    assert!(report.is_complete(), "failures: {:?}", report.failures);
    assert_eq!(report.loaded, 2);
    app.create_main_window().unwrap();

    let window = app.context().main_window().unwrap();
    assert_eq!(window.dock_titles(), vec!["A & B \"q\"", "Text panel"]);
    assert_eq!(window.dock_filenames(), vec![PLUGIN_NAME, PLUGIN_NAME]);
    app.stop();
}
