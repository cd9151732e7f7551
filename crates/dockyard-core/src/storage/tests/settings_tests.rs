use crate::kernel::constants;
use crate::storage::config::WindowState;
use crate::storage::error::StorageSystemError;
use crate::storage::settings::{AppSettings, WindowSettings};

use std::path::{Path, PathBuf};
use tempfile::tempdir;

#[test]
fn test_app_settings_defaults() {
    let settings = AppSettings::default();
    assert_eq!(settings.plugin_path_env, constants::DEFAULT_PLUGIN_PATH_ENV);
    assert_eq!(settings.verbosity, constants::DEFAULT_VERBOSITY);
    assert!(settings.plugin_paths.is_empty());
    assert!(settings.install_signal_handler);
}

#[test]
fn test_app_settings_partial_toml() {
    let settings = AppSettings::from_toml_str(
        r#"
verbosity = 4
plugin_paths = ["/opt/plugins", "/usr/lib/dockyard"]
"#,
    )
    .unwrap();
    assert_eq!(settings.verbosity, 4);
    assert_eq!(
        settings.plugin_paths,
        vec![PathBuf::from("/opt/plugins"), PathBuf::from("/usr/lib/dockyard")]
    );
    assert_eq!(settings.window_title, constants::DEFAULT_WINDOW_TITLE);
}

#[test]
fn test_app_settings_bad_toml() {
    let err = AppSettings::from_toml_str("verbosity = \"loud\"").unwrap_err();
    assert!(matches!(err, StorageSystemError::DeserializationError { .. }));
}

#[test]
fn test_stylesheet_contents() {
    let dir = tempdir().unwrap();
    assert_eq!(AppSettings::default().stylesheet_contents().unwrap(), constants::DEFAULT_STYLESHEET);

    let path = dir.path().join("dark.qss");
    std::fs::write(&path, "window { background: black; }").unwrap();
    let settings = AppSettings {
        stylesheet: Some(path),
        ..AppSettings::default()
    };
    assert_eq!(settings.stylesheet_contents().unwrap(), "window { background: black; }");
}

#[test]
fn test_window_settings_path() {
    assert_eq!(
        WindowSettings::path_for(Path::new("/tmp/layouts/foo.xml")),
        PathBuf::from("/tmp/layouts/foo.settings.toml")
    );
}

#[test]
fn test_window_settings_file_round_trip() {
    let dir = tempdir().unwrap();
    let state = WindowState {
        layout: vec![0, 159, 146, 150],
        position: (-20, 35),
        size: (1280, 720),
    };
    let path = dir.path().join("foo.settings.toml");
    WindowSettings::from_window_state(&state).save(&path).unwrap();

    let restored = WindowSettings::load(&path).unwrap().to_window_state().unwrap();
    assert_eq!(restored, state);
}

#[test]
fn test_window_settings_bad_state() {
    let settings = WindowSettings::from_window_state(&WindowState::default());
    let broken = WindowSettings {
        state: "***".to_string(),
        ..settings
    };
    assert!(matches!(
        broken.to_window_state(),
        Err(StorageSystemError::InvalidValue { .. })
    ));
}
