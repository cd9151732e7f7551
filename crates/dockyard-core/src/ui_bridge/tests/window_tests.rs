use crate::plugin_system::registry::LoadedPlugin;
use crate::plugin_system::traits::{Plugin, PluginError};
use crate::storage::config::{ConfigNode, WindowState};
use crate::ui_bridge::error::UiBridgeError;
use crate::ui_bridge::{DockArea, MainWindow, MenuAction};

struct NamedPlugin(&'static str);

impl Plugin for NamedPlugin {
    fn title(&self) -> String {
        self.0.to_string()
    }

    fn load(&mut self, _config: Option<&ConfigNode>) -> Result<(), PluginError> {
        Ok(())
    }
}

fn loaded(filename: &str, title: &'static str, config: Option<ConfigNode>) -> LoadedPlugin {
    LoadedPlugin::new(filename, config, Box::new(NamedPlugin(title)))
}

fn window_with(titles: &[&'static str]) -> MainWindow {
    let mut window = MainWindow::new("Test");
    for &title in titles {
        window.attach(loaded(&format!("lib{}.so", title.to_lowercase()), title, None));
    }
    window
}

#[test]
fn test_menu_has_three_actions_in_order() {
    let window = MainWindow::new("Test");
    assert_eq!(
        window.menu_actions(),
        &[MenuAction::LoadConfiguration, MenuAction::SaveConfiguration, MenuAction::Quit]
    );
}

#[test]
fn test_attach_returns_distinct_handles() {
    let mut window = MainWindow::new("Test");
    let a = window.attach(loaded("liba.so", "A", None));
    let b = window.attach(loaded("libb.so", "B", None));
    assert_ne!(a, b);
    assert_eq!(window.dock(a).map(|d| d.title()), Some("A"));
    assert_eq!(window.dock(b).map(|d| d.plugin().filename()), Some("libb.so"));
    assert_eq!(window.dock_titles(), vec!["A", "B"]);
}

#[test]
fn test_close_dock_and_unknown_handle() {
    let mut window = MainWindow::new("Test");
    let a = window.attach(loaded("liba.so", "A", None));
    window.attach(loaded("libb.so", "B", None));

    window.close_dock(a).unwrap();
    assert_eq!(window.dock_titles(), vec!["B"]);
    assert!(matches!(window.close_dock(a), Err(UiBridgeError::UnknownDock(_))));
}

#[test]
fn test_close_all_docks_keeps_window() {
    let mut window = window_with(&["A", "B", "C"]);
    window.set_size(500, 400);
    assert_eq!(window.close_all_docks(), 3);
    assert_eq!(window.dock_count(), 0);
    assert_eq!(window.size(), (500, 400));
    assert_eq!(window.close_all_docks(), 0);
}

#[test]
fn test_layout_round_trip() {
    let mut window = window_with(&["A", "B"]);
    let b = window.docks()[1].handle();
    {
        let dock = window.dock_mut(b).unwrap();
        dock.set_area(DockArea::Right);
        dock.set_floating(true);
        dock.set_visible(false);
    }
    let blob = window.save_layout().unwrap();

    let mut fresh = window_with(&["A", "B"]);
    fresh.restore_layout(&blob).unwrap();
    let restored = &fresh.docks()[1];
    assert_eq!(restored.area(), DockArea::Right);
    assert!(restored.is_floating());
    assert!(!restored.is_visible());
    assert_eq!(fresh.docks()[0].area(), DockArea::Left);
}

#[test]
fn test_layout_matches_by_title_when_order_changed() {
    let mut window = window_with(&["A", "B"]);
    let a = window.docks()[0].handle();
    window.dock_mut(a).unwrap().set_area(DockArea::Bottom);
    let blob = window.save_layout().unwrap();

    let mut reordered = window_with(&["B", "C", "A"]);
    reordered.restore_layout(&blob).unwrap();
    assert_eq!(reordered.docks()[2].area(), DockArea::Bottom);
    assert_eq!(reordered.docks()[0].area(), DockArea::Left);
}

#[test]
fn test_restore_rejects_garbage() {
    let mut window = window_with(&["A"]);
    assert!(matches!(
        window.restore_layout(b"\xff\xfe"),
        Err(UiBridgeError::InvalidLayoutState(_))
    ));
    assert!(matches!(
        window.restore_layout(b"version = 99"),
        Err(UiBridgeError::InvalidLayoutState(_))
    ));
}

#[test]
fn test_apply_window_state_with_empty_layout() {
    let mut window = window_with(&["A"]);
    let state = WindowState {
        layout: Vec::new(),
        position: (11, 22),
        size: (333, 444),
    };
    window.apply_window_state(&state).unwrap();
    assert_eq!(window.position(), (11, 22));
    assert_eq!(window.size(), (333, 444));
}

#[test]
fn test_config_document_keeps_children_and_adds_title() {
    let mut window = MainWindow::new("Test");
    let with_title = ConfigNode::new("plugin")
        .with_attribute("filename", "liba.so")
        .with_child(ConfigNode::new("title").with_text("Custom"))
        .with_child(ConfigNode::new("rate").with_text("10"));
    window.attach(loaded("liba.so", "Custom", Some(with_title)));
    window.attach(loaded("libb.so", "B", None));
    window.set_position(1, 2);

    let document = window.to_config_document().unwrap();
    assert_eq!(document.plugin_filenames(), vec!["liba.so", "libb.so"]);

    let first = &document.plugins[0].node;
    assert_eq!(first.children_named("title").count(), 1);
    assert_eq!(first.child_text("rate"), Some("10"));
    assert_eq!(document.plugins[1].node.child_text("title"), Some("B"));
    assert_eq!(document.window.as_ref().map(|w| w.position), Some((1, 2)));
}

#[test]
fn test_close_request_and_reopen() {
    let mut window = MainWindow::new("Test");
    assert!(!window.is_close_requested());
    window.request_close();
    assert!(window.is_close_requested());
    window.reopen();
    assert!(!window.is_close_requested());
}
