use crate::plugin_system::registry::{LoadedPlugin, PluginRegistry};
use crate::plugin_system::traits::{Plugin, PluginError};
use crate::storage::config::ConfigNode;

use std::cell::Cell;
use std::rc::Rc;

// --- Mock Plugin for Registry Tests ---
struct MockRegistryPlugin {
    title: String,
    drops: Rc<Cell<usize>>,
}

impl MockRegistryPlugin {
    fn boxed(title: &str, drops: &Rc<Cell<usize>>) -> Box<dyn Plugin> {
        Box::new(Self {
            title: title.to_string(),
            drops: drops.clone(),
        })
    }
}

impl Plugin for MockRegistryPlugin {
    fn title(&self) -> String {
        self.title.clone()
    }

    fn load(&mut self, _config: Option<&ConfigNode>) -> Result<(), PluginError> {
        Ok(())
    }
}

impl Drop for MockRegistryPlugin {
    fn drop(&mut self) {
        self.drops.set(self.drops.get() + 1);
    }
}

fn registry_with(titles: &[&str], drops: &Rc<Cell<usize>>) -> PluginRegistry {
    let mut registry = PluginRegistry::new();
    for title in titles {
        registry.register(LoadedPlugin::new(
            format!("lib{}.so", title.to_lowercase()),
            None,
            MockRegistryPlugin::boxed(title, drops),
        ));
    }
    registry
}

#[test]
fn test_register_keeps_insertion_order() {
    let drops = Rc::new(Cell::new(0));
    let registry = registry_with(&["Alpha", "Beta", "Gamma"], &drops);
    assert_eq!(registry.len(), 3);
    assert_eq!(registry.filenames(), vec!["libalpha.so", "libbeta.so", "libgamma.so"]);
    assert_eq!(registry.titles(), vec!["Alpha", "Beta", "Gamma"]);
}

#[test]
fn test_take_all_moves_without_destroying() {
    let drops = Rc::new(Cell::new(0));
    let mut registry = registry_with(&["Alpha", "Beta"], &drops);

    let taken = registry.take_all();
    assert!(registry.is_empty());
    assert_eq!(taken.len(), 2);
    assert_eq!(drops.get(), 0);

    drop(taken);
    assert_eq!(drops.get(), 2);
}

#[test]
fn test_take_next_is_fifo() {
    let drops = Rc::new(Cell::new(0));
    let mut registry = registry_with(&["Alpha", "Beta"], &drops);

    assert_eq!(registry.take_next().map(|p| p.title()), Some("Alpha".to_string()));
    assert_eq!(registry.take_next().map(|p| p.title()), Some("Beta".to_string()));
    assert!(registry.take_next().is_none());
}

#[test]
fn test_clear_destroys_pending_entries() {
    let drops = Rc::new(Cell::new(0));
    let mut registry = registry_with(&["Alpha", "Beta", "Gamma"], &drops);
    assert_eq!(registry.clear(), 3);
    assert_eq!(drops.get(), 3);
    assert_eq!(registry.clear(), 0);
}

#[test]
fn test_loaded_plugin_keeps_its_config() {
    let drops = Rc::new(Cell::new(0));
    let node = ConfigNode::new("plugin").with_attribute("filename", "libalpha.so");
    let loaded = LoadedPlugin::new("libalpha.so", Some(node.clone()), MockRegistryPlugin::boxed("Alpha", &drops));
    assert_eq!(loaded.filename(), "libalpha.so");
    assert_eq!(loaded.config(), Some(&node));
    assert_eq!(loaded.title(), "Alpha");
}
