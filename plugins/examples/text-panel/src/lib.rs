//! A dock panel that shows a title and a block of text.
//!
//! ```xml
//! <plugin filename="libtext_panel.so">
//!   <title>Notes</title>
//!   <text>Remember to save the layout.</text>
//!   <wrap>false</wrap>
//! </plugin>
//! ```
use dockyard_core::plugin_system::traits::{Plugin, PluginError};
use dockyard_core::storage::ConfigNode;

/// Name the binary registers this plugin under when linking it statically.
pub const BUILTIN_NAME: &str = "text-panel";

const DEFAULT_TITLE: &str = "Text panel";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextPanel {
    title: String,
    text: String,
    wrap: bool,
}

impl Default for TextPanel {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            text: String::new(),
            wrap: true,
        }
    }
}

impl TextPanel {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn wraps(&self) -> bool {
        self.wrap
    }
}

impl Plugin for TextPanel {
    fn title(&self) -> String {
        self.title.clone()
    }

    fn load(&mut self, config: Option<&ConfigNode>) -> Result<(), PluginError> {
        let Some(config) = config else {
            log::debug!("TextPanel loaded without configuration");
            return Ok(());
        };

        if let Some(title) = config.child_text("title") {
            self.title = title.trim().to_string();
        }
        if let Some(text) = config.child_text("text") {
            self.text = text.to_string();
        }
        if let Some(wrap) = config.child_text("wrap") {
            self.wrap = wrap
                .trim()
                .parse()
                .map_err(|_| PluginError::ConfigError(format!("<wrap> must be true or false, got '{}'", wrap)))?;
        }
        Ok(())
    }
}

/// Factory for static registration as a builtin.
pub fn create() -> Box<dyn Plugin> {
    Box::new(TextPanel::default())
}

dockyard_core::export_plugin!(TextPanel);
