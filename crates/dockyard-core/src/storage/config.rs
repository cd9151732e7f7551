//! XML config documents.
//!
//! A document is a flat sequence of `<plugin filename="...">` elements plus an
//! optional `<window>` element. The elements may also be wrapped in a single
//! root element of any other name. Plugin children are kept as an opaque
//! [`ConfigNode`] tree and handed to the plugin untouched.
use std::borrow::Cow;
use std::fs;
use std::io::Write;
use std::path::Path;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use log::{debug, warn};
use quick_xml::Reader;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::kernel::constants;
use crate::storage::error::StorageSystemError;

pub const PLUGIN_TAG: &str = "plugin";
pub const FILENAME_ATTR: &str = "filename";
pub const TITLE_TAG: &str = "title";
pub const WINDOW_TAG: &str = "window";

const STATE_TAG: &str = "state";
const POSITION_X_TAG: &str = "position_x";
const POSITION_Y_TAG: &str = "position_y";
const WIDTH_TAG: &str = "width";
const HEIGHT_TAG: &str = "height";

type StorageResult<T> = std::result::Result<T, StorageSystemError>;

/// An owned XML element: name, ordered attributes, text and child elements.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConfigNode {
    name: String,
    attributes: Vec<(String, String)>,
    text: Option<String>,
    children: Vec<ConfigNode>,
}

impl ConfigNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attribute(key, value);
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_child(mut self, child: ConfigNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    /// Sets an attribute, replacing an existing value with the same key in place.
    pub fn set_attribute(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((key, value)),
        }
    }

    /// Character data. Verbatim for elements without children; trimmed otherwise.
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn children(&self) -> &[ConfigNode] {
        &self.children
    }

    pub fn push_child(&mut self, child: ConfigNode) {
        self.children.push(child);
    }

    /// First child element with the given name.
    pub fn child(&self, name: &str) -> Option<&ConfigNode> {
        self.children.iter().find(|c| c.name == name)
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a ConfigNode> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Text of the first child element with the given name.
    pub fn child_text(&self, name: &str) -> Option<&str> {
        self.child(name).and_then(ConfigNode::text)
    }

    /// Parses a fragment that may contain several top-level elements.
    pub fn parse_fragment(input: &str) -> StorageResult<Vec<ConfigNode>> {
        parse_nodes(input)
    }

    /// Serializes this element (and its subtree) without an XML declaration.
    pub fn to_xml_string(&self) -> StorageResult<String> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
        write_node(&mut writer, self)?;
        into_string(writer.into_inner())
    }

    // Leaf text stays verbatim. Text around child elements is indentation
    // or mixed content and is trimmed.
    fn finish_text(&mut self) {
        if self.children.is_empty() {
            return;
        }
        self.text = self
            .text
            .take()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());
    }

    fn append_text(&mut self, fragment: &str) {
        match &mut self.text {
            Some(existing) => existing.push_str(fragment),
            None => self.text = Some(fragment.to_string()),
        }
    }
}

/// One `<plugin>` element of a config document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginDescriptor {
    /// Value of the `filename` attribute; `None` is a per-entry failure at load time.
    pub filename: Option<String>,
    /// The whole `<plugin>` element, passed opaquely to the plugin.
    pub node: ConfigNode,
}

impl PluginDescriptor {
    pub fn new(filename: impl Into<String>, node: ConfigNode) -> Self {
        Self {
            filename: Some(filename.into()),
            node,
        }
    }
}

/// Window geometry plus the toolkit-opaque dock layout blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowState {
    pub layout: Vec<u8>,
    pub position: (i32, i32),
    pub size: (u32, u32),
}

impl Default for WindowState {
    fn default() -> Self {
        Self {
            layout: Vec::new(),
            position: (0, 0),
            size: constants::DEFAULT_WINDOW_SIZE,
        }
    }
}

impl WindowState {
    /// Reads a `<window>` element. Missing fields keep their defaults.
    pub fn from_node(node: &ConfigNode) -> StorageResult<Self> {
        let mut state = WindowState::default();
        if let Some(encoded) = node.child_text(STATE_TAG) {
            state.layout = BASE64
                .decode(encoded.trim())
                .map_err(|e| invalid_value(STATE_TAG, encoded, e))?;
        }
        if let Some(x) = parse_child::<i32>(node, POSITION_X_TAG)? {
            state.position.0 = x;
        }
        if let Some(y) = parse_child::<i32>(node, POSITION_Y_TAG)? {
            state.position.1 = y;
        }
        if let Some(w) = parse_child::<u32>(node, WIDTH_TAG)? {
            state.size.0 = w;
        }
        if let Some(h) = parse_child::<u32>(node, HEIGHT_TAG)? {
            state.size.1 = h;
        }
        Ok(state)
    }

    pub fn to_node(&self) -> ConfigNode {
        ConfigNode::new(WINDOW_TAG)
            .with_child(ConfigNode::new(STATE_TAG).with_text(BASE64.encode(&self.layout)))
            .with_child(ConfigNode::new(POSITION_X_TAG).with_text(self.position.0.to_string()))
            .with_child(ConfigNode::new(POSITION_Y_TAG).with_text(self.position.1.to_string()))
            .with_child(ConfigNode::new(WIDTH_TAG).with_text(self.size.0.to_string()))
            .with_child(ConfigNode::new(HEIGHT_TAG).with_text(self.size.1.to_string()))
    }
}

/// In-memory form of a config file.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConfigDocument {
    pub plugins: Vec<PluginDescriptor>,
    pub window: Option<WindowState>,
}

impl ConfigDocument {
    /// Parses a document from text. Fails only on document-level problems.
    pub fn parse(input: &str) -> StorageResult<Self> {
        let mut roots = parse_nodes(input)?;
        if roots.is_empty() {
            return Err(StorageSystemError::malformed("document has no root element"));
        }

        let elements = if roots.len() == 1 && !is_document_entry(&roots[0]) {
            let wrapper = roots.remove(0);
            debug!("Reading config entries inside <{}>", wrapper.name);
            wrapper.children
        } else {
            if let Some(wrapper) = roots
                .iter()
                .find(|r| !is_document_entry(r) && r.children.iter().any(is_document_entry))
            {
                return Err(StorageSystemError::malformed(format!(
                    "<{}> wraps config entries but is not the only root element",
                    wrapper.name
                )));
            }
            roots
        };

        let mut document = ConfigDocument::default();
        for element in elements {
            match element.name.as_str() {
                PLUGIN_TAG => {
                    let filename = element.attribute(FILENAME_ATTR).map(str::to_string);
                    document.plugins.push(PluginDescriptor {
                        filename,
                        node: element,
                    });
                }
                WINDOW_TAG => {
                    if document.window.is_some() {
                        warn!("Config has more than one <window> element; the last one wins");
                    }
                    document.window = Some(WindowState::from_node(&element)?);
                }
                other => debug!("Ignoring unknown config element <{}>", other),
            }
        }
        Ok(document)
    }

    /// Reads and parses a document from disk.
    pub fn load(path: &Path) -> StorageResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| StorageSystemError::io(e, "read_config", path.to_path_buf()))?;
        Self::parse(&content).map_err(|e| e.with_path(path.to_path_buf()))
    }

    /// Serializes to the same schema [`parse`](Self::parse) reads.
    pub fn to_xml_string(&self) -> StorageResult<String> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .map_err(serialization_error)?;
        if let Some(window) = &self.window {
            write_node(&mut writer, &window.to_node())?;
        }
        for descriptor in &self.plugins {
            let mut node = descriptor.node.clone();
            node.name = PLUGIN_TAG.to_string();
            if let Some(filename) = &descriptor.filename {
                node.set_attribute(FILENAME_ATTR, filename.as_str());
            }
            write_node(&mut writer, &node)?;
        }
        let mut bytes = writer.into_inner();
        bytes.push(b'\n');
        into_string(bytes)
    }

    pub fn save(&self, path: &Path) -> StorageResult<()> {
        let xml = self.to_xml_string()?;
        let mut file = fs::File::create(path)
            .map_err(|e| StorageSystemError::io(e, "create_config", path.to_path_buf()))?;
        file.write_all(xml.as_bytes())
            .map_err(|e| StorageSystemError::io(e, "write_config", path.to_path_buf()))
    }

    /// Filenames of all plugin entries that have one, in document order.
    pub fn plugin_filenames(&self) -> Vec<&str> {
        self.plugins
            .iter()
            .filter_map(|p| p.filename.as_deref())
            .collect()
    }
}

fn is_document_entry(node: &ConfigNode) -> bool {
    node.name == PLUGIN_TAG || node.name == WINDOW_TAG
}

fn parse_child<T: std::str::FromStr>(node: &ConfigNode, name: &str) -> StorageResult<Option<T>>
where
    T::Err: std::fmt::Display,
{
    match node.child_text(name) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| invalid_value(name, raw, e)),
        None => Ok(None),
    }
}

fn invalid_value(element: &str, value: &str, reason: impl std::fmt::Display) -> StorageSystemError {
    StorageSystemError::InvalidValue {
        element: element.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn serialization_error<E>(source: E) -> StorageSystemError
where
    E: std::error::Error + Send + Sync + 'static,
{
    StorageSystemError::SerializationError {
        format: "xml".to_string(),
        source: Box::new(source),
    }
}

fn into_string(bytes: Vec<u8>) -> StorageResult<String> {
    String::from_utf8(bytes).map_err(serialization_error)
}

fn element_from(start: &BytesStart<'_>) -> StorageResult<ConfigNode> {
    let mut node = ConfigNode::new(String::from_utf8_lossy(start.name().as_ref()).into_owned());
    for attr in start.attributes() {
        let attr = attr.map_err(StorageSystemError::malformed)?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value().map_err(StorageSystemError::malformed)?;
        node.attributes.push((key, value.into_owned()));
    }
    Ok(node)
}

fn attach(stack: &mut [ConfigNode], roots: &mut Vec<ConfigNode>, node: ConfigNode) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None => roots.push(node),
    }
}

fn attach_text(stack: &mut [ConfigNode], text: Cow<'_, str>) -> StorageResult<()> {
    match stack.last_mut() {
        Some(current) => {
            current.append_text(&text);
            Ok(())
        }
        None if text.trim().is_empty() => Ok(()),
        None => Err(StorageSystemError::malformed(format!(
            "text outside of any element: '{}'",
            text.trim()
        ))),
    }
}

fn parse_nodes(input: &str) -> StorageResult<Vec<ConfigNode>> {
    let mut reader = Reader::from_str(input);

    let mut stack: Vec<ConfigNode> = Vec::new();
    let mut roots = Vec::new();
    loop {
        let event = reader.read_event().map_err(|e| {
            StorageSystemError::malformed(format!("at byte {}: {}", reader.buffer_position(), e))
        })?;
        match event {
            Event::Start(start) => stack.push(element_from(&start)?),
            Event::Empty(start) => {
                let node = element_from(&start)?;
                attach(&mut stack, &mut roots, node);
            }
            Event::End(end) => {
                let mut node = stack.pop().ok_or_else(|| {
                    StorageSystemError::malformed(format!(
                        "unexpected closing tag </{}>",
                        String::from_utf8_lossy(end.name().as_ref())
                    ))
                })?;
                node.finish_text();
                attach(&mut stack, &mut roots, node);
            }
            Event::Text(text) => {
                let text = text.unescape().map_err(StorageSystemError::malformed)?;
                attach_text(&mut stack, text)?;
            }
            Event::CData(data) => {
                let bytes = data.into_inner();
                attach_text(&mut stack, String::from_utf8_lossy(&bytes))?;
            }
            Event::Eof => break,
            // Declarations, comments, processing instructions, doctype
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(StorageSystemError::malformed(format!(
            "unclosed element <{}>",
            open.name
        )));
    }
    Ok(roots)
}

fn write_node<W: Write>(writer: &mut Writer<W>, node: &ConfigNode) -> StorageResult<()> {
    let mut start = BytesStart::new(node.name.as_str());
    for (key, value) in &node.attributes {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if node.children.is_empty() && node.text.is_none() {
        return writer
            .write_event(Event::Empty(start))
            .map_err(serialization_error);
    }

    writer
        .write_event(Event::Start(start))
        .map_err(serialization_error)?;
    if let Some(text) = &node.text {
        writer
            .write_event(Event::Text(BytesText::new(text)))
            .map_err(serialization_error)?;
    }
    for child in &node.children {
        write_node(writer, child)?;
    }
    writer
        .write_event(Event::End(BytesEnd::new(node.name.as_str())))
        .map_err(serialization_error)
}
