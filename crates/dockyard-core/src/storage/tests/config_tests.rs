use crate::storage::config::{ConfigDocument, ConfigNode, PluginDescriptor, WindowState};
use crate::storage::error::StorageSystemError;

use tempfile::tempdir;

#[test]
fn test_parse_top_level_plugins() {
    let doc = ConfigDocument::parse(
        r#"<?xml version="1.0"?>
<plugin filename="libfoo.so"><title>Foo</title></plugin>
<plugin filename="libbar.so"/>"#,
    )
    .unwrap();
    assert_eq!(doc.plugin_filenames(), vec!["libfoo.so", "libbar.so"]);
    assert_eq!(doc.plugins[0].node.child_text("title"), Some("Foo"));
    assert!(doc.window.is_none());
}

#[test]
fn test_parse_wrapped_plugins() {
    let doc = ConfigDocument::parse(
        r#"<config>
  <!-- dock layout -->
  <plugin filename="libfoo.so"/>
  <unknown/>
  <plugin filename="libbar.so"/>
</config>"#,
    )
    .unwrap();
    assert_eq!(doc.plugin_filenames(), vec!["libfoo.so", "libbar.so"]);
}

#[test]
fn test_missing_filename_is_kept_as_entry() {
    let doc = ConfigDocument::parse(r#"<plugin><title>Orphan</title></plugin>"#).unwrap();
    assert_eq!(doc.plugins.len(), 1);
    assert!(doc.plugins[0].filename.is_none());
    assert!(doc.plugin_filenames().is_empty());
}

#[test]
fn test_plugin_node_is_opaque() {
    let doc = ConfigDocument::parse(
        r#"<plugin filename="libplot.so" mode="dark">
  <topic name="/pose">
    <field>x</field>
    <field>y</field>
  </topic>
</plugin>"#,
    )
    .unwrap();
    let node = &doc.plugins[0].node;
    assert_eq!(node.attribute("mode"), Some("dark"));
    let topic = node.child("topic").unwrap();
    assert_eq!(topic.attribute("name"), Some("/pose"));
    let fields: Vec<&str> = topic.children_named("field").filter_map(ConfigNode::text).collect();
    assert_eq!(fields, vec!["x", "y"]);
}

#[test]
fn test_window_element_fields() {
    let doc = ConfigDocument::parse(
        r#"<window>
  <state>AQID</state>
  <position_x>-5</position_x>
  <position_y>12</position_y>
  <width>640</width>
  <height>480</height>
</window>"#,
    )
    .unwrap();
    let window = doc.window.unwrap();
    assert_eq!(window.layout, vec![1, 2, 3]);
    assert_eq!(window.position, (-5, 12));
    assert_eq!(window.size, (640, 480));
}

#[test]
fn test_window_missing_fields_default() {
    let doc = ConfigDocument::parse(r#"<window><width>300</width></window>"#).unwrap();
    let window = doc.window.unwrap();
    let defaults = WindowState::default();
    assert_eq!(window.size, (300, defaults.size.1));
    assert_eq!(window.position, defaults.position);
    assert!(window.layout.is_empty());
}

#[test]
fn test_non_numeric_window_value_is_an_error() {
    let err = ConfigDocument::parse(r#"<window><width>wide</width></window>"#).unwrap_err();
    assert!(matches!(err, StorageSystemError::InvalidValue { ref element, .. } if element == "width"));
}

#[test]
fn test_malformed_documents_are_rejected() {
    let cases = [
        "",
        "   ",
        "<plugin filename=\"a\">",
        "<plugin filename=\"a\"></window>",
        "<plugin filename=\"a\" filename=\"b\"/>",
        "<plugin filename=\"a&bogus;\"/>",
        "stray text <plugin/>",
    ];
    for input in cases {
        assert!(ConfigDocument::parse(input).is_err(), "expected failure for {:?}", input);
    }
}

#[test]
fn test_load_reports_path_on_parse_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.xml");
    std::fs::write(&path, "<plugin>").unwrap();
    match ConfigDocument::load(&path) {
        Err(StorageSystemError::MalformedXml { path: Some(p), .. }) => assert_eq!(p, path),
        other => panic!("expected MalformedXml with path, got {:?}", other),
    }
}

#[test]
fn test_load_missing_file_is_io_error() {
    let dir = tempdir().unwrap();
    let err = ConfigDocument::load(&dir.path().join("absent.xml")).unwrap_err();
    assert!(matches!(err, StorageSystemError::Io { .. }));
}

#[test]
fn test_serialized_document_parses_back() {
    let document = ConfigDocument {
        plugins: vec![
            PluginDescriptor::new(
                "libfoo.so",
                ConfigNode::new("plugin").with_child(ConfigNode::new("title").with_text("Foo & Co")),
            ),
            PluginDescriptor::new("libbar.so", ConfigNode::new("plugin")),
        ],
        window: Some(WindowState {
            layout: b"version = 1".to_vec(),
            position: (3, 4),
            size: (800, 600),
        }),
    };

    let xml = document.to_xml_string().unwrap();
    assert!(xml.starts_with("<?xml"));
    assert!(xml.find("<window>").unwrap() < xml.find("<plugin").unwrap());

    let parsed = ConfigDocument::parse(&xml).unwrap();
    assert_eq!(parsed.plugin_filenames(), vec!["libfoo.so", "libbar.so"]);
    assert_eq!(parsed.plugins[0].node.child_text("title"), Some("Foo & Co"));
    assert_eq!(parsed.window, document.window);
}

#[test]
fn test_node_fragment_round_trip() {
    let node = ConfigNode::new("plugin")
        .with_attribute("filename", "libx.so")
        .with_child(ConfigNode::new("title").with_text("X"));
    let xml = node.to_xml_string().unwrap();
    let parsed = ConfigNode::parse_fragment(&xml).unwrap();
    assert_eq!(parsed, vec![node]);
}

#[test]
fn test_leaf_text_keeps_surrounding_whitespace() {
    let doc = ConfigDocument::parse(
        r#"<plugin filename="libnotes.so">
  <text>  indented  </text>
  <title>Notes</title>
</plugin>"#,
    )
    .unwrap();
    let node = &doc.plugins[0].node;
    assert_eq!(node.child_text("text"), Some("  indented  "));
    assert_eq!(node.text(), None);

    let saved = doc.to_xml_string().unwrap();
    let reparsed = ConfigDocument::parse(&saved).unwrap();
    assert_eq!(reparsed.plugins[0].node.child_text("text"), Some("  indented  "));
    assert_eq!(reparsed.plugins[0].node.child_text("title"), Some("Notes"));
}

#[test]
fn test_wrapper_next_to_another_root_is_rejected() {
    let err = ConfigDocument::parse(r#"<config><plugin filename="a"/></config><x/>"#).unwrap_err();
    assert!(matches!(err, StorageSystemError::MalformedXml { .. }));

    // Unknown roots without entries are still ignored.
    let doc = ConfigDocument::parse(r#"<plugin filename="a"/><notes><item/></notes>"#).unwrap();
    assert_eq!(doc.plugin_filenames(), vec!["a"]);
}
