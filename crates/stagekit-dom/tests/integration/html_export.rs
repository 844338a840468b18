//! Markup export and import integration tests
//!
//! These tests verify that:
//! - Exported markup never carries interaction artifacts
//! - The live tree is decorated again after export
//! - References are rewritten across a base URL

use stagekit_dom::url_rewrite::{to_absolute, to_relative};
use stagekit_dom::{Context, PropertyMap};
use url::Url;

use crate::support::{assert_clean_markup, TestStage};

fn base() -> Url {
    Url::parse("http://example.com/a/").unwrap()
}

#[test]
fn test_url_rewrite_scenario() {
    let absolute = r#"<img src="http://example.com/a/b.png">"#;
    let relative = to_relative(absolute, &base());
    assert_eq!(relative, r#"<img src="b.png">"#);
    assert_eq!(to_absolute(&relative, &base()), absolute);
}

#[test]
fn test_get_html_excludes_decoration() {
    let mut ts = TestStage::new();
    let root = ts.root();
    let outer = root.add_container(&mut ts.stage).unwrap();
    let text = outer.add_text(&mut ts.stage).unwrap();
    text.set_selected(&mut ts.stage, true);

    let html = root.get_html(&mut ts.stage, None).unwrap();

    assert_clean_markup(&html);
    assert!(!html.contains("ui-resizable-handle"), "{html}");
    assert!(html.contains("New text box"), "{html}");
    assert!(html.contains(r#"elementType="container""#), "{html}");
    assert!(html.contains("style-normal=\""), "{html}");
    // The live tree is decorated again.
    assert!(outer.has_class(&ts.stage, "ui-draggable"));
    assert!(text.has_class(&ts.stage, "ui-draggable"));
    assert_eq!(ts.activations(outer.id()), 2);
}

#[test]
fn test_get_html_exports_normal_appearance() {
    let mut ts = TestStage::new();
    let root = ts.root();
    let mut node = root.add_container(&mut ts.stage).unwrap();
    let hover: PropertyMap = [("color", "green")].into_iter().collect();
    node.set_style(&mut ts.stage, &hover, Context::Hover);
    node.set_context(&mut ts.stage, Context::Hover);

    let html = root.get_html(&mut ts.stage, None).unwrap();

    assert!(!html.contains("style=\"color"), "{html}");
    assert!(!html.contains("; color: green"), "{html}");
    assert!(html.contains("style-hover=\"color: green;"), "{html}");
}

#[test]
fn test_get_html_does_not_grow_the_tree() {
    let mut ts = TestStage::new();
    let root = ts.root();
    root.add_text(&mut ts.stage).unwrap();
    let before = ts.document().descendants(root.id()).len();

    let first = root.get_html(&mut ts.stage, None).unwrap();
    let second = root.get_html(&mut ts.stage, None).unwrap();

    assert_eq!(first, second);
    assert_eq!(ts.document().descendants(root.id()).len(), before);
}

#[test]
fn test_html_box_round_trip_with_base_url() {
    let mut ts = TestStage::new();
    let root = ts.root();
    let html_box = root.add_html(&mut ts.stage).unwrap();
    assert_eq!(
        html_box.get_html(&mut ts.stage, None).unwrap(),
        "<p>New HTML box</p>"
    );

    let markup = r#"<img src="pics/cat.png"><div style="background: url('bg.jpg')"></div>"#;
    html_box
        .set_html(&mut ts.stage, markup, Some(&base()))
        .unwrap();

    let content = ts.document().first_element_child(html_box.id()).unwrap();
    let stored = ts.document().inner_html(content);
    assert!(stored.contains(r#"src="http://example.com/a/pics/cat.png""#), "{stored}");
    assert!(stored.contains("url('http://example.com/a/bg.jpg')"), "{stored}");

    let exported = html_box.get_html(&mut ts.stage, Some(&base())).unwrap();
    assert_eq!(exported, markup);
    assert!(html_box.has_class(&ts.stage, "ui-draggable"));
}

#[test]
fn test_set_html_without_base_keeps_references() {
    let mut ts = TestStage::new();
    let root = ts.root();
    let text = root.add_text(&mut ts.stage).unwrap();

    text.set_html(&mut ts.stage, r#"<img src="b.png">"#, None)
        .unwrap();

    let html = text.get_html(&mut ts.stage, None).unwrap();
    assert_eq!(html, r#"<img src="b.png">"#);
}

#[test]
fn test_repeated_set_html_keeps_node_count() {
    let mut ts = TestStage::new();
    let root = ts.root();
    let text = root.add_text(&mut ts.stage).unwrap();
    text.set_html(&mut ts.stage, "<p>0</p>", None).unwrap();
    let before = ts.document().node_count();

    for i in 1..100 {
        text.set_html(&mut ts.stage, &format!("<p>{i}</p>"), None)
            .unwrap();
    }

    assert_eq!(ts.document().node_count(), before);
    assert_eq!(text.get_html(&mut ts.stage, None).unwrap(), "<p>99</p>");
}
