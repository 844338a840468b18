//! Component creation and editing integration tests
//!
//! These tests verify that:
//! - New components get their defaults and land under the right parent
//! - Structural preconditions fail without touching the tree
//! - Decoration is idempotent and honors locks

use stagekit_dom::{ComponentError, Context, ElementKind, ElementNode, StageConfig};

use crate::support::{assert_no_artifacts, assert_px_box, TestStage};

#[test]
fn test_add_container_defaults() {
    let mut ts = TestStage::new();
    let root = ts.root();
    let node = root.add_container(&mut ts.stage).unwrap();

    assert_eq!(node.kind(), ElementKind::Container);
    assert_eq!(ts.document().parent(node.id()), Some(root.id()));
    assert_px_box(&node.bounding_box(&ts.stage), 100.0, 100.0, 100.0, 100.0);
    let stored = ts.document().attribute(node.id(), "style-normal").unwrap();
    assert!(
        stored.contains("background-color: rgba(255,255,255,1)"),
        "{stored}"
    );
    assert_eq!(ts.document().attribute(node.id(), "elementType"), Some("container"));
    assert!(node.has_class(&ts.stage, "editable-style"));
}

#[test]
fn test_every_kind_is_created_decorated() {
    let mut ts = TestStage::new();
    let root = ts.root();
    let created = [
        root.add_container(&mut ts.stage).unwrap(),
        root.add_text(&mut ts.stage).unwrap(),
        root.add_html(&mut ts.stage).unwrap(),
    ];

    for node in created {
        assert_eq!(ts.activations(node.id()), 1, "{:?}", node.kind());
        assert!(node.has_class(&ts.stage, "ui-draggable"));
    }
    assert!(created[0].has_class(&ts.stage, "ui-droppable"));
    assert!(!created[1].has_class(&ts.stage, "ui-droppable"));
}

#[test]
fn test_add_to_non_container_is_rejected_without_mutation() {
    let mut ts = TestStage::new();
    let root = ts.root();
    let text = root.add_text(&mut ts.stage).unwrap();
    let before = ts.document().outer_html(ts.document().root());

    ts.stage.document_mut().start_journal();
    let result = text.add_text(&mut ts.stage);
    let journal = ts.stage.document_mut().stop_journal();

    assert!(matches!(
        result,
        Err(ComponentError::NotAContainer(ElementKind::TextBox))
    ));
    assert!(journal.is_empty(), "{journal:?}");
    assert_eq!(ts.document().outer_html(ts.document().root()), before);
    assert!(matches!(
        text.add_image(&mut ts.stage, "a.png"),
        Err(ComponentError::NotAContainer(_))
    ));
    assert!(ts.requests().is_empty());
}

#[test]
fn test_nested_containers() {
    let mut ts = TestStage::new();
    let root = ts.root();
    let outer = root.add_container(&mut ts.stage).unwrap();
    let inner = outer.add_text(&mut ts.stage).unwrap();

    assert_eq!(ts.document().parent(inner.id()), Some(outer.id()));
    let found = ElementNode::new(&mut ts.stage, inner.id(), Some(Context::Hover)).unwrap();
    assert_eq!(found.id(), inner.id());
    assert_eq!(found.context(), Context::Hover);
}

#[test]
fn test_remove_requires_descendant() {
    let mut ts = TestStage::new();
    let root = ts.root();
    let a = root.add_container(&mut ts.stage).unwrap();
    let b = root.add_container(&mut ts.stage).unwrap();

    assert!(matches!(
        a.remove(&mut ts.stage, &b),
        Err(ComponentError::NotADescendant(id)) if id == b.id()
    ));
    assert!(matches!(
        a.remove(&mut ts.stage, &a),
        Err(ComponentError::NotADescendant(_))
    ));
    assert!(ts.document().is_attached(b.id()));

    root.remove(&mut ts.stage, &b).unwrap();
    assert!(!ts.document().is_attached(b.id()));
    assert_eq!(ts.document().children(root.id()), vec![a.id()]);
}

#[test]
fn test_set_editable_is_idempotent() {
    let mut ts = TestStage::new();
    let root = ts.root();
    let outer = root.add_container(&mut ts.stage).unwrap();
    let inner = outer.add_text(&mut ts.stage).unwrap();
    let root_id = root.id();

    root.set_editable(&mut ts.stage, true, None);
    let decorated = ts.document().outer_html(root_id);
    root.set_editable(&mut ts.stage, true, None);
    assert_eq!(ts.document().outer_html(root_id), decorated);
    assert_eq!(ts.activations(outer.id()), 1);
    assert_eq!(ts.activations(inner.id()), 1);

    root.set_editable(&mut ts.stage, false, None);
    let clean = ts.document().outer_html(root_id);
    root.set_editable(&mut ts.stage, false, None);
    assert_eq!(ts.document().outer_html(root_id), clean);
    assert_eq!(ts.deactivations(outer.id()), 1);
    assert_no_artifacts(ts.document(), root_id);
}

#[test]
fn test_cleanup_removes_foreign_artifacts() {
    let mut ts = TestStage::new();
    let root = ts.root();
    let outer = root.add_container(&mut ts.stage).unwrap();
    let inner = outer.add_text(&mut ts.stage).unwrap();
    inner.set_selected(&mut ts.stage, true);
    outer.set_selected(&mut ts.stage, true);

    let document = ts.stage.document_mut();
    let stray = document.create_element("div");
    document.add_class(stray, "ui-resizable-handle");
    document.append(inner.id(), stray).unwrap();
    document.set_attribute(inner.id(), "aria-disabled", "true");

    outer.set_editable(&mut ts.stage, false, None);

    assert_no_artifacts(ts.document(), outer.id());
    assert!(!ts.document().is_attached(stray));
    assert!(!inner.is_selected(&ts.stage));
    assert!(outer.is_selected(&ts.stage));
}

#[test]
fn test_container_type_is_case_insensitive() {
    let mut ts = TestStage::new();
    let root = ts.root();
    let document = ts.stage.document_mut();
    let div = document.create_element("div");
    document.add_class(div, "editable-style");
    document.set_attribute(div, "elementType", "Container");
    document.append(root.id(), div).unwrap();

    ts.stage.set_editable(div, true);

    let node = ElementNode::new(&mut ts.stage, div, None).unwrap();
    assert_eq!(node.kind(), ElementKind::Container);
    assert!(node.has_class(&ts.stage, "ui-draggable"));
    assert!(node.has_class(&ts.stage, "ui-droppable"));
}

#[test]
fn test_locked_node_is_never_decorated() {
    let mut ts = TestStage::new();
    let root = ts.root();
    let node = root.add_container(&mut ts.stage).unwrap();

    node.set_locked(&mut ts.stage, true);
    assert!(node.is_locked(&ts.stage));
    assert!(node.has_class(&ts.stage, "locked-style"));
    assert_no_artifacts(ts.document(), node.id());

    root.set_editable(&mut ts.stage, true, None);
    node.set_editable(&mut ts.stage, true, None);
    assert_eq!(ts.activations(node.id()), 1);
    assert!(!node.has_class(&ts.stage, "ui-draggable"));

    node.set_locked(&mut ts.stage, false);
    assert!(!node.is_locked(&ts.stage));
    assert!(!node.has_class(&ts.stage, "locked-style"));
    assert_eq!(ts.activations(node.id()), 2);
}

#[test]
fn test_custom_config_classes() {
    let config = StageConfig::from_json(
        r#"{ "editable_class": "unit", "default_fill": "rgba(0,0,0,1)", "default_left": 5 }"#,
    )
    .unwrap();
    let mut ts = TestStage::with_config(config);
    let root = ts.root();
    let node = root.add_container(&mut ts.stage).unwrap();

    assert_eq!(node.classes(&ts.stage)[0], "unit");
    assert_px_box(&node.bounding_box(&ts.stage), 5.0, 100.0, 100.0, 100.0);
    assert_eq!(
        node.get_style(&ts.stage, Context::Normal).get("backgroundColor"),
        Some("rgba(0,0,0,1)")
    );
}
