//! Custom assertions for integration tests.

use stagekit_css::{is_geometry_key, GeometryBox};
use stagekit_dom::interaction::{
    DISABLED_ATTR, DRAGGABLE_CLASS, DROPPABLE_CLASS, RESIZABLE_CLASS, RESIZE_HANDLE_CLASS,
};
use stagekit_dom::{Document, NodeId, PropertyMap};

/// Assert that a property map carries none of the geometry keys.
#[track_caller]
pub fn assert_no_geometry(style: &PropertyMap) {
    let found: Vec<&str> = style.keys().filter(|k| is_geometry_key(k)).collect();
    assert!(found.is_empty(), "Unexpected geometry keys {found:?} in {style:?}");
}

/// Assert a box placed at `(left, top)` with the given pixel size.
#[track_caller]
pub fn assert_px_box(actual: &GeometryBox, left: f32, top: f32, width: f32, height: f32) {
    let expected = GeometryBox::from_px(left, top, width, height);
    assert_eq!(actual, &expected, "Bounding box mismatch");
}

/// Assert that no interaction artifact is left in `scope` or below.
#[track_caller]
pub fn assert_no_artifacts(document: &Document, scope: NodeId) {
    let mut nodes = vec![scope];
    nodes.extend(document.descendants(scope));
    for id in nodes {
        for class in [RESIZABLE_CLASS, DRAGGABLE_CLASS, DROPPABLE_CLASS, RESIZE_HANDLE_CLASS] {
            assert!(
                !document.has_class(id, class),
                "Node {id:?} still has class {class}: {}",
                document.outer_html(scope)
            );
        }
        assert_eq!(
            document.attribute(id, DISABLED_ATTR),
            None,
            "Node {id:?} still has {DISABLED_ATTR}"
        );
    }
}

/// Assert that exported markup carries no interaction artifact.
#[track_caller]
pub fn assert_clean_markup(html: &str) {
    for marker in ["ui-resizable", "ui-draggable", "ui-droppable", DISABLED_ATTR] {
        assert!(!html.contains(marker), "Markup leaks {marker}: {html}");
    }
}
