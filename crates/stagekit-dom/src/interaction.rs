//! Interactive-editing decoration.
//!
//! Drag, drop and resize behavior is provided by an [`InteractionPlugin`].
//! The stage only decides *when* a node is decorated; the plugin decides what
//! the decoration looks like. Whatever a plugin leaves behind, the transient
//! artifacts listed here are scrubbed when a subtree is cleaned.

use tracing::trace;

use crate::document::{Document, NodeId};

pub const RESIZABLE_CLASS: &str = "ui-resizable";
pub const DRAGGABLE_CLASS: &str = "ui-draggable";
pub const DROPPABLE_CLASS: &str = "ui-droppable";
pub const RESIZE_HANDLE_CLASS: &str = "ui-resizable-handle";
pub const DISABLED_ATTR: &str = "aria-disabled";

/// Options passed when decorating a node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActivateOptions {
    /// Containers additionally accept dropped children.
    pub is_container: bool,
}

/// Attaches and detaches interactive-editing behavior.
///
/// The stage calls `activate` only on clean, unlocked editable units and
/// `deactivate` only on decorated ones.
pub trait InteractionPlugin {
    fn activate(&mut self, document: &mut Document, node: NodeId, options: ActivateOptions);

    fn deactivate(&mut self, document: &mut Document, node: NodeId);
}

/// Default plugin: marker classes plus resize handle elements.
#[derive(Debug, Default)]
pub struct HandlePlugin;

impl HandlePlugin {
    const HANDLES: [&'static str; 3] = ["e", "s", "se"];
}

impl InteractionPlugin for HandlePlugin {
    fn activate(&mut self, document: &mut Document, node: NodeId, options: ActivateOptions) {
        document.add_class(node, DRAGGABLE_CLASS);
        document.add_class(node, RESIZABLE_CLASS);
        if options.is_container {
            document.add_class(node, DROPPABLE_CLASS);
        }
        for direction in Self::HANDLES {
            let handle = document.create_element("div");
            document.add_class(handle, RESIZE_HANDLE_CLASS);
            document.add_class(handle, &format!("{RESIZE_HANDLE_CLASS}-{direction}"));
            if let Err(error) = document.append(node, handle) {
                trace!(%error, "Could not attach resize handle");
            }
        }
    }

    fn deactivate(&mut self, document: &mut Document, node: NodeId) {
        for child in document.children(node) {
            if document.has_class(child, RESIZE_HANDLE_CLASS) {
                document.discard(child);
            }
        }
        document.remove_class(node, DRAGGABLE_CLASS);
        document.remove_class(node, RESIZABLE_CLASS);
        document.remove_class(node, DROPPABLE_CLASS);
    }
}

/// Remove every transient interaction artifact in `scope`.
///
/// Marker classes, disabled markers and handle elements are removed from the
/// whole subtree; the selection marker only from descendants, so the scope's
/// own selection survives.
pub(crate) fn clear_artifacts(document: &mut Document, scope: NodeId, selected_class: &str) {
    for id in document.descendants(scope) {
        if document.has_class(id, RESIZE_HANDLE_CLASS) {
            document.discard(id);
        }
    }
    let descendants = document.descendants(scope);
    for id in std::iter::once(scope).chain(descendants.iter().copied()) {
        for class in [RESIZABLE_CLASS, DRAGGABLE_CLASS, DROPPABLE_CLASS] {
            document.remove_class(id, class);
        }
        document.remove_attribute(id, DISABLED_ATTR);
    }
    for id in descendants {
        document.remove_class(id, selected_class);
    }
}
