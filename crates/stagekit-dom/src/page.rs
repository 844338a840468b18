//! Page membership.

use crate::document::{Document, NodeId};

/// Decides whether a node is visible only on some pages.
pub trait PageScope {
    fn is_page_scoped(&self, document: &Document, node: NodeId) -> bool;
}

/// Page-scoped nodes carry a marker class.
#[derive(Debug, Clone)]
pub struct ClassPageScope {
    class: String,
}

impl ClassPageScope {
    pub fn new(class: impl Into<String>) -> Self {
        Self {
            class: class.into(),
        }
    }
}

impl PageScope for ClassPageScope {
    fn is_page_scoped(&self, document: &Document, node: NodeId) -> bool {
        document.has_class(node, &self.class)
    }
}
