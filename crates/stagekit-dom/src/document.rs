//! Arena-backed document tree.
//!
//! Nodes live in an [`indextree::Arena`] and are addressed by [`NodeId`].
//! Parent/child links are arena indices, so containment is always answered by
//! walking the tree rather than by stored back-references.
//!
//! Every structural, attribute, class and inline-style change goes through a
//! `Document` method so that it can be recorded in the optional [`Mutation`]
//! journal.

use indextree::{Arena, Node};
use smallvec::SmallVec;
use stagekit_css::PropertyMap;
use string_cache::DefaultAtom as Atom;
use tracing::trace;

use crate::error::ComponentError;

pub use indextree::NodeId;

/// Whether the interactive-editing behavior is attached to an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InteractionState {
    /// No decoration attached.
    #[default]
    Clean,
    /// The interaction plugin has been activated on the element.
    Decorated,
}

/// Data carried by an element node.
#[derive(Debug, Clone)]
pub struct ElementData {
    tag: Atom,
    attrs: SmallVec<[(Atom, String); 4]>,
    classes: SmallVec<[String; 4]>,
    /// Live inline presentation.
    presentation: PropertyMap,
    locked: bool,
    interaction: InteractionState,
}

impl ElementData {
    fn new(tag: &str) -> Self {
        Self {
            tag: Atom::from(tag.to_ascii_lowercase()),
            attrs: SmallVec::new(),
            classes: SmallVec::new(),
            presentation: PropertyMap::new(),
            locked: false,
            interaction: InteractionState::Clean,
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| &**k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Attributes in insertion order.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attrs.iter().map(|(k, v)| (&**k, v.as_str()))
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn presentation(&self) -> &PropertyMap {
        &self.presentation
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn interaction(&self) -> InteractionState {
        self.interaction
    }
}

/// Content of a document node.
#[derive(Debug, Clone)]
pub enum NodeKind {
    Element(ElementData),
    Text(String),
    /// Embedded markup kept verbatim.
    Raw(String),
}

/// One recorded change to the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    Insert { parent: NodeId, node: NodeId },
    Detach { node: NodeId },
    SetAttr { node: NodeId, name: String, value: String },
    RemoveAttr { node: NodeId, name: String },
    AddClass { node: NodeId, class: String },
    RemoveClass { node: NodeId, class: String },
    /// A live style property was assigned (`Some`) or cleared (`None`).
    SetStyle {
        node: NodeId,
        property: String,
        value: Option<String>,
    },
    /// The whole live presentation was replaced.
    ResetStyle { node: NodeId },
    SetContent { node: NodeId },
}

/// The document tree.
pub struct Document {
    arena: Arena<NodeKind>,
    root: NodeId,
    journal: Option<Vec<Mutation>>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create a document whose root is an empty `body` element.
    pub fn new() -> Self {
        let mut arena = Arena::new();
        let root = arena.new_node(NodeKind::Element(ElementData::new("body")));
        Self {
            arena,
            root,
            journal: None,
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    // =======================================================================
    // Journal
    // =======================================================================

    /// Start recording mutations. Any previous recording is discarded.
    pub fn start_journal(&mut self) {
        self.journal = Some(Vec::new());
    }

    /// Take the mutations recorded so far, leaving recording on.
    pub fn take_journal(&mut self) -> Vec<Mutation> {
        self.journal.as_mut().map(std::mem::take).unwrap_or_default()
    }

    pub fn stop_journal(&mut self) -> Vec<Mutation> {
        self.journal.take().unwrap_or_default()
    }

    fn record(&mut self, mutation: Mutation) {
        trace!(?mutation, "DOM mutation");
        if let Some(journal) = self.journal.as_mut() {
            journal.push(mutation);
        }
    }

    // =======================================================================
    // Node creation
    // =======================================================================

    /// Create a detached element.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.arena.new_node(NodeKind::Element(ElementData::new(tag)))
    }

    /// Create a detached text node.
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.arena.new_node(NodeKind::Text(text.to_string()))
    }

    /// Create a detached raw-markup node.
    pub fn create_raw(&mut self, markup: &str) -> NodeId {
        self.arena.new_node(NodeKind::Raw(markup.to_string()))
    }

    /// Copy a subtree. The copy is detached and has a clean interaction state.
    pub fn deep_clone(&mut self, id: NodeId) -> Result<NodeId, ComponentError> {
        let data = self.kind(id).ok_or(ComponentError::UnknownNode(id))?.clone();
        let data = match data {
            NodeKind::Element(mut element) => {
                element.interaction = InteractionState::Clean;
                NodeKind::Element(element)
            }
            other => other,
        };
        let copy = self.arena.new_node(data);
        for child in self.children(id) {
            let child_copy = self.deep_clone(child)?;
            copy.checked_append(child_copy, &mut self.arena)
                .map_err(|e| ComponentError::InvalidTree(format!("{e:?}")))?;
        }
        Ok(copy)
    }

    // =======================================================================
    // Tree structure
    // =======================================================================

    fn node(&self, id: NodeId) -> Option<&Node<NodeKind>> {
        // Removed slots are reused; the stamp check rejects stale ids.
        self.arena
            .get(id)
            .filter(|node| !node.is_removed() && !id.is_removed(&self.arena))
    }

    /// Whether `id` names a live (not discarded) node of this document.
    pub fn exists(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    /// Number of live nodes in the arena, attached or not.
    pub fn node_count(&self) -> usize {
        self.arena.iter().filter(|node| !node.is_removed()).count()
    }

    pub fn kind(&self, id: NodeId) -> Option<&NodeKind> {
        self.node(id).map(Node::get)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(Node::parent)
    }

    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        if !self.exists(id) {
            return Vec::new();
        }
        id.children(&self.arena).collect()
    }

    /// All descendants in document order, excluding `id` itself.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        if !self.exists(id) {
            return Vec::new();
        }
        id.descendants(&self.arena).skip(1).collect()
    }

    /// Ancestors from the parent upward, excluding `id` itself.
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        if !self.exists(id) {
            return Vec::new();
        }
        id.ancestors(&self.arena).skip(1).collect()
    }

    /// True when `node` is a strict descendant of `ancestor`.
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        ancestor != node && self.ancestors(node).contains(&ancestor)
    }

    /// True when the node is reachable from the document root.
    pub fn is_attached(&self, id: NodeId) -> bool {
        self.exists(id) && (id == self.root || self.ancestors(id).last() == Some(&self.root))
    }

    pub fn first_element_child(&self, id: NodeId) -> Option<NodeId> {
        self.children(id)
            .into_iter()
            .find(|child| self.element(*child).is_some())
    }

    /// First descendant element matching `pred`, in document order.
    pub fn find_descendant(
        &self,
        id: NodeId,
        mut pred: impl FnMut(&ElementData) -> bool,
    ) -> Option<NodeId> {
        self.descendants(id)
            .into_iter()
            .find(|d| self.element(*d).is_some_and(&mut pred))
    }

    /// Append `child` as the last child of `parent`.
    pub fn append(&mut self, parent: NodeId, child: NodeId) -> Result<(), ComponentError> {
        if !self.exists(parent) {
            return Err(ComponentError::UnknownNode(parent));
        }
        if !self.exists(child) {
            return Err(ComponentError::UnknownNode(child));
        }
        parent
            .checked_append(child, &mut self.arena)
            .map_err(|e| ComponentError::InvalidTree(format!("{e:?}")))?;
        self.record(Mutation::Insert {
            parent,
            node: child,
        });
        Ok(())
    }

    /// Detach a subtree from its parent. The nodes stay addressable.
    pub fn detach(&mut self, id: NodeId) {
        if !self.exists(id) || id == self.root {
            return;
        }
        id.detach(&mut self.arena);
        self.record(Mutation::Detach { node: id });
    }

    /// Drop a subtree from the arena. Ids into it must not be used afterwards.
    pub fn discard(&mut self, id: NodeId) {
        if !self.exists(id) || id == self.root {
            return;
        }
        id.remove_subtree(&mut self.arena);
        self.record(Mutation::Detach { node: id });
    }

    /// Replace all children of `id` with a single raw-markup node.
    ///
    /// The previous children are dropped from the arena.
    pub fn set_raw_content(&mut self, id: NodeId, markup: &str) -> Result<(), ComponentError> {
        if self.element(id).is_none() {
            return Err(ComponentError::UnknownNode(id));
        }
        for child in self.children(id) {
            child.remove_subtree(&mut self.arena);
        }
        if !markup.is_empty() {
            let raw = self.create_raw(markup);
            id.checked_append(raw, &mut self.arena)
                .map_err(|e| ComponentError::InvalidTree(format!("{e:?}")))?;
        }
        self.record(Mutation::SetContent { node: id });
        Ok(())
    }

    // =======================================================================
    // Elements
    // =======================================================================

    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        match self.kind(id) {
            Some(NodeKind::Element(element)) => Some(element),
            _ => None,
        }
    }

    fn element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        if !self.exists(id) {
            return None;
        }
        match self.arena.get_mut(id).map(|n| n.get_mut()) {
            Some(NodeKind::Element(element)) => Some(element),
            _ => None,
        }
    }

    pub fn tag(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(ElementData::tag)
    }

    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id).and_then(|e| e.attribute(name))
    }

    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) {
        let Some(element) = self.element_mut(id) else {
            return;
        };
        match element.attrs.iter_mut().find(|(k, _)| &**k == name) {
            Some((_, slot)) => *slot = value.to_string(),
            None => element.attrs.push((Atom::from(name), value.to_string())),
        }
        self.record(Mutation::SetAttr {
            node: id,
            name: name.to_string(),
            value: value.to_string(),
        });
    }

    /// Remove an attribute. Returns whether it was present.
    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> bool {
        let Some(element) = self.element_mut(id) else {
            return false;
        };
        let Some(index) = element.attrs.iter().position(|(k, _)| &**k == name) else {
            return false;
        };
        element.attrs.remove(index);
        self.record(Mutation::RemoveAttr {
            node: id,
            name: name.to_string(),
        });
        true
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.element(id).is_some_and(|e| e.has_class(class))
    }

    pub fn classes(&self, id: NodeId) -> Vec<String> {
        self.element(id)
            .map(|e| e.classes.to_vec())
            .unwrap_or_default()
    }

    pub fn add_class(&mut self, id: NodeId, class: &str) {
        let class = class.trim();
        let Some(element) = self.element_mut(id) else {
            return;
        };
        if class.is_empty() || element.has_class(class) {
            return;
        }
        element.classes.push(class.to_string());
        self.record(Mutation::AddClass {
            node: id,
            class: class.to_string(),
        });
    }

    pub fn remove_class(&mut self, id: NodeId, class: &str) {
        let Some(element) = self.element_mut(id) else {
            return;
        };
        let before = element.classes.len();
        element.classes.retain(|c| c != class);
        if element.classes.len() != before {
            self.record(Mutation::RemoveClass {
                node: id,
                class: class.to_string(),
            });
        }
    }

    pub(crate) fn set_locked(&mut self, id: NodeId, locked: bool) {
        if let Some(element) = self.element_mut(id) {
            element.locked = locked;
        }
    }

    pub(crate) fn set_interaction(&mut self, id: NodeId, state: InteractionState) {
        if let Some(element) = self.element_mut(id) {
            element.interaction = state;
        }
    }

    // =======================================================================
    // Live presentation
    // =======================================================================

    pub fn presentation(&self, id: NodeId) -> Option<&PropertyMap> {
        self.element(id).map(ElementData::presentation)
    }

    pub fn style_property(&self, id: NodeId, property: &str) -> Option<&str> {
        self.presentation(id).and_then(|p| p.get(property))
    }

    /// Assign (`Some`) or clear (`None`) one live style property.
    pub fn set_style_property(&mut self, id: NodeId, property: &str, value: Option<&str>) {
        let Some(element) = self.element_mut(id) else {
            return;
        };
        match value {
            Some(value) => {
                element.presentation.insert(property, value);
            }
            None => {
                if element.presentation.remove(property).is_none() {
                    return;
                }
            }
        }
        self.record(Mutation::SetStyle {
            node: id,
            property: property.to_string(),
            value: value.map(str::to_string),
        });
    }

    /// Replace the whole live presentation.
    pub fn reset_presentation(&mut self, id: NodeId, presentation: PropertyMap) {
        let Some(element) = self.element_mut(id) else {
            return;
        };
        element.presentation = presentation;
        self.record(Mutation::ResetStyle { node: id });
    }
}
