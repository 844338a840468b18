//! Addressable components.
//!
//! An [`ElementNode`] is a lightweight handle onto one editable unit of a
//! [`Stage`]: the node id, its [`ElementKind`] (fixed at construction) and the
//! active [`Context`]. All state lives in the stage's document, so every
//! operation takes the stage it reads or mutates.

use stagekit_css::{GeometryBox, PropertyMap};
use tracing::{debug, error, warn};
use url::Url;

use crate::context::Context;
use crate::document::NodeId;
use crate::error::ComponentError;
use crate::factory::ComponentFactory;
use crate::stage::Stage;
use crate::url_rewrite;

pub const ATTR_ELEMENT_TYPE: &str = "elementType";
pub const ATTR_ELEMENT_SUBTYPE: &str = "elementSubtype";
pub const ATTR_LINK_TARGET: &str = "linkTarget";

pub const TYPE_CONTAINER: &str = "container";
pub const TYPE_ELEMENT: &str = "element";
pub const SUBTYPE_TEXT: &str = "text";
pub const SUBTYPE_HTML: &str = "html";
pub const SUBTYPE_IMAGE: &str = "image";

/// Semantic kind of a component, derived from its type attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Container,
    TextBox,
    HtmlBox,
    ImageBox,
}

impl ElementKind {
    /// Resolve the kind from `elementType` and `elementSubtype` values.
    pub fn resolve(
        element_type: Option<&str>,
        subtype: Option<&str>,
    ) -> Result<Self, ComponentError> {
        let is = |value: Option<&str>, expected: &str| {
            value.is_some_and(|v| v.trim().eq_ignore_ascii_case(expected))
        };

        if is(element_type, TYPE_CONTAINER) {
            return Ok(ElementKind::Container);
        }
        if is(element_type, TYPE_ELEMENT) {
            if is(subtype, SUBTYPE_TEXT) {
                return Ok(ElementKind::TextBox);
            }
            if is(subtype, SUBTYPE_HTML) {
                return Ok(ElementKind::HtmlBox);
            }
            if is(subtype, SUBTYPE_IMAGE) {
                return Ok(ElementKind::ImageBox);
            }
        }
        Err(ComponentError::TypeResolution {
            element_type: element_type.map(str::to_string),
            subtype: subtype.map(str::to_string),
        })
    }

    /// Value of the `elementType` attribute.
    pub fn element_type(&self) -> &'static str {
        match self {
            ElementKind::Container => TYPE_CONTAINER,
            _ => TYPE_ELEMENT,
        }
    }

    /// Value of the `elementSubtype` attribute, if any.
    pub fn subtype(&self) -> Option<&'static str> {
        match self {
            ElementKind::Container => None,
            ElementKind::TextBox => Some(SUBTYPE_TEXT),
            ElementKind::HtmlBox => Some(SUBTYPE_HTML),
            ElementKind::ImageBox => Some(SUBTYPE_IMAGE),
        }
    }

    pub fn is_container(&self) -> bool {
        matches!(self, ElementKind::Container)
    }
}

/// Handle onto one component of a stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementNode {
    id: NodeId,
    kind: ElementKind,
    context: Context,
}

impl ElementNode {
    /// Address the component owning `candidate`.
    ///
    /// Walks from `candidate` up to the nearest editable unit; when there is
    /// none (the stage root) the candidate itself is used. The initial
    /// context's appearance is applied immediately.
    pub fn new(
        stage: &mut Stage,
        candidate: NodeId,
        context: Option<Context>,
    ) -> Result<Self, ComponentError> {
        let document = stage.document();
        if document.element(candidate).is_none() {
            return Err(ComponentError::UnknownNode(candidate));
        }
        let id = std::iter::once(candidate)
            .chain(document.ancestors(candidate))
            .find(|id| stage.is_editable_unit(*id))
            .unwrap_or(candidate);

        let kind = ElementKind::resolve(
            document.attribute(id, ATTR_ELEMENT_TYPE),
            document.attribute(id, ATTR_ELEMENT_SUBTYPE),
        )?;

        let mut node = Self {
            id,
            kind,
            context: Context::Normal,
        };
        node.set_context(stage, context.unwrap_or_default());
        Ok(node)
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    pub fn context(&self) -> Context {
        self.context
    }

    /// Switch the active context and apply its appearance live.
    ///
    /// Geometry is never re-applied here; only the normal record's geometry
    /// ever reaches the live box.
    pub fn set_context(&mut self, stage: &mut Stage, context: Context) {
        self.context = context;
        let style = self.get_style(stage, context);
        stage.document_mut().set_style(self.id, &style, context);
        debug!(id = ?self.id, %context, "Context switched");
    }

    // =======================================================================
    // Styles and geometry
    // =======================================================================

    pub fn get_css(&self, stage: &Stage, context: Context) -> PropertyMap {
        stage.document().get_css(self.id, context)
    }

    pub fn has_style(&self, stage: &Stage, context: Context) -> bool {
        stage.document().has_style(self.id, context)
    }

    pub fn get_style(&self, stage: &Stage, context: Context) -> PropertyMap {
        stage.document().get_style(self.id, context)
    }

    pub fn set_style(&self, stage: &mut Stage, style: &PropertyMap, context: Context) {
        stage.document_mut().set_style(self.id, style, context);
    }

    pub fn bounding_box(&self, stage: &Stage) -> GeometryBox {
        stage.document().bounding_box(self.id)
    }

    pub fn set_bounding_box(&self, stage: &mut Stage, bb: &GeometryBox) {
        stage.document_mut().set_bounding_box(self.id, bb);
    }

    // =======================================================================
    // Children
    // =======================================================================

    pub fn add_container(&self, stage: &mut Stage) -> Result<ElementNode, ComponentError> {
        ComponentFactory::create(stage, self, ElementKind::Container)
    }

    pub fn add_text(&self, stage: &mut Stage) -> Result<ElementNode, ComponentError> {
        ComponentFactory::create(stage, self, ElementKind::TextBox)
    }

    pub fn add_html(&self, stage: &mut Stage) -> Result<ElementNode, ComponentError> {
        ComponentFactory::create(stage, self, ElementKind::HtmlBox)
    }

    /// Add an image. Its geometry is a placeholder until the media loads.
    pub fn add_image(&self, stage: &mut Stage, url: &str) -> Result<ElementNode, ComponentError> {
        ComponentFactory::create_image(stage, self, url)
    }

    /// Detach a descendant component from the tree.
    ///
    /// Pending media loads inside the removed subtree are cancelled.
    pub fn remove(&self, stage: &mut Stage, child: &ElementNode) -> Result<(), ComponentError> {
        if !stage.document().contains(self.id, child.id) {
            return Err(ComponentError::NotADescendant(child.id));
        }
        stage.cancel_loads_within(child.id);
        stage.document_mut().detach(child.id);
        debug!(parent = ?self.id, child = ?child.id, "Component removed");
        Ok(())
    }

    /// Element new children are attached to: the first descendant with the
    /// background class, or the component itself.
    pub fn background_element(&self, stage: &Stage) -> NodeId {
        let class = &stage.config().background_class;
        stage
            .document()
            .find_descendant(self.id, |e| e.has_class(class))
            .unwrap_or(self.id)
    }

    /// Nearest strict ancestor that is only visible on some pages.
    pub fn first_pageable_parent(&self, stage: &Stage) -> Option<NodeId> {
        stage
            .document()
            .ancestors(self.id)
            .into_iter()
            .find(|id| stage.is_page_scoped(*id))
    }

    // =======================================================================
    // Content
    // =======================================================================

    /// Export the component's content as markup.
    ///
    /// Every component is reset to its normal appearance and this subtree is
    /// cleaned of interaction artifacts before it is copied, so none of them
    /// reach the output. With a base URL, references are made relative.
    pub fn get_html(&self, stage: &mut Stage, base: Option<&Url>) -> Result<String, ComponentError> {
        stage.apply_context_to_all(Context::Normal);

        stage.set_editable(self.id, false);
        let copy = stage.document_mut().deep_clone(self.id);
        stage.set_editable(self.id, true);
        let copy = copy?;

        let document = stage.document();
        let html = match self.kind {
            ElementKind::HtmlBox => match document.first_element_child(copy) {
                Some(content) => document.inner_html(content),
                None => {
                    let error = ComponentError::MissingMediaElement(
                        "html box has no content element".to_string(),
                    );
                    error!(id = ?self.id, %error, "Cannot get html");
                    String::new()
                }
            },
            _ => document.inner_html(copy),
        };
        stage.document_mut().discard(copy);

        Ok(match base {
            Some(base) => url_rewrite::to_relative(&html, base),
            None => html,
        })
    }

    /// Replace the component's content with markup.
    ///
    /// With a base URL, relative references are resolved first. Pending
    /// media loads under the replaced content are cancelled.
    pub fn set_html(
        &self,
        stage: &mut Stage,
        html: &str,
        base: Option<&Url>,
    ) -> Result<(), ComponentError> {
        stage.set_editable(self.id, false);

        let html = match base {
            Some(base) => url_rewrite::to_absolute(html, base),
            None => {
                warn!(id = ?self.id, "set_html without base url; relative references are kept");
                html.to_string()
            }
        };

        let target = match self.kind {
            ElementKind::HtmlBox => stage.document().first_element_child(self.id),
            _ => Some(self.id),
        };
        let result = match target {
            Some(target) => {
                for child in stage.document().children(target) {
                    stage.cancel_loads_within(child);
                }
                stage.document_mut().set_raw_content(target, &html)
            }
            None => {
                let error = ComponentError::MissingMediaElement(
                    "html box has no content element".to_string(),
                );
                error!(id = ?self.id, %error, "Cannot set html");
                Ok(())
            }
        };

        stage.set_editable(self.id, true);
        result
    }

    // =======================================================================
    // Editing
    // =======================================================================

    /// Decorate or clean `scope` (this component by default) and every
    /// editable unit inside it.
    pub fn set_editable(&self, stage: &mut Stage, editable: bool, scope: Option<NodeId>) {
        stage.set_editable(scope.unwrap_or(self.id), editable);
    }

    pub fn is_locked(&self, stage: &Stage) -> bool {
        stage
            .document()
            .element(self.id)
            .is_some_and(|e| e.is_locked())
    }

    /// Lock or unlock the component. Locking cleans it; unlocking decorates
    /// it again. The lock is persisted as a marker class.
    pub fn set_locked(&self, stage: &mut Stage, locked: bool) {
        let class = stage.config().locked_class.clone();
        let document = stage.document_mut();
        document.set_locked(self.id, locked);
        if locked {
            document.add_class(self.id, &class);
        } else {
            document.remove_class(self.id, &class);
        }
        stage.set_editable(self.id, !locked);
    }

    // =======================================================================
    // Links and classes
    // =======================================================================

    pub fn set_link(&self, stage: &mut Stage, url: &str) {
        stage
            .document_mut()
            .set_attribute(self.id, ATTR_LINK_TARGET, url);
    }

    pub fn get_link(&self, stage: &Stage) -> Option<String> {
        stage
            .document()
            .attribute(self.id, ATTR_LINK_TARGET)
            .map(str::to_string)
    }

    pub fn remove_link(&self, stage: &mut Stage) {
        stage
            .document_mut()
            .remove_attribute(self.id, ATTR_LINK_TARGET);
    }

    pub fn add_class(&self, stage: &mut Stage, class: &str) {
        stage.document_mut().add_class(self.id, class);
    }

    pub fn remove_class(&self, stage: &mut Stage, class: &str) {
        stage.document_mut().remove_class(self.id, class);
    }

    pub fn has_class(&self, stage: &Stage, class: &str) -> bool {
        stage.document().has_class(self.id, class)
    }

    pub fn classes(&self, stage: &Stage) -> Vec<String> {
        stage.document().classes(self.id)
    }

    /// Replace the class list with the whitespace-separated `classes`.
    pub fn set_classes(&self, stage: &mut Stage, classes: &str) {
        let document = stage.document_mut();
        for class in document.classes(self.id) {
            document.remove_class(self.id, &class);
        }
        for class in classes.split_whitespace() {
            document.add_class(self.id, class);
        }
    }

    pub fn set_selected(&self, stage: &mut Stage, selected: bool) {
        let class = stage.config().selected_class.clone();
        if selected {
            stage.document_mut().add_class(self.id, &class);
        } else {
            stage.document_mut().remove_class(self.id, &class);
        }
    }

    pub fn is_selected(&self, stage: &Stage) -> bool {
        stage
            .document()
            .has_class(self.id, &stage.config().selected_class)
    }

    // =======================================================================
    // Images
    // =======================================================================

    fn image_element(&self, stage: &Stage) -> Result<NodeId, ComponentError> {
        if self.kind != ElementKind::ImageBox {
            return Err(ComponentError::MissingMediaElement(format!(
                "{:?} component has no image",
                self.kind
            )));
        }
        stage
            .document()
            .find_descendant(self.id, |e| e.tag() == "img")
            .ok_or_else(|| {
                ComponentError::MissingMediaElement("image element not found".to_string())
            })
    }

    /// Source of an image component, or an empty string.
    pub fn image_src(&self, stage: &Stage) -> String {
        match self.image_element(stage) {
            Ok(img) => stage
                .document()
                .attribute(img, "src")
                .unwrap_or_default()
                .to_string(),
            Err(error) => {
                error!(id = ?self.id, %error, "Cannot get the image source");
                String::new()
            }
        }
    }

    pub fn set_image_src(&self, stage: &mut Stage, url: &str) {
        match self.image_element(stage) {
            Ok(img) => stage.document_mut().set_attribute(img, "src", url),
            Err(error) => error!(id = ?self.id, %error, "Cannot set the image source"),
        }
    }
}
