//! Component construction.

use stagekit_css::{Length, PropertyMap};
use tracing::{debug, error};

use crate::component::{ElementKind, ElementNode, ATTR_ELEMENT_SUBTYPE, ATTR_ELEMENT_TYPE};
use crate::context::Context;
use crate::document::NodeId;
use crate::error::ComponentError;
use crate::stage::Stage;

/// Builds new components with default classing, geometry and fill.
pub struct ComponentFactory;

impl ComponentFactory {
    /// Create a child component of `kind` under `parent`.
    ///
    /// Fails with [`ComponentError::NotAContainer`] before touching the tree
    /// when `parent` cannot hold children. Image components created here have
    /// no source; use [`ComponentFactory::create_image`] to load one.
    pub fn create(
        stage: &mut Stage,
        parent: &ElementNode,
        kind: ElementKind,
    ) -> Result<ElementNode, ComponentError> {
        if kind == ElementKind::ImageBox {
            return Self::create_image(stage, parent, "");
        }
        Self::check_container(parent)?;

        let div = Self::attach_shell(stage, parent, kind)?;
        stage.set_editable(div, true);
        let node = Self::finish(stage, div)?;
        debug!(id = ?node.id(), ?kind, "Component created");
        Ok(node)
    }

    /// Create an image component and start loading `src`.
    ///
    /// The component is returned right away with placeholder geometry and is
    /// decorated only once the media completes; it then takes the image's
    /// natural size.
    pub fn create_image(
        stage: &mut Stage,
        parent: &ElementNode,
        src: &str,
    ) -> Result<ElementNode, ComponentError> {
        Self::check_container(parent)?;
        if src.is_empty() {
            error!("No URL provided for the image component");
        }

        let div = Self::attach_shell(stage, parent, ElementKind::ImageBox)?;
        let node = Self::finish(stage, div)?;
        node.set_image_src(stage, src);

        let placeholder = node.bounding_box(stage);
        stage.request_media(div, src, placeholder);
        debug!(id = ?node.id(), src, "Image component created");
        Ok(node)
    }

    fn check_container(parent: &ElementNode) -> Result<(), ComponentError> {
        if parent.kind().is_container() {
            Ok(())
        } else {
            Err(ComponentError::NotAContainer(parent.kind()))
        }
    }

    /// Create the component element with its payload and attach it to the
    /// parent's background element.
    fn attach_shell(
        stage: &mut Stage,
        parent: &ElementNode,
        kind: ElementKind,
    ) -> Result<NodeId, ComponentError> {
        let container = parent.background_element(stage);
        let config = stage.config().clone();
        let document = stage.document_mut();

        let div = document.create_element("div");
        document.add_class(div, &config.editable_class);
        document.set_attribute(div, ATTR_ELEMENT_TYPE, kind.element_type());
        if let Some(subtype) = kind.subtype() {
            document.set_attribute(div, ATTR_ELEMENT_SUBTYPE, subtype);
        }

        let full = Length::Percent(100.0).to_string();
        match kind {
            ElementKind::Container => {}
            ElementKind::TextBox => document.set_raw_content(div, &config.default_text)?,
            ElementKind::HtmlBox => {
                let content = document.create_element("div");
                document.add_class(content, &config.html_content_class);
                document.set_style_property(content, "width", Some(full.as_str()));
                document.set_style_property(content, "height", Some(full.as_str()));
                document.set_raw_content(content, &config.default_html)?;
                document.append(div, content)?;
            }
            ElementKind::ImageBox => {
                let img = document.create_element("img");
                document.set_style_property(img, "width", Some(full.as_str()));
                document.set_style_property(img, "height", Some(full.as_str()));
                document.append(div, img)?;
            }
        }

        document.append(container, div)?;
        Ok(div)
    }

    /// Address the new element and give it default geometry and fill.
    fn finish(stage: &mut Stage, div: NodeId) -> Result<ElementNode, ComponentError> {
        let node = ElementNode::new(stage, div, None)?;
        let geometry = stage.config().default_geometry();
        node.set_bounding_box(stage, &geometry);

        let mut fill = PropertyMap::new();
        fill.insert("backgroundColor", stage.config().default_fill.as_str());
        node.set_style(stage, &fill, Context::Normal);
        Ok(node)
    }
}
