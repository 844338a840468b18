//! Error types for the component model.

use thiserror::Error;

use crate::component::ElementKind;
use crate::document::NodeId;

/// Errors raised by component operations.
#[derive(Error, Debug)]
pub enum ComponentError {
    /// The type attributes are absent or invalid; the node cannot be addressed.
    #[error("Type resolution error: element type {element_type:?}, subtype {subtype:?}")]
    TypeResolution {
        element_type: Option<String>,
        subtype: Option<String>,
    },

    #[error("Not a container: cannot add a child to a {0:?} component")]
    NotAContainer(ElementKind),

    #[error("Not a descendant: node {0:?} is not inside this component")]
    NotADescendant(NodeId),

    /// An image or HTML box lost its inner payload element.
    #[error("Missing media element: {0}")]
    MissingMediaElement(String),

    #[error("Unknown node: {0:?}")]
    UnknownNode(NodeId),

    #[error("Invalid tree operation: {0}")]
    InvalidTree(String),
}

/// Errors that can occur while loading a stage configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("Unknown context: {0}")]
pub struct ContextParseError(pub String);
