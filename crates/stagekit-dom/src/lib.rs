//! # StageKit DOM
//!
//! Component tree for a visual page editor.
//!
//! ## Design Goals
//!
//! 1. **Arena tree**: Nodes are addressed by [`NodeId`]; containment is always derived by traversal
//! 2. **Context records**: Each component keeps one style record per [`Context`], and only the
//!    normal record carries geometry
//! 3. **Explicit decoration**: Interactive editing is an [`InteractionState`] on the node, attached
//!    and detached through [`Stage::set_editable`]
//! 4. **Cancellable media**: Image loads are tickets owned by a node and dropped when it is removed
//!
//! ## Example
//!
//! ```rust,no_run
//! use stagekit_dom::{Context, Stage};
//!
//! # fn main() -> Result<(), stagekit_dom::ComponentError> {
//! let mut stage = Stage::new();
//! let root = stage.root()?;
//! let text = root.add_text(&mut stage)?;
//! let hover = [("color", "red")].into_iter().collect();
//! text.set_style(&mut stage, &hover, Context::Hover);
//! let html = root.get_html(&mut stage, None)?;
//! # let _ = html;
//! # Ok(())
//! # }
//! ```

pub mod component;
pub mod config;
pub mod context;
pub mod document;
pub mod error;
pub mod factory;
pub mod interaction;
pub mod media;
pub mod page;
mod printing;
pub mod stage;
mod style_store;
pub mod url_rewrite;

pub use component::{ElementKind, ElementNode};
pub use config::StageConfig;
pub use context::Context;
pub use document::{Document, ElementData, InteractionState, Mutation, NodeId, NodeKind};
pub use error::{ComponentError, ConfigError, ContextParseError};
pub use factory::ComponentFactory;
pub use interaction::{ActivateOptions, HandlePlugin, InteractionPlugin};
pub use media::{DeferredLoader, LoadTicket, MediaEvent, MediaLoader, MediaNotifier, MediaRequest};
pub use page::{ClassPageScope, PageScope};
pub use stage::{Stage, StageBuilder};

pub use stagekit_css::{GeometryBox, PropertyMap};
