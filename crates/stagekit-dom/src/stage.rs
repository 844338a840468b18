//! The stage: document tree plus the collaborators components rely on.

use stagekit_css::{decode, strip_geometry, GeometryBox};
use tracing::{debug, trace, warn};

use crate::component::{ElementNode, ATTR_ELEMENT_TYPE, TYPE_CONTAINER};
use crate::config::StageConfig;
use crate::context::Context;
use crate::document::{Document, InteractionState, NodeId};
use crate::error::ComponentError;
use crate::interaction::{self, ActivateOptions, HandlePlugin, InteractionPlugin};
use crate::media::{
    DeferredLoader, LoadTicket, MediaEvent, MediaLoader, MediaNotifier, MediaQueue, MediaRequest,
};
use crate::page::{ClassPageScope, PageScope};

/// Owns the document and the editing, media and page collaborators.
pub struct Stage {
    document: Document,
    config: StageConfig,
    plugin: Box<dyn InteractionPlugin>,
    loader: Box<dyn MediaLoader>,
    page_scope: Box<dyn PageScope>,
    media: MediaQueue,
}

impl Default for Stage {
    fn default() -> Self {
        Self::new()
    }
}

impl Stage {
    /// Create a stage with the default configuration and collaborators.
    pub fn new() -> Self {
        StageBuilder::new().build()
    }

    fn with_parts(
        config: StageConfig,
        plugin: Box<dyn InteractionPlugin>,
        loader: Box<dyn MediaLoader>,
        page_scope: Box<dyn PageScope>,
    ) -> Self {
        let mut document = Document::new();
        let root = document.root();
        document.set_attribute(root, ATTR_ELEMENT_TYPE, TYPE_CONTAINER);
        Self {
            document,
            config,
            plugin,
            loader,
            page_scope,
            media: MediaQueue::new(),
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn config(&self) -> &StageConfig {
        &self.config
    }

    /// Component for the stage root.
    pub fn root(&mut self) -> Result<ElementNode, ComponentError> {
        let root = self.document.root();
        ElementNode::new(self, root, None)
    }

    pub fn is_editable_unit(&self, id: NodeId) -> bool {
        self.document.has_class(id, &self.config.editable_class)
    }

    pub(crate) fn is_page_scoped(&self, id: NodeId) -> bool {
        self.page_scope.is_page_scoped(&self.document, id)
    }

    // =======================================================================
    // Decoration
    // =======================================================================

    /// Decorate or clean every editable unit in `scope`, `scope` included.
    ///
    /// Decorating skips locked nodes, already decorated nodes and nodes whose
    /// media is still loading. Cleaning also scrubs whatever interaction
    /// artifacts are left in the subtree.
    pub fn set_editable(&mut self, scope: NodeId, editable: bool) {
        let mut targets = vec![scope];
        targets.extend(self.document.descendants(scope));
        targets.retain(|id| self.is_editable_unit(*id));

        if editable {
            for id in targets {
                self.decorate(id);
            }
        } else {
            for id in targets {
                self.undecorate(id);
            }
            interaction::clear_artifacts(&mut self.document, scope, &self.config.selected_class);
        }
    }

    fn decorate(&mut self, id: NodeId) {
        let Some(element) = self.document.element(id) else {
            return;
        };
        if element.is_locked() || element.interaction() == InteractionState::Decorated {
            return;
        }
        if self.media.is_pending(id) {
            trace!(?id, "Not decorating a node whose media is still loading");
            return;
        }
        let options = ActivateOptions {
            is_container: element
                .attribute(ATTR_ELEMENT_TYPE)
                .is_some_and(|t| t.trim().eq_ignore_ascii_case(TYPE_CONTAINER)),
        };
        self.plugin.activate(&mut self.document, id, options);
        self.document.set_interaction(id, InteractionState::Decorated);
    }

    fn undecorate(&mut self, id: NodeId) {
        let decorated = self
            .document
            .element(id)
            .is_some_and(|e| e.interaction() == InteractionState::Decorated);
        if decorated {
            self.plugin.deactivate(&mut self.document, id);
            self.document.set_interaction(id, InteractionState::Clean);
        }
    }

    // =======================================================================
    // Contexts
    // =======================================================================

    /// Reset the live presentation of every styled node from `context`.
    ///
    /// Nodes without a record for `context` fall back to their normal record;
    /// other contexts are layered over the normal record so geometry stays.
    pub fn apply_context_to_all(&mut self, context: Context) {
        let root = self.document.root();
        let mut nodes = vec![root];
        nodes.extend(self.document.descendants(root));

        for id in nodes {
            let Some(normal) = self.document.attribute(id, Context::Normal.attribute_name()) else {
                continue;
            };
            let mut presentation = decode(normal);
            if context != Context::Normal {
                let overlay = strip_geometry(&self.document.get_css(id, context));
                presentation.extend(overlay);
            }
            self.document.reset_presentation(id, presentation);
        }
        debug!(%context, "Applied context to all components");
    }

    // =======================================================================
    // Media
    // =======================================================================

    /// Sender the host uses to report media completions.
    pub fn media_notifier(&self) -> MediaNotifier {
        self.media.notifier()
    }

    pub fn pending_load(&self, id: NodeId) -> Option<LoadTicket> {
        self.media.ticket_for(id)
    }

    pub fn pending_load_count(&self) -> usize {
        self.media.len()
    }

    pub(crate) fn request_media(&mut self, node: NodeId, src: &str, placeholder: GeometryBox) {
        let ticket = self.media.register(node, placeholder);
        let request = MediaRequest {
            ticket,
            node,
            src: src.to_string(),
        };
        let notifier = self.media.notifier();
        self.loader.load(&request, &notifier);
    }

    /// Cancel pending loads owned by `scope` or its descendants.
    pub(crate) fn cancel_loads_within(&mut self, scope: NodeId) -> usize {
        self.media.cancel_within(&self.document, scope)
    }

    /// Apply every queued media completion. Returns how many resized a node.
    ///
    /// A completed image takes its natural size on top of the geometry it was
    /// created with, then gets decorated. Completions for cancelled loads or
    /// detached nodes are dropped.
    pub fn pump_media_events(&mut self) -> usize {
        let mut applied = 0;
        while let Some(event) = self.media.try_next() {
            match event {
                MediaEvent::Loaded {
                    ticket,
                    width,
                    height,
                } => {
                    let Some(load) = self.media.take(ticket) else {
                        debug!(ticket = ticket.raw(), "Ignoring completion of a cancelled load");
                        continue;
                    };
                    if !self.document.is_attached(load.node) {
                        debug!(ticket = ticket.raw(), "Ignoring completion for a detached node");
                        continue;
                    }
                    let bb = load
                        .placeholder
                        .with_px_size(width as f32, height as f32);
                    self.document.set_bounding_box(load.node, &bb);
                    self.set_editable(load.node, true);
                    debug!(ticket = ticket.raw(), width, height, "Media loaded");
                    applied += 1;
                }
                MediaEvent::Failed { ticket, reason } => {
                    if self.media.take(ticket).is_some() {
                        warn!(ticket = ticket.raw(), %reason, "Media failed to load; component stays undecorated");
                    }
                }
            }
        }
        applied
    }
}

/// Builder for [`Stage`].
pub struct StageBuilder {
    config: StageConfig,
    plugin: Option<Box<dyn InteractionPlugin>>,
    loader: Option<Box<dyn MediaLoader>>,
    page_scope: Option<Box<dyn PageScope>>,
}

impl StageBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            config: StageConfig::default(),
            plugin: None,
            loader: None,
            page_scope: None,
        }
    }

    /// Set the configuration.
    pub fn config(mut self, config: StageConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the interaction plugin.
    pub fn plugin(mut self, plugin: impl InteractionPlugin + 'static) -> Self {
        self.plugin = Some(Box::new(plugin));
        self
    }

    /// Set the media loader.
    pub fn loader(mut self, loader: impl MediaLoader + 'static) -> Self {
        self.loader = Some(Box::new(loader));
        self
    }

    /// Set the page-membership predicate. Defaults to the configured page class.
    pub fn page_scope(mut self, page_scope: impl PageScope + 'static) -> Self {
        self.page_scope = Some(Box::new(page_scope));
        self
    }

    /// Build the stage.
    pub fn build(self) -> Stage {
        let page_scope = self
            .page_scope
            .unwrap_or_else(|| Box::new(ClassPageScope::new(self.config.page_class.clone())));
        Stage::with_parts(
            self.config,
            self.plugin.unwrap_or_else(|| Box::new(HandlePlugin)),
            self.loader.unwrap_or_else(|| Box::new(DeferredLoader)),
            page_scope,
        )
    }
}

impl Default for StageBuilder {
    fn default() -> Self {
        Self::new()
    }
}
