//! TestStage - Stage wrapper with observable collaborators.

use std::cell::RefCell;
use std::rc::Rc;

use stagekit_dom::{
    ActivateOptions, Document, ElementNode, HandlePlugin, InteractionPlugin, MediaLoader,
    MediaNotifier, MediaRequest, NodeId, Stage, StageBuilder, StageConfig,
};
use tracing_subscriber::EnvFilter;

/// Install a test subscriber once. Controlled by `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Activation and deactivation calls seen by the plugin.
#[derive(Debug, Default)]
pub struct PluginLog {
    pub activated: Vec<NodeId>,
    pub deactivated: Vec<NodeId>,
}

/// Handle plugin that records every call.
struct CountingPlugin {
    inner: HandlePlugin,
    log: Rc<RefCell<PluginLog>>,
}

impl InteractionPlugin for CountingPlugin {
    fn activate(&mut self, document: &mut Document, node: NodeId, options: ActivateOptions) {
        self.log.borrow_mut().activated.push(node);
        self.inner.activate(document, node, options);
    }

    fn deactivate(&mut self, document: &mut Document, node: NodeId) {
        self.log.borrow_mut().deactivated.push(node);
        self.inner.deactivate(document, node);
    }
}

/// Loader that only records requests; tests complete them by hand.
struct ManualLoader {
    requests: Rc<RefCell<Vec<MediaRequest>>>,
}

impl MediaLoader for ManualLoader {
    fn load(&mut self, request: &MediaRequest, _notifier: &MediaNotifier) {
        self.requests.borrow_mut().push(request.clone());
    }
}

/// Stage with a counting plugin and a manual media loader.
pub struct TestStage {
    pub stage: Stage,
    plugin_log: Rc<RefCell<PluginLog>>,
    requests: Rc<RefCell<Vec<MediaRequest>>>,
}

impl TestStage {
    /// Create a test stage with the default configuration.
    pub fn new() -> Self {
        Self::with_config(StageConfig::default())
    }

    pub fn with_config(config: StageConfig) -> Self {
        init_tracing();

        let plugin_log = Rc::new(RefCell::new(PluginLog::default()));
        let requests = Rc::new(RefCell::new(Vec::new()));
        let stage = StageBuilder::new()
            .config(config)
            .plugin(CountingPlugin {
                inner: HandlePlugin,
                log: Rc::clone(&plugin_log),
            })
            .loader(ManualLoader {
                requests: Rc::clone(&requests),
            })
            .build();

        Self {
            stage,
            plugin_log,
            requests,
        }
    }

    /// Component for the stage root.
    pub fn root(&mut self) -> ElementNode {
        self.stage.root().expect("stage root should resolve")
    }

    pub fn document(&self) -> &Document {
        self.stage.document()
    }

    pub fn activations(&self, node: NodeId) -> usize {
        self.plugin_log
            .borrow()
            .activated
            .iter()
            .filter(|id| **id == node)
            .count()
    }

    pub fn deactivations(&self, node: NodeId) -> usize {
        self.plugin_log
            .borrow()
            .deactivated
            .iter()
            .filter(|id| **id == node)
            .count()
    }

    /// Requests the loader has received, oldest first.
    pub fn requests(&self) -> Vec<MediaRequest> {
        self.requests.borrow().clone()
    }

    fn request_for(&self, node: NodeId) -> MediaRequest {
        self.requests
            .borrow()
            .iter()
            .rev()
            .find(|r| r.node == node)
            .cloned()
            .expect("a media request for the node")
    }

    /// Report a successful load for `node` and apply it.
    pub fn complete_load(&mut self, node: NodeId, width: u32, height: u32) -> usize {
        let request = self.request_for(node);
        self.stage.media_notifier().loaded(request.ticket, width, height);
        self.stage.pump_media_events()
    }

    /// Report a failed load for `node` and apply it.
    pub fn fail_load(&mut self, node: NodeId, reason: &str) -> usize {
        let request = self.request_for(node);
        self.stage.media_notifier().failed(request.ticket, reason);
        self.stage.pump_media_events()
    }
}
