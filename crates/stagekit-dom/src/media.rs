//! Media loading boundary.
//!
//! Image components ask a [`MediaLoader`] for their payload and finish their
//! setup when a [`MediaEvent`] comes back through the stage's event queue.
//! Each request is a pending load keyed by [`LoadTicket`] and owned by one
//! node; cancelling the load makes a late completion a no-op.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use stagekit_css::GeometryBox;
use tokio::sync::mpsc;
use tracing::{debug, trace};

use crate::document::{Document, NodeId};

/// Identifies one pending media load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoadTicket(u64);

impl LoadTicket {
    fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// A request handed to the loader.
#[derive(Debug, Clone)]
pub struct MediaRequest {
    pub ticket: LoadTicket,
    pub node: NodeId,
    pub src: String,
}

/// Completion notification for a media request.
#[derive(Debug, Clone, PartialEq)]
pub enum MediaEvent {
    /// The resource loaded with the given natural size in pixels.
    Loaded {
        ticket: LoadTicket,
        width: u32,
        height: u32,
    },
    /// The resource could not be loaded.
    Failed { ticket: LoadTicket, reason: String },
}

/// Sender side of the stage's media event queue.
#[derive(Debug, Clone)]
pub struct MediaNotifier {
    tx: mpsc::UnboundedSender<MediaEvent>,
}

impl MediaNotifier {
    pub fn loaded(&self, ticket: LoadTicket, width: u32, height: u32) {
        self.send(MediaEvent::Loaded {
            ticket,
            width,
            height,
        });
    }

    pub fn failed(&self, ticket: LoadTicket, reason: impl Into<String>) {
        self.send(MediaEvent::Failed {
            ticket,
            reason: reason.into(),
        });
    }

    fn send(&self, event: MediaEvent) {
        if self.tx.send(event).is_err() {
            trace!("Media event dropped: stage is gone");
        }
    }
}

/// Starts loading media payloads.
///
/// Implementations report back through the notifier at any later point; the
/// stage applies completions when it pumps its event queue.
pub trait MediaLoader {
    fn load(&mut self, request: &MediaRequest, notifier: &MediaNotifier);
}

/// Loader that leaves fulfilment to the host, which completes requests through
/// [`crate::Stage::media_notifier`].
#[derive(Debug, Default)]
pub struct DeferredLoader;

impl MediaLoader for DeferredLoader {
    fn load(&mut self, request: &MediaRequest, _notifier: &MediaNotifier) {
        debug!(ticket = request.ticket.raw(), src = %request.src, "Media load deferred to host");
    }
}

/// A load waiting for completion.
#[derive(Debug, Clone)]
pub(crate) struct PendingLoad {
    pub node: NodeId,
    /// Geometry committed when the component was created.
    pub placeholder: GeometryBox,
}

/// Pending loads plus the event queue they complete through.
pub(crate) struct MediaQueue {
    tx: mpsc::UnboundedSender<MediaEvent>,
    rx: mpsc::UnboundedReceiver<MediaEvent>,
    pending: HashMap<LoadTicket, PendingLoad>,
}

impl MediaQueue {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            tx,
            rx,
            pending: HashMap::new(),
        }
    }

    pub fn notifier(&self) -> MediaNotifier {
        MediaNotifier {
            tx: self.tx.clone(),
        }
    }

    pub fn register(&mut self, node: NodeId, placeholder: GeometryBox) -> LoadTicket {
        let ticket = LoadTicket::new();
        self.pending.insert(ticket, PendingLoad { node, placeholder });
        ticket
    }

    pub fn ticket_for(&self, node: NodeId) -> Option<LoadTicket> {
        self.pending
            .iter()
            .find(|(_, load)| load.node == node)
            .map(|(ticket, _)| *ticket)
    }

    pub fn is_pending(&self, node: NodeId) -> bool {
        self.ticket_for(node).is_some()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Cancel loads owned by `scope` or any of its descendants.
    pub fn cancel_within(&mut self, document: &Document, scope: NodeId) -> usize {
        let before = self.pending.len();
        self.pending
            .retain(|_, load| load.node != scope && !document.contains(scope, load.node));
        let cancelled = before - self.pending.len();
        if cancelled > 0 {
            debug!(cancelled, "Cancelled pending media loads");
        }
        cancelled
    }

    pub fn try_next(&mut self) -> Option<MediaEvent> {
        self.rx.try_recv().ok()
    }

    pub fn take(&mut self, ticket: LoadTicket) -> Option<PendingLoad> {
        self.pending.remove(&ticket)
    }
}
