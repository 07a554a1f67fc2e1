//! Optimistic, fire-and-forget layout saves.
//!
//! Saves run as detached Tokio tasks. The gesture that triggered a save has
//! already returned to idle by the time the task runs, and the outcome
//! never feeds back into the layout store: a failed save is logged and
//! surfaced as a host notice, but the local layout stays as committed until
//! the next full reload. There is no retry and no reconciliation fetch.
//!
//! Completion order is not issue order. Every payload carries full
//! rectangles, so a late reply can only affect the widget(s) it names.

use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use async_trait::async_trait;
use parking_lot::Mutex;
use tilegrid_geom::Rect;
use tilegrid_ids::WidgetId;
use tilegrid_protocol::{
    LayoutRecord, SaveLayoutRequest, SaveResponse, SaveScope, SaveWidgetRequest,
};
use tokio::{runtime::Handle, task::JoinHandle};
use tracing::{debug, info, warn};

use crate::{Error, LayoutStore, NotificationDispatcher, Result};

/// Backend endpoint that accepts layout saves.
///
/// Implementations perform the actual transport (HTTP, IPC, a file) and
/// return the decoded reply. A reply with `success: false` is still `Ok`
/// here; the caller decides what counts as a failure.
#[async_trait]
pub trait LayoutGateway: Send + Sync {
    /// Persist the whole layout.
    async fn save_layout(&self, req: SaveLayoutRequest) -> Result<SaveResponse>;
    /// Persist one widget's rectangle.
    async fn save_widget(&self, req: SaveWidgetRequest) -> Result<SaveResponse>;
}

/// How one save resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveStatus {
    /// Backend accepted the save.
    Saved,
    /// Transport failure or rejected reply, with a rendered reason.
    Failed(String),
}

/// Final record of one issued save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveOutcome {
    /// Issue sequence number (1-based, monotonic per gateway).
    pub seq: u64,
    /// What was saved.
    pub scope: SaveScope,
    /// Result.
    pub status: SaveStatus,
}

impl SaveOutcome {
    /// True when the backend accepted the save.
    pub fn is_saved(&self) -> bool {
        self.status == SaveStatus::Saved
    }
}

/// Issues saves against a [`LayoutGateway`] and reports their outcome.
pub struct PersistenceGateway {
    /// Transport.
    gateway: Arc<dyn LayoutGateway>,
    /// Host notices for failures and confirmations.
    notifier: NotificationDispatcher,
    /// Last issued sequence number.
    seq: AtomicU64,
    /// Handles of saves not yet reaped by [`Self::flush`].
    pending: Mutex<Vec<JoinHandle<SaveOutcome>>>,
    /// Saves that resolved without ever running, kept for [`Self::flush`].
    settled: Mutex<Vec<SaveOutcome>>,
}

impl PersistenceGateway {
    /// Create a gateway around `gateway`, reporting through `notifier`.
    pub fn new(gateway: Arc<dyn LayoutGateway>, notifier: NotificationDispatcher) -> Self {
        Self {
            gateway,
            notifier,
            seq: AtomicU64::new(0),
            pending: Mutex::new(Vec::new()),
            settled: Mutex::new(Vec::new()),
        }
    }

    /// Save every widget of `store`, in load order.
    ///
    /// Returns the save's sequence number immediately. Outside a Tokio
    /// runtime the save fails at once and is reported like any other
    /// failure.
    pub fn save_full(&self, store: &LayoutStore) -> u64 {
        let req = SaveLayoutRequest {
            layout: store.records(),
        };
        let gateway = self.gateway.clone();
        debug!(widgets = req.layout.len(), "save_full queued");
        self.spawn(SaveScope::Layout, async move {
            gateway.save_layout(req).await
        })
    }

    /// Save a single widget's rectangle.
    ///
    /// Returns the save's sequence number immediately.
    pub fn save_one(&self, id: &WidgetId, rect: Rect) -> u64 {
        let req = SaveWidgetRequest {
            record: LayoutRecord::new(id.clone(), rect),
        };
        let gateway = self.gateway.clone();
        debug!(id = %id, rect = ?rect, "save_one queued");
        self.spawn(SaveScope::Widget(id.clone()), async move {
            gateway.save_widget(req).await
        })
    }

    /// Number of issued saves that have not finished yet.
    pub fn in_flight(&self) -> usize {
        self.pending.lock().iter().filter(|h| !h.is_finished()).count()
    }

    /// Last issued sequence number (0 before the first save).
    pub fn last_seq(&self) -> u64 {
        self.seq.load(Ordering::SeqCst)
    }

    /// Wait for every tracked save and return the outcomes in issue order.
    ///
    /// Saves that finished before a later save was issued may already have
    /// been reaped; their outcome was logged and notified at the time.
    pub async fn flush(&self) -> Vec<SaveOutcome> {
        let handles: Vec<_> = self.pending.lock().drain(..).collect();
        let mut out: Vec<_> = self.settled.lock().drain(..).collect();
        for h in handles {
            match h.await {
                Ok(outcome) => out.push(outcome),
                Err(e) => warn!(error = %e, "save task did not complete"),
            }
        }
        out.sort_by_key(|o| o.seq);
        out
    }

    /// Spawn the save future on the current runtime and track its handle.
    fn spawn<F>(&self, scope: SaveScope, fut: F) -> u64
    where
        F: Future<Output = Result<SaveResponse>> + Send + 'static,
    {
        let seq = self.seq.fetch_add(1, Ordering::SeqCst) + 1;
        let Ok(rt) = Handle::try_current() else {
            let status = SaveStatus::Failed(Error::NoRuntime.to_string());
            report(&self.notifier, seq, &scope, &status);
            self.settled.lock().push(SaveOutcome { seq, scope, status });
            return seq;
        };
        let notifier = self.notifier.clone();
        let handle = rt.spawn(async move {
            let status = match fut.await {
                Ok(resp) if resp.success => SaveStatus::Saved,
                Ok(resp) => SaveStatus::Failed(Error::Rejected(resp.message).to_string()),
                Err(e) => SaveStatus::Failed(e.to_string()),
            };
            report(&notifier, seq, &scope, &status);
            SaveOutcome { seq, scope, status }
        });
        let mut pending = self.pending.lock();
        pending.retain(|h| !h.is_finished());
        pending.push(handle);
        seq
    }
}

/// Log one resolved save and tell the host about it.
fn report(notifier: &NotificationDispatcher, seq: u64, scope: &SaveScope, status: &SaveStatus) {
    let sent = match status {
        SaveStatus::Saved => {
            info!(seq, scope = ?scope, "layout saved");
            notifier.send_saved(scope.clone(), seq)
        }
        SaveStatus::Failed(reason) => {
            warn!(seq, scope = ?scope, reason = %reason, "layout save failed; keeping local layout");
            let what = match scope {
                SaveScope::Layout => "The layout".to_string(),
                SaveScope::Widget(id) => format!("Widget {id}"),
            };
            notifier.send_warn(
                "Layout not saved",
                format!("{what} could not be saved: {reason}"),
            )
        }
    };
    if let Err(e) = sent {
        debug!(seq, error = %e, "host gone; save outcome not delivered");
    }
}
