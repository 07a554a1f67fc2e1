//! In-memory collaborators for tests (enabled with the `test-utils` feature).

use std::{
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use parking_lot::Mutex;
use tilegrid_geom::Rect;
use tilegrid_ids::WidgetId;
use tilegrid_protocol::{LayoutRecord, SaveLayoutRequest, SaveResponse, SaveWidgetRequest};

use crate::{Error, GhostFrame, GhostRenderer, LayoutGateway, Result};

/// One request seen by [`MockGateway`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveCall {
    /// Full-layout save.
    Layout(SaveLayoutRequest),
    /// Single-widget save.
    Widget(SaveWidgetRequest),
}

/// Recording gateway with switchable failures and per-widget latency.
#[derive(Clone, Default)]
pub struct MockGateway {
    /// Requests in the order they reached the gateway.
    calls: Arc<Mutex<Vec<SaveCall>>>,
    /// Fail with a transport error.
    fail_transport: Arc<AtomicBool>,
    /// Reply with `success: false`.
    reject: Arc<AtomicBool>,
    /// Artificial reply latency for single-widget saves.
    delays: Arc<Mutex<HashMap<WidgetId, Duration>>>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn set_fail_transport(&self, v: bool) {
        self.fail_transport.store(v, Ordering::SeqCst);
    }
    pub fn set_reject(&self, v: bool) {
        self.reject.store(v, Ordering::SeqCst);
    }
    /// Delay every reply to a save of `id` by `delay`.
    pub fn set_delay(&self, id: &WidgetId, delay: Duration) {
        self.delays.lock().insert(id.clone(), delay);
    }
    pub fn calls(&self) -> Vec<SaveCall> {
        self.calls.lock().clone()
    }
    /// Records of every single-widget save, in arrival order.
    pub fn widget_saves(&self) -> Vec<LayoutRecord> {
        self.calls
            .lock()
            .iter()
            .filter_map(|c| match c {
                SaveCall::Widget(req) => Some(req.record.clone()),
                SaveCall::Layout(_) => None,
            })
            .collect()
    }
    /// Every full-layout save, in arrival order.
    pub fn layout_saves(&self) -> Vec<SaveLayoutRequest> {
        self.calls
            .lock()
            .iter()
            .filter_map(|c| match c {
                SaveCall::Layout(req) => Some(req.clone()),
                SaveCall::Widget(_) => None,
            })
            .collect()
    }
    /// Record `call`, wait out any latency, then reply per the failure switches.
    async fn answer(&self, call: SaveCall, delay: Option<Duration>) -> Result<SaveResponse> {
        self.calls.lock().push(call);
        if let Some(d) = delay {
            tokio::time::sleep(d).await;
        }
        if self.fail_transport.load(Ordering::SeqCst) {
            return Err(Error::Transport("connection reset".into()));
        }
        if self.reject.load(Ordering::SeqCst) {
            return Ok(SaveResponse::rejected("backend refused"));
        }
        Ok(SaveResponse::ok())
    }
}

#[async_trait]
impl LayoutGateway for MockGateway {
    async fn save_layout(&self, req: SaveLayoutRequest) -> Result<SaveResponse> {
        self.answer(SaveCall::Layout(req), None).await
    }

    async fn save_widget(&self, req: SaveWidgetRequest) -> Result<SaveResponse> {
        let delay = self.delays.lock().get(&req.record.id).copied();
        self.answer(SaveCall::Widget(req), delay).await
    }
}

/// One call seen by [`RecordingGhost`].
#[derive(Debug, Clone, PartialEq)]
pub enum GhostEvent {
    /// Preview shown or moved.
    Show(WidgetId, GhostFrame),
    /// Preview removed.
    Clear(WidgetId),
    /// Real placement settled.
    Place(WidgetId, Rect),
}

/// Renderer that records every call. Clones share the log.
#[derive(Clone, Default)]
pub struct RecordingGhost {
    /// Calls in order.
    events: Arc<Mutex<Vec<GhostEvent>>>,
}

impl RecordingGhost {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn events(&self) -> Vec<GhostEvent> {
        self.events.lock().clone()
    }
    /// Latest preview frame shown for `id`.
    pub fn last_frame(&self, id: &WidgetId) -> Option<GhostFrame> {
        self.events.lock().iter().rev().find_map(|e| match e {
            GhostEvent::Show(i, f) if i == id => Some(*f),
            _ => None,
        })
    }
    /// Latest settled placement for `id`.
    pub fn last_place(&self, id: &WidgetId) -> Option<Rect> {
        self.events.lock().iter().rev().find_map(|e| match e {
            GhostEvent::Place(i, r) if i == id => Some(*r),
            _ => None,
        })
    }
}

impl GhostRenderer for RecordingGhost {
    fn show(&mut self, id: &WidgetId, frame: &GhostFrame) {
        self.events.lock().push(GhostEvent::Show(id.clone(), *frame));
    }
    fn clear(&mut self, id: &WidgetId) {
        self.events.lock().push(GhostEvent::Clear(id.clone()));
    }
    fn place(&mut self, id: &WidgetId, rect: Rect) {
        self.events.lock().push(GhostEvent::Place(id.clone(), rect));
    }
}
