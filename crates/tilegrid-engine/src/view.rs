//! Per-view owner of the layout editor state.

use std::sync::Arc;

use config::{Config, GridCfg};
use tilegrid_geom::GridGeometry;
use tilegrid_ids::WidgetId;
use tilegrid_protocol::{LayoutRecord, ipc::HostTx};
use tracing::{debug, info};

use crate::{
    EditMode, GestureCtx, GestureKind, GhostRenderer, InteractionController, InteractionState,
    LayoutGateway, LayoutStore, NoopGhost, NotificationDispatcher, PersistenceGateway, PointerPos,
    Result, Transition,
};

/// One editable grid view.
///
/// Owns the store, the edit-mode flag and the gesture controller, and
/// lends them to the controller for each pointer event. Host code feeds
/// pointer events and the edit/save toggle in; saves and notices flow out
/// through the gateway and the host channel.
pub struct EditorView {
    /// Authoritative rectangles.
    store: LayoutStore,
    /// Edit/save toggle state.
    edit: EditMode,
    /// Grid shape from configuration.
    grid: GridCfg,
    /// Pixel geometry for the current container width.
    geom: GridGeometry,
    /// Gesture state machine.
    controller: InteractionController,
    /// Visual feedback sink.
    ghost: Box<dyn GhostRenderer>,
    /// Save issuer.
    persistence: PersistenceGateway,
    /// Host notices.
    notifier: NotificationDispatcher,
}

impl EditorView {
    /// Build a view from the server layout.
    ///
    /// Edit mode starts off. Fails on duplicate widget ids.
    pub fn new(
        cfg: &Config,
        container_width: f64,
        records: Vec<LayoutRecord>,
        gateway: Arc<dyn LayoutGateway>,
        host: HostTx,
    ) -> Result<Self> {
        let store = LayoutStore::load(records)?;
        let notifier = NotificationDispatcher::new(host);
        let geom = cfg.grid.geometry(container_width);
        debug!(
            columns = geom.columns(),
            cell_width = geom.cell_width(),
            row_height = geom.row_height(),
            "view geometry"
        );
        Ok(Self {
            store,
            edit: EditMode::new(false),
            grid: cfg.grid.clone(),
            geom,
            controller: InteractionController::new(&cfg.interaction, cfg.persistence.strategy),
            ghost: Box::new(NoopGhost),
            persistence: PersistenceGateway::new(gateway, notifier.clone()),
            notifier,
        })
    }

    /// Replace the ghost renderer.
    #[must_use]
    pub fn with_ghost(mut self, ghost: Box<dyn GhostRenderer>) -> Self {
        self.ghost = ghost;
        self
    }

    /// Authoritative widget rectangles.
    pub fn store(&self) -> &LayoutStore {
        &self.store
    }

    /// Current pixel geometry of the grid.
    pub fn geometry(&self) -> &GridGeometry {
        &self.geom
    }

    /// Gesture state of the controller.
    pub fn state(&self) -> &InteractionState {
        self.controller.state()
    }

    /// Save issuer, for sequence numbers and flushing.
    pub fn persistence(&self) -> &PersistenceGateway {
        &self.persistence
    }

    /// Shared handle to the edit-mode flag.
    ///
    /// Flipping the flag through this handle does not notify the host; use
    /// [`Self::set_edit_mode`] for that.
    pub fn edit_mode(&self) -> &EditMode {
        &self.edit
    }

    /// Enter or leave edit mode, telling the host when it changes.
    ///
    /// Leaving edit mode mid-gesture does not abort the gesture; it reverts
    /// when the pointer is released.
    pub fn set_edit_mode(&self, enabled: bool) {
        let was = self.edit.set(enabled);
        if was == enabled {
            return;
        }
        info!(enabled, active = self.controller.is_active(), "edit mode changed");
        if let Err(e) = self.notifier.send_edit_mode(enabled) {
            debug!(error = %e, "host gone; edit mode change not delivered");
        }
    }

    /// The Save action: leave edit mode and persist the whole layout.
    ///
    /// Returns the sequence number of the full save. Outside a Tokio runtime
    /// the save is reported as failed.
    pub fn save_and_exit(&self) -> u64 {
        self.set_edit_mode(false);
        self.persistence.save_full(&self.store)
    }

    /// Recompute pixel geometry for a new container width.
    ///
    /// Rectangles are in cells and do not change. An in-progress gesture
    /// uses the new cell size from its next move.
    pub fn resize_container(&mut self, container_width: f64) {
        self.geom = self.grid.geometry(container_width);
        debug!(container_width, cell_width = self.geom.cell_width(), "container resized");
    }

    /// Replace the layout with a fresh server copy.
    ///
    /// Any active gesture is dropped first. On error the old layout stays.
    pub fn reload(&mut self, records: Vec<LayoutRecord>) -> Result<()> {
        let store = LayoutStore::load(records)?;
        let (controller, mut ctx) = self.split();
        controller.abort(&mut ctx)?;
        self.store = store;
        info!(widgets = self.store.len(), "layout reloaded");
        Ok(())
    }

    /// Forward a pointer-down on `id`.
    pub fn pointer_down(
        &mut self,
        id: &WidgetId,
        kind: GestureKind,
        pos: PointerPos,
    ) -> Result<Transition> {
        let (controller, mut ctx) = self.split();
        controller.pointer_down(&mut ctx, id, kind, pos)
    }

    /// Forward a pointer-move.
    pub fn pointer_move(&mut self, pos: PointerPos) -> Transition {
        let (controller, mut ctx) = self.split();
        controller.pointer_move(&mut ctx, pos)
    }

    /// Forward a pointer-up.
    pub fn pointer_up(&mut self, pos: PointerPos) -> Result<Transition> {
        let (controller, mut ctx) = self.split();
        controller.pointer_up(&mut ctx, pos)
    }

    /// Borrow the controller and its collaborators separately.
    fn split(&mut self) -> (&mut InteractionController, GestureCtx<'_>) {
        let Self {
            store,
            edit,
            geom,
            controller,
            ghost,
            persistence,
            ..
        } = self;
        (
            controller,
            GestureCtx {
                store,
                edit,
                geom,
                ghost: &mut **ghost,
                persistence,
            },
        )
    }
}
