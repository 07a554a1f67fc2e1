//! Pointer gesture state machine.
//!
//! ```text
//! Idle --down--> Armed --move--> Dragging | Resizing --up--> Idle
//!                  |                                  (commit or revert)
//!                  +----up----> Idle (released, nothing saved)
//! ```
//!
//! The controller is the only writer of authoritative rectangles. Every
//! call returns a [`Transition`] describing what happened, including the
//! calls that did nothing and why.

use std::mem;

use config::{InteractionCfg, SaveStrategy};
use tilegrid_geom::{
    Axis, GridGeometry, Rect, Rounding, cell_box, clamp_rect, first_collision, pixel_to_cell,
};
use tilegrid_ids::WidgetId;
use tracing::{debug, info, trace, warn};

use crate::{
    EditMode, GhostFrame, GhostRenderer, LayoutStore, PersistenceGateway, Result,
    gesture::{GestureKind, Handle, PointerPos, drag_candidate, resize_candidate},
};

/// Coarse controller phase, used in [`Transition`] records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum Phase {
    Idle,
    Armed,
    Dragging,
    Resizing,
}

/// Full controller state.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum InteractionState {
    /// No gesture. The only state that accepts a pointer-down.
    #[default]
    Idle,
    /// Pointer is down on a widget but has not moved far enough yet.
    Armed {
        /// Target widget.
        id: WidgetId,
        /// Body or handle that was grabbed.
        kind: GestureKind,
        /// Pointer position at pointer-down.
        origin: PointerPos,
        /// Pre-gesture rectangle.
        rollback: Rect,
    },
    /// Moving a widget.
    Dragging {
        /// Target widget.
        id: WidgetId,
        /// Pointer position at pointer-down.
        origin: PointerPos,
        /// Pre-gesture rectangle.
        rollback: Rect,
        /// Latest clamped candidate.
        candidate: Rect,
    },
    /// Resizing a widget from a corner.
    Resizing {
        /// Target widget.
        id: WidgetId,
        /// Corner being dragged.
        handle: Handle,
        /// Pointer position at pointer-down.
        origin: PointerPos,
        /// Pre-gesture rectangle.
        rollback: Rect,
        /// Latest clamped candidate.
        candidate: Rect,
    },
}

impl InteractionState {
    /// Coarse phase of this state.
    pub fn phase(&self) -> Phase {
        match self {
            Self::Idle => Phase::Idle,
            Self::Armed { .. } => Phase::Armed,
            Self::Dragging { .. } => Phase::Dragging,
            Self::Resizing { .. } => Phase::Resizing,
        }
    }

    /// Widget targeted by the active gesture, if any.
    pub fn widget(&self) -> Option<&WidgetId> {
        match self {
            Self::Idle => None,
            Self::Armed { id, .. } | Self::Dragging { id, .. } | Self::Resizing { id, .. } => {
                Some(id)
            }
        }
    }

    /// Latest candidate rectangle while dragging or resizing.
    pub fn candidate(&self) -> Option<Rect> {
        match self {
            Self::Dragging { candidate, .. } | Self::Resizing { candidate, .. } => Some(*candidate),
            _ => None,
        }
    }
}

/// Why a gesture ended without committing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RevertReason {
    /// The candidate overlapped another widget.
    Collision {
        /// First widget found in the way.
        with: WidgetId,
    },
    /// Edit mode was switched off while the pointer was down.
    EditModeExited,
}

/// Why a controller call changed nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoopReason {
    /// Pointer-down while the layout is not editable.
    EditModeOff,
    /// Pointer-down while another gesture is active.
    GestureInProgress,
    /// Move or release with no gesture active.
    NoActiveGesture,
    /// Move that has not yet cleared the drag threshold.
    BelowThreshold,
}

/// Observable result of one controller step.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// A gesture started and the pre-gesture rectangle was captured.
    Armed {
        /// Target widget.
        id: WidgetId,
        /// Body or handle that was grabbed.
        kind: GestureKind,
        /// Snapshot used if the gesture reverts.
        rollback: Rect,
    },
    /// The candidate moved; only the ghost changed.
    Moved {
        /// Target widget.
        id: WidgetId,
        /// New candidate.
        candidate: Rect,
    },
    /// The candidate became authoritative.
    Committed {
        /// Target widget.
        id: WidgetId,
        /// Committed rectangle.
        rect: Rect,
        /// Sequence number of the save this commit issued, when saving incrementally.
        save_seq: Option<u64>,
    },
    /// The widget went back to its pre-gesture rectangle.
    Reverted {
        /// Target widget.
        id: WidgetId,
        /// Restored rectangle.
        rect: Rect,
        /// What stopped the commit.
        reason: RevertReason,
    },
    /// Pointer released before the gesture moved.
    Released {
        /// Target widget.
        id: WidgetId,
    },
    /// Nothing happened.
    Noop {
        /// Why.
        reason: NoopReason,
    },
}

/// One step of the state machine.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    /// Monotonic step number, starting at 1.
    pub id: u64,
    /// Phase before the step.
    pub from: Phase,
    /// Phase after the step.
    pub to: Phase,
    /// What the step did.
    pub effect: Effect,
}

/// Collaborators a gesture step reads from and writes to.
pub struct GestureCtx<'a> {
    /// Authoritative rectangles.
    pub store: &'a mut LayoutStore,
    /// Shared edit-mode flag.
    pub edit: &'a EditMode,
    /// Current pixel geometry.
    pub geom: &'a GridGeometry,
    /// Visual feedback sink.
    pub ghost: &'a mut dyn GhostRenderer,
    /// Save issuer.
    pub persistence: &'a PersistenceGateway,
}

/// Drives one widget gesture at a time from pointer events.
#[derive(Debug)]
pub struct InteractionController {
    /// Current state.
    state: InteractionState,
    /// Pixel travel needed before an armed gesture starts.
    drag_threshold_px: f64,
    /// Pixel to cell snapping rule.
    rounding: Rounding,
    /// Whether commits save immediately.
    strategy: SaveStrategy,
    /// Last issued transition id.
    transitions: u64,
}

impl InteractionController {
    /// Idle controller with the given tuning.
    pub fn new(cfg: &InteractionCfg, strategy: SaveStrategy) -> Self {
        Self {
            state: InteractionState::Idle,
            drag_threshold_px: cfg.drag_threshold_px.max(0.0),
            rounding: cfg.rounding,
            strategy,
            transitions: 0,
        }
    }

    /// Current state.
    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    /// True while a gesture is armed or moving.
    pub fn is_active(&self) -> bool {
        self.state != InteractionState::Idle
    }

    /// Pointer pressed on widget `id`'s body or one of its handles.
    ///
    /// Ignored while edit mode is off or another gesture is active. Fails
    /// only for an id that is not in the store.
    pub fn pointer_down(
        &mut self,
        ctx: &mut GestureCtx<'_>,
        id: &WidgetId,
        kind: GestureKind,
        pos: PointerPos,
    ) -> Result<Transition> {
        let from = self.state.phase();
        if from != Phase::Idle {
            debug!(id = %id, active = ?self.state.widget(), "pointer_down ignored: gesture in progress");
            return Ok(self.noop(NoopReason::GestureInProgress));
        }
        if !ctx.edit.is_enabled() {
            debug!(id = %id, "pointer_down ignored: edit mode off");
            return Ok(self.noop(NoopReason::EditModeOff));
        }
        let rollback = ctx.store.snapshot(id)?;
        debug!(id = %id, kind = ?kind, rollback = ?rollback, "gesture armed");
        self.state = InteractionState::Armed {
            id: id.clone(),
            kind,
            origin: pos,
            rollback,
        };
        Ok(self.step(
            from,
            Effect::Armed {
                id: id.clone(),
                kind,
                rollback,
            },
        ))
    }

    /// Pointer moved to `pos`.
    ///
    /// Recomputes the candidate from the total delta since pointer-down and
    /// updates the ghost. Never touches the store.
    pub fn pointer_move(&mut self, ctx: &mut GestureCtx<'_>, pos: PointerPos) -> Transition {
        let from = self.state.phase();
        let Some((id, kind, origin, rollback)) = self.gesture() else {
            return self.noop(NoopReason::NoActiveGesture);
        };
        let (dx, dy) = pos.delta_from(origin);
        trace!(id = %id, dx, dy, "pointer_move");
        if from == Phase::Armed && dx.abs().max(dy.abs()) < self.drag_threshold_px {
            return self.noop(NoopReason::BelowThreshold);
        }
        let candidate = self.candidate(kind, rollback, dx, dy, ctx.geom);
        let pixels = match kind {
            GestureKind::Drag => cell_box(rollback, ctx.geom).translate(dx, dy),
            GestureKind::Resize(_) => cell_box(candidate, ctx.geom),
        };
        ctx.ghost.show(
            &id,
            &GhostFrame {
                cells: candidate,
                pixels,
            },
        );
        if self.state.candidate() != Some(candidate) {
            debug!(id = %id, candidate = ?candidate, "candidate");
        }
        self.state = match kind {
            GestureKind::Drag => InteractionState::Dragging {
                id: id.clone(),
                origin,
                rollback,
                candidate,
            },
            GestureKind::Resize(handle) => InteractionState::Resizing {
                id: id.clone(),
                handle,
                origin,
                rollback,
                candidate,
            },
        };
        self.step(from, Effect::Moved { id, candidate })
    }

    /// Pointer released at `pos`: commit, revert, or release.
    ///
    /// Always ends in `Idle`. The candidate is recomputed from `pos` so the
    /// release point is what gets committed.
    pub fn pointer_up(&mut self, ctx: &mut GestureCtx<'_>, pos: PointerPos) -> Result<Transition> {
        let from = self.state.phase();
        let Some((id, kind, origin, rollback)) = self.gesture() else {
            return Ok(self.noop(NoopReason::NoActiveGesture));
        };
        self.state = InteractionState::Idle;
        ctx.ghost.clear(&id);

        if from == Phase::Armed {
            let rect = ctx.store.rollback(&id)?;
            ctx.ghost.place(&id, rect);
            debug!(id = %id, "gesture released without moving");
            return Ok(self.step(from, Effect::Released { id }));
        }

        let (dx, dy) = pos.delta_from(origin);
        let candidate = self.candidate(kind, rollback, dx, dy, ctx.geom);

        if !ctx.edit.is_enabled() {
            let rect = ctx.store.rollback(&id)?;
            ctx.ghost.place(&id, rect);
            warn!(id = %id, rect = ?rect, "edit mode exited mid-gesture; reverted");
            return Ok(self.step(
                from,
                Effect::Reverted {
                    id,
                    rect,
                    reason: RevertReason::EditModeExited,
                },
            ));
        }

        let blocker = first_collision(&candidate, &id, ctx.store.iter()).cloned();
        if let Some(with) = blocker {
            let rect = ctx.store.rollback(&id)?;
            ctx.ghost.place(&id, rect);
            debug!(id = %id, with = %with, candidate = ?candidate, "collision; reverted");
            return Ok(self.step(
                from,
                Effect::Reverted {
                    id,
                    rect,
                    reason: RevertReason::Collision { with },
                },
            ));
        }

        ctx.store.commit(&id, candidate)?;
        ctx.store.clear_rollback(&id);
        ctx.ghost.place(&id, candidate);
        let save_seq = match self.strategy {
            SaveStrategy::Incremental => Some(ctx.persistence.save_one(&id, candidate)),
            SaveStrategy::Batched => None,
        };
        info!(id = %id, rect = ?candidate, save_seq = ?save_seq, "gesture committed");
        Ok(self.step(
            from,
            Effect::Committed {
                id,
                rect: candidate,
                save_seq,
            },
        ))
    }

    /// Target, kind, origin and rollback of the active gesture.
    fn gesture(&self) -> Option<(WidgetId, GestureKind, PointerPos, Rect)> {
        match &self.state {
            InteractionState::Idle => None,
            InteractionState::Armed {
                id,
                kind,
                origin,
                rollback,
            } => Some((id.clone(), *kind, *origin, *rollback)),
            InteractionState::Dragging {
                id,
                origin,
                rollback,
                ..
            } => Some((id.clone(), GestureKind::Drag, *origin, *rollback)),
            InteractionState::Resizing {
                id,
                handle,
                origin,
                rollback,
                ..
            } => Some((id.clone(), GestureKind::Resize(*handle), *origin, *rollback)),
        }
    }

    /// Clamped candidate for a pixel delta from the gesture origin.
    fn candidate(
        &self,
        kind: GestureKind,
        rollback: Rect,
        dx: f64,
        dy: f64,
        geom: &GridGeometry,
    ) -> Rect {
        let d_col = pixel_to_cell(dx, Axis::Horizontal, geom, self.rounding);
        let d_row = pixel_to_cell(dy, Axis::Vertical, geom, self.rounding);
        let raw = match kind {
            GestureKind::Drag => drag_candidate(rollback, d_col, d_row),
            GestureKind::Resize(handle) => {
                resize_candidate(rollback, handle, d_col, d_row, geom.columns())
            }
        };
        clamp_rect(raw, geom)
    }

    /// Record a step that changed nothing.
    fn noop(&mut self, reason: NoopReason) -> Transition {
        let phase = self.state.phase();
        self.step(phase, Effect::Noop { reason })
    }

    /// Stamp a transition from `from` to the current phase.
    fn step(&mut self, from: Phase, effect: Effect) -> Transition {
        self.transitions += 1;
        let t = Transition {
            id: self.transitions,
            from,
            to: self.state.phase(),
            effect,
        };
        if from != t.to {
            debug!(step = t.id, from = ?t.from, to = ?t.to, "transition");
        }
        t
    }

    /// Drop any active gesture, restoring its widget.
    ///
    /// Used when the view is torn down or reloaded underneath a gesture.
    pub(crate) fn abort(&mut self, ctx: &mut GestureCtx<'_>) -> Result<Option<Transition>> {
        let from = self.state.phase();
        let Some(id) = mem::take(&mut self.state).widget().cloned() else {
            return Ok(None);
        };
        ctx.ghost.clear(&id);
        let rect = ctx.store.rollback(&id)?;
        ctx.ghost.place(&id, rect);
        debug!(id = %id, "gesture aborted");
        Ok(Some(self.step(from, Effect::Released { id })))
    }
}
