//! Visual preview surface for in-progress gestures.
//!
//! Renderers only receive placements; they never feed anything back into
//! the layout store, so the state machine runs the same with a real
//! surface, a recorder, or nothing at all.

use tilegrid_geom::{PixelBox, Rect};
use tilegrid_ids::WidgetId;

/// Preview placement for one gesture step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GhostFrame {
    /// Snapped cell rectangle the widget would occupy on release.
    pub cells: Rect,
    /// Unsnapped pixel box following the pointer.
    pub pixels: PixelBox,
}

/// Receiver of visual-only gesture feedback.
pub trait GhostRenderer {
    /// Show or move the preview for `id`.
    fn show(&mut self, id: &WidgetId, frame: &GhostFrame);
    /// Remove the preview for `id`.
    fn clear(&mut self, id: &WidgetId);
    /// Settle the widget's real visual placement at `rect`.
    fn place(&mut self, id: &WidgetId, rect: Rect);
}

/// Renderer that draws nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopGhost;

impl GhostRenderer for NoopGhost {
    fn show(&mut self, _id: &WidgetId, _frame: &GhostFrame) {}
    fn clear(&mut self, _id: &WidgetId) {}
    fn place(&mut self, _id: &WidgetId, _rect: Rect) {}
}
