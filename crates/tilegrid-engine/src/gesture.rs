//! Gesture targets and candidate-rectangle math.

use serde::{Deserialize, Serialize};
use tilegrid_geom::{Rect, offset_rect};
use tracing::debug;

/// Pointer position in container pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PointerPos {
    /// Horizontal position.
    pub x: f64,
    /// Vertical position.
    pub y: f64,
}

impl PointerPos {
    /// Construct a position.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Pixel delta from `origin` to `self`.
    pub fn delta_from(self, origin: Self) -> (f64, f64) {
        (self.x - origin.x, self.y - origin.y)
    }
}

/// Corner resize handle. The opposite corner stays fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[allow(missing_docs)]
pub enum Handle {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Handle {
    /// True when this handle drags the left edge.
    const fn moves_left(self) -> bool {
        matches!(self, Self::TopLeft | Self::BottomLeft)
    }

    /// True when this handle drags the top edge.
    const fn moves_top(self) -> bool {
        matches!(self, Self::TopLeft | Self::TopRight)
    }
}

/// What a pointer-down grabbed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GestureKind {
    /// Widget body: move without resizing.
    Drag,
    /// Corner handle: resize from that corner.
    Resize(Handle),
}

/// Candidate for a drag by `(d_col, d_row)` cells from `origin`.
pub(crate) fn drag_candidate(origin: Rect, d_col: i32, d_row: i32) -> Rect {
    offset_rect(origin, d_col, d_row)
}

/// Candidate for a corner resize by `(d_col, d_row)` cells from `origin`.
///
/// The dragged edges move; the opposite edges stay put. Spans are floored
/// at 1 no matter how far the pointer passes the fixed edge. A right edge
/// never grows past `columns`, but a widget already wider than the room
/// left keeps its span; the final clamp shifts its start instead.
pub(crate) fn resize_candidate(
    origin: Rect,
    handle: Handle,
    d_col: i32,
    d_row: i32,
    columns: u32,
) -> Rect {
    let (col_start, col_span) = if handle.moves_left() {
        move_leading_edge(origin.col_start, origin.col_span, d_col)
    } else {
        move_trailing_edge(origin.col_start, origin.col_span, d_col, Some(columns))
    };
    let (row_start, row_span) = if handle.moves_top() {
        move_leading_edge(origin.row_start, origin.row_span, d_row)
    } else {
        move_trailing_edge(origin.row_start, origin.row_span, d_row, None)
    };
    Rect {
        col_start,
        col_span,
        row_start,
        row_span,
    }
}

/// Move the start edge by `delta`, keeping the end edge fixed.
fn move_leading_edge(start: u32, span: u32, delta: i32) -> (u32, u32) {
    let last = i64::from(start) + i64::from(span) - 1;
    let wanted = i64::from(start) + i64::from(delta);
    let new_start = wanted.clamp(1, last.max(1));
    if new_start != wanted {
        debug!(wanted, new_start, "resize start clamped");
    }
    (to_u32(new_start), to_u32(last - new_start + 1))
}

/// Move the end edge by `delta`, keeping the start edge fixed.
fn move_trailing_edge(start: u32, span: u32, delta: i32, limit: Option<u32>) -> (u32, u32) {
    let wanted = i64::from(span) + i64::from(delta);
    let mut new_span = wanted.max(1);
    if let Some(limit) = limit {
        let room = i64::from(limit) - i64::from(start) + 1;
        new_span = new_span.min(room.max(i64::from(span)));
    }
    if new_span != wanted {
        debug!(wanted, new_span, "resize span clamped");
    }
    (start, to_u32(new_span))
}

/// Narrow a value already known to be `>= 1`.
fn to_u32(v: i64) -> u32 {
    u32::try_from(v).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    const W1: Rect = Rect::new(1, 4, 1, 3);

    #[test]
    fn drag_shifts_start_only() {
        assert_eq!(drag_candidate(W1, 2, 0), Rect::new(3, 4, 1, 3));
        assert_eq!(drag_candidate(W1, -3, -3), W1);
    }

    #[test]
    fn bottom_right_grows_spans() {
        assert_eq!(
            resize_candidate(W1, Handle::BottomRight, 1, 1, 20),
            Rect::new(1, 5, 1, 4)
        );
    }

    #[test]
    fn bottom_right_floors_span_at_one() {
        assert_eq!(
            resize_candidate(W1, Handle::BottomRight, -10, -10, 20),
            Rect::new(1, 1, 1, 1)
        );
    }

    #[test]
    fn bottom_right_stops_at_last_column() {
        let r = Rect::new(17, 2, 1, 1);
        assert_eq!(
            resize_candidate(r, Handle::BottomRight, 10, 0, 20),
            Rect::new(17, 4, 1, 1)
        );
    }

    #[test]
    fn bottom_right_never_shrinks_an_overhanging_widget() {
        let r = Rect::new(19, 4, 1, 3);
        assert_eq!(resize_candidate(r, Handle::BottomRight, 0, 0, 20), r);
        assert_eq!(resize_candidate(r, Handle::BottomRight, 3, 1, 20), Rect::new(19, 4, 1, 4));
        // Shrinking still works.
        assert_eq!(
            resize_candidate(r, Handle::BottomRight, -2, 0, 20),
            Rect::new(19, 2, 1, 3)
        );
    }

    #[test]
    fn top_left_keeps_bottom_right_corner() {
        let r = Rect::new(5, 4, 5, 3);
        // Grow up-left by 2.
        assert_eq!(
            resize_candidate(r, Handle::TopLeft, -2, -2, 20),
            Rect::new(3, 6, 3, 5)
        );
        // Drag far past the opposite corner: collapses to one cell at it.
        assert_eq!(
            resize_candidate(r, Handle::TopLeft, 50, 50, 20),
            Rect::new(8, 1, 7, 1)
        );
        // Drag past the grid origin: start pinned at 1.
        assert_eq!(
            resize_candidate(r, Handle::TopLeft, -50, -50, 20),
            Rect::new(1, 8, 1, 7)
        );
    }

    #[test]
    fn mixed_corners() {
        let r = Rect::new(5, 4, 5, 3);
        assert_eq!(
            resize_candidate(r, Handle::TopRight, 1, -1, 20),
            Rect::new(5, 5, 4, 4)
        );
        assert_eq!(
            resize_candidate(r, Handle::BottomLeft, -1, 2, 20),
            Rect::new(4, 5, 5, 5)
        );
    }

    #[test]
    fn pointer_delta() {
        let d = PointerPos::new(130.0, 40.0).delta_from(PointerPos::new(30.0, 50.0));
        assert_eq!(d, (100.0, -10.0));
    }
}
