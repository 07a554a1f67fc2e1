//! Pixel/cell conversion and clamping.
//!
//! Columns divide the container width evenly; rows have a fixed pixel
//! height derived from the root font size. The grid has a hard column
//! count but grows downward without limit.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::Rect;

/// Grid axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    /// Columns (x).
    Horizontal,
    /// Rows (y).
    Vertical,
}

/// Tie-breaking rule used when a pixel delta lands exactly between cells.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rounding {
    /// `2.5 -> 3`, `-2.5 -> -3`.
    #[default]
    HalfAwayFromZero,
    /// `2.5 -> 2`, `3.5 -> 4`.
    HalfToEven,
}

impl Rounding {
    /// Round `v` under this policy.
    #[inline]
    #[must_use]
    pub fn apply(self, v: f64) -> f64 {
        match self {
            Self::HalfAwayFromZero => v.round(),
            Self::HalfToEven => v.round_ties_even(),
        }
    }
}

/// Pixel dimensions of the grid for the current container size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridGeometry {
    /// Total column count (never zero).
    columns: u32,
    /// Width of one column in pixels.
    cell_width: f64,
    /// Height of one row in pixels.
    row_height: f64,
}

impl GridGeometry {
    /// Geometry for a container `container_width` pixels wide.
    #[must_use]
    pub fn new(columns: u32, container_width: f64, row_height: f64) -> Self {
        let columns = columns.max(1);
        Self {
            columns,
            cell_width: container_width.max(0.0) / f64::from(columns),
            row_height: row_height.max(0.0),
        }
    }

    /// Geometry whose row height is `row_rem` multiples of the root font size.
    #[must_use]
    pub fn from_root_font(
        columns: u32,
        container_width: f64,
        root_font_px: f64,
        row_rem: f64,
    ) -> Self {
        Self::new(columns, container_width, root_font_px * row_rem)
    }

    /// Recompute for a resized container, keeping columns and row height.
    #[must_use]
    pub fn with_container_width(self, container_width: f64) -> Self {
        Self::new(self.columns, container_width, self.row_height)
    }

    /// Total column count.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Width of one column in pixels.
    #[must_use]
    pub const fn cell_width(&self) -> f64 {
        self.cell_width
    }

    /// Height of one row in pixels.
    #[must_use]
    pub const fn row_height(&self) -> f64 {
        self.row_height
    }

    /// Pixel size of one cell along `axis`.
    #[must_use]
    pub const fn cell_size(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.cell_width,
            Axis::Vertical => self.row_height,
        }
    }
}

/// Convert a pixel delta along `axis` into a whole number of cells.
///
/// A degenerate geometry (zero-sized cells) never moves anything.
#[must_use]
pub fn pixel_to_cell(delta: f64, axis: Axis, geom: &GridGeometry, rounding: Rounding) -> i32 {
    let size = geom.cell_size(axis);
    if size <= 0.0 || !delta.is_finite() {
        return 0;
    }
    let cells = rounding.apply(delta / size);
    trace!(delta, size, cells, ?axis, "pixel_to_cell");
    // Float-to-int `as` saturates.
    cells as i32
}

/// Shift `start` by `delta` cells, flooring at 1.
#[inline]
pub(crate) fn shift_start(start: u32, delta: i32) -> u32 {
    let v = i64::from(start) + i64::from(delta);
    u32::try_from(v.max(1)).unwrap_or(u32::MAX)
}

/// Move `rect` by a cell delta without touching its spans.
///
/// Starts are floored at 1; column overflow is left to [`clamp_rect`].
#[must_use]
pub fn offset_rect(rect: Rect, d_col: i32, d_row: i32) -> Rect {
    Rect {
        col_start: shift_start(rect.col_start, d_col),
        row_start: shift_start(rect.row_start, d_row),
        ..rect
    }
}

/// Force `rect` inside the grid's column range by moving its start.
///
/// Spans are never reduced. A rectangle wider than the grid is pinned to
/// column 1. Rows are only floored at 1.
#[must_use]
pub fn clamp_rect(rect: Rect, geom: &GridGeometry) -> Rect {
    let rect = rect.sanitized();
    let columns = geom.columns();
    let col_start = if rect.col_span >= columns {
        1
    } else {
        rect.col_start.min(columns - rect.col_span + 1)
    };
    Rect { col_start, ..rect }
}

/// Absolute pixel box relative to the grid's top-left corner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PixelBox {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width.
    pub w: f64,
    /// Height.
    pub h: f64,
}

impl PixelBox {
    /// Copy shifted by `(dx, dy)` pixels.
    #[must_use]
    pub fn translate(self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..self
        }
    }
}

/// Pixel box covered by `rect` under `geom`.
#[must_use]
pub fn cell_box(rect: Rect, geom: &GridGeometry) -> PixelBox {
    let cw = geom.cell_width();
    let rh = geom.row_height();
    PixelBox {
        x: f64::from(rect.col_start.saturating_sub(1)) * cw,
        y: f64::from(rect.row_start.saturating_sub(1)) * rh,
        w: f64::from(rect.col_span) * cw,
        h: f64::from(rect.row_span) * rh,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid20() -> GridGeometry {
        GridGeometry::new(20, 1000.0, 32.0)
    }

    #[test]
    fn geometry_derives_cell_width() {
        let g = grid20();
        assert_eq!(g.cell_width(), 50.0);
        assert_eq!(g.cell_size(Axis::Vertical), 32.0);
        let g2 = g.with_container_width(2000.0);
        assert_eq!(g2.cell_width(), 100.0);
        assert_eq!(g2.row_height(), 32.0);
        assert_eq!(GridGeometry::from_root_font(12, 1200.0, 16.0, 2.5).row_height(), 40.0);
    }

    #[test]
    fn zero_columns_become_one() {
        assert_eq!(GridGeometry::new(0, 300.0, 10.0).columns(), 1);
    }

    #[test]
    fn pixel_to_cell_exact_multiples() {
        let g = grid20();
        let r = Rounding::HalfAwayFromZero;
        assert_eq!(pixel_to_cell(100.0, Axis::Horizontal, &g, r), 2);
        assert_eq!(pixel_to_cell(-100.0, Axis::Horizontal, &g, r), -2);
        assert_eq!(pixel_to_cell(64.0, Axis::Vertical, &g, r), 2);
        assert_eq!(pixel_to_cell(0.0, Axis::Vertical, &g, r), 0);
    }

    #[test]
    fn rounding_tie_fixtures() {
        let g = grid20();
        // 125px = 2.5 cells, 175px = 3.5 cells, -125px = -2.5 cells.
        let away = Rounding::HalfAwayFromZero;
        assert_eq!(pixel_to_cell(125.0, Axis::Horizontal, &g, away), 3);
        assert_eq!(pixel_to_cell(175.0, Axis::Horizontal, &g, away), 4);
        assert_eq!(pixel_to_cell(-125.0, Axis::Horizontal, &g, away), -3);
        let even = Rounding::HalfToEven;
        assert_eq!(pixel_to_cell(125.0, Axis::Horizontal, &g, even), 2);
        assert_eq!(pixel_to_cell(175.0, Axis::Horizontal, &g, even), 4);
        assert_eq!(pixel_to_cell(-125.0, Axis::Horizontal, &g, even), -2);
        // Just under half a cell never snaps.
        assert_eq!(pixel_to_cell(24.9, Axis::Horizontal, &g, away), 0);
    }

    #[test]
    fn degenerate_geometry_never_moves() {
        let g = GridGeometry::new(20, 0.0, 32.0);
        assert_eq!(
            pixel_to_cell(500.0, Axis::Horizontal, &g, Rounding::default()),
            0
        );
        assert_eq!(
            pixel_to_cell(f64::NAN, Axis::Vertical, &grid20(), Rounding::default()),
            0
        );
    }

    #[test]
    fn offset_floors_at_one() {
        let r = Rect::new(2, 3, 2, 1);
        assert_eq!(offset_rect(r, -5, -5), Rect::new(1, 3, 1, 1));
        assert_eq!(offset_rect(r, 4, 1), Rect::new(6, 3, 3, 1));
    }

    #[test]
    fn clamp_pulls_back_from_right_edge() {
        let g = grid20();
        assert_eq!(clamp_rect(Rect::new(19, 4, 1, 1), &g), Rect::new(17, 4, 1, 1));
        assert_eq!(clamp_rect(Rect::new(17, 4, 9, 1), &g), Rect::new(17, 4, 9, 1));
        assert_eq!(clamp_rect(Rect::new(5, 30, 1, 1), &g), Rect::new(1, 30, 1, 1));
        assert_eq!(clamp_rect(Rect::new(0, 0, 0, 0), &g), Rect::new(1, 1, 1, 1));
    }

    #[test]
    fn clamp_leaves_rows_unbounded() {
        let g = grid20();
        let r = Rect::new(1, 1, 5000, 3);
        assert_eq!(clamp_rect(r, &g), r);
    }

    #[test]
    fn cell_box_maps_to_pixels() {
        let g = grid20();
        let b = cell_box(Rect::new(3, 4, 2, 3), &g);
        assert_eq!(
            b,
            PixelBox {
                x: 100.0,
                y: 32.0,
                w: 200.0,
                h: 96.0
            }
        );
        assert_eq!(b.translate(10.0, -5.0).x, 110.0);
        assert_eq!(b.translate(10.0, -5.0).y, 27.0);
    }
}
