//! Grid geometry primitives for the tilegrid layout editor.
//!
//! Everything here is pure: cell rectangles, pixel/cell conversion and
//! clamping ([`space`]), and axis-aligned intersection tests ([`collision`]).
//! Stateful pieces live in `tilegrid-engine`.
#![warn(missing_docs)]

pub mod collision;
mod rect;
pub mod space;


pub use collision::{first_collision, has_collision, intersects};
pub use rect::Rect;
pub use space::{
    Axis, GridGeometry, PixelBox, Rounding, cell_box, clamp_rect, offset_rect, pixel_to_cell,
};
