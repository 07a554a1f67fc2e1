//! Axis-aligned intersection tests over cell rectangles.
//!
//! Intersection is strict: rectangles that only share an edge do not
//! collide. Checks are linear in the number of placed widgets, which is
//! small for any one view.

use crate::Rect;

/// True when `a` and `b` share at least one cell.
#[inline]
#[must_use]
pub fn intersects(a: &Rect, b: &Rect) -> bool {
    u64::from(a.col_start) < b.col_end()
        && u64::from(b.col_start) < a.col_end()
        && u64::from(a.row_start) < b.row_end()
        && u64::from(b.row_start) < a.row_end()
}

/// First entry other than `id` whose rectangle intersects `candidate`.
pub fn first_collision<'a, K, I>(candidate: &Rect, id: &K, rects: I) -> Option<&'a K>
where
    K: PartialEq + 'a,
    I: IntoIterator<Item = (&'a K, &'a Rect)>,
{
    rects
        .into_iter()
        .find(|(other, rect)| *other != id && intersects(candidate, rect))
        .map(|(other, _)| other)
}

/// True when `candidate` would overlap any entry other than `id`.
///
/// The candidate's own entry is always skipped, since a rectangle always
/// intersects itself.
pub fn has_collision<'a, K, I>(candidate: &Rect, id: &K, rects: I) -> bool
where
    K: PartialEq + 'a,
    I: IntoIterator<Item = (&'a K, &'a Rect)>,
{
    first_collision(candidate, id, rects).is_some()
}
