//! Authoritative widget rectangles for one view.

use std::collections::{HashMap, hash_map::Entry};

use tilegrid_geom::{Rect, intersects};
use tilegrid_ids::WidgetId;
use tilegrid_protocol::LayoutRecord;
use tracing::{debug, warn};

use crate::{Error, Result};

/// In-memory map of widget id to rectangle, plus per-widget rollback slots.
///
/// The store does not check collisions itself; callers (the interaction
/// controller) guarantee that committed rectangles do not overlap.
/// Mutation is crate-private so that only the controller can change the
/// authoritative layout.
#[derive(Debug, Clone, Default)]
pub struct LayoutStore {
    /// Ids in load order, used for payloads and deterministic iteration.
    order: Vec<WidgetId>,
    /// Current rectangle per widget.
    rects: HashMap<WidgetId, Rect>,
    /// Pre-gesture rectangle, present only while a gesture is in flight.
    rollback: HashMap<WidgetId, Rect>,
}

impl LayoutStore {
    /// Build a store from the server-provided layout.
    ///
    /// Rectangles are sanitized (every field floored at 1). Duplicate ids
    /// are rejected. Overlapping widgets are accepted as given but logged,
    /// since the server layout is the source of truth at load time.
    pub fn load<I>(records: I) -> Result<Self>
    where
        I: IntoIterator<Item = LayoutRecord>,
    {
        let mut store = Self::default();
        for LayoutRecord { id, rect } in records {
            let clean = rect.sanitized();
            if clean != rect {
                debug!(id = %id, raw = ?rect, rect = ?clean, "sanitized loaded rect");
            }
            match store.rects.entry(id.clone()) {
                Entry::Occupied(_) => return Err(Error::DuplicateWidget(id)),
                Entry::Vacant(slot) => {
                    slot.insert(clean);
                }
            }
            store.order.push(id);
        }
        for (a, b) in store.overlapping_pairs() {
            warn!(a = %a, b = %b, "loaded layout contains overlapping widgets");
        }
        debug!(widgets = store.len(), "layout loaded");
        Ok(store)
    }

    /// Number of widgets.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// True when the view has no widgets.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// True when `id` belongs to this layout.
    pub fn contains(&self, id: &WidgetId) -> bool {
        self.rects.contains_key(id)
    }

    /// Current rectangle for `id`.
    pub fn get(&self, id: &WidgetId) -> Result<Rect> {
        self.rects
            .get(id)
            .copied()
            .ok_or_else(|| Error::UnknownWidget(id.clone()))
    }

    /// Read-only view of every rectangle.
    pub fn all(&self) -> &HashMap<WidgetId, Rect> {
        &self.rects
    }

    /// Iterate widgets in load order.
    pub fn iter(&self) -> impl Iterator<Item = (&WidgetId, &Rect)> + '_ {
        self.order
            .iter()
            .filter_map(|id| self.rects.get(id).map(|r| (id, r)))
    }

    /// Wire records in load order, as sent by a full save.
    pub fn records(&self) -> Vec<LayoutRecord> {
        self.iter()
            .map(|(id, rect)| LayoutRecord::new(id.clone(), *rect))
            .collect()
    }

    /// Saved pre-gesture rectangle for `id`, if a gesture holds one.
    pub fn rollback_slot(&self, id: &WidgetId) -> Option<Rect> {
        self.rollback.get(id).copied()
    }

    /// Every pair of widgets whose rectangles intersect, in load order.
    pub fn overlapping_pairs(&self) -> Vec<(WidgetId, WidgetId)> {
        let entries: Vec<(&WidgetId, &Rect)> = self.iter().collect();
        let mut out = Vec::new();
        for (i, (a, ra)) in entries.iter().enumerate() {
            for (b, rb) in &entries[i + 1..] {
                if intersects(ra, rb) {
                    out.push(((*a).clone(), (*b).clone()));
                }
            }
        }
        out
    }

    /// Replace the rectangle for `id`.
    pub(crate) fn commit(&mut self, id: &WidgetId, rect: Rect) -> Result<()> {
        let slot = self
            .rects
            .get_mut(id)
            .ok_or_else(|| Error::UnknownWidget(id.clone()))?;
        *slot = rect;
        Ok(())
    }

    /// Save the current rectangle of `id` into its rollback slot.
    pub(crate) fn snapshot(&mut self, id: &WidgetId) -> Result<Rect> {
        let rect = self.get(id)?;
        self.rollback.insert(id.clone(), rect);
        Ok(rect)
    }

    /// Restore `id` from its rollback slot and clear the slot.
    ///
    /// Without a snapshot the current rectangle is left alone. Returns the
    /// rectangle now in force.
    pub(crate) fn rollback(&mut self, id: &WidgetId) -> Result<Rect> {
        let current = self.get(id)?;
        match self.rollback.remove(id) {
            Some(saved) => {
                self.rects.insert(id.clone(), saved);
                Ok(saved)
            }
            None => Ok(current),
        }
    }

    /// Drop the rollback slot for `id` without restoring it.
    pub(crate) fn clear_rollback(&mut self, id: &WidgetId) {
        self.rollback.remove(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(id: u64, rect: Rect) -> LayoutRecord {
        LayoutRecord::new(WidgetId::Int(id), rect)
    }

    fn sample() -> LayoutStore {
        LayoutStore::load(vec![
            rec(1, Rect::new(1, 4, 1, 3)),
            rec(2, Rect::new(5, 4, 1, 3)),
        ])
        .unwrap()
    }

    #[test]
    fn load_keeps_order_and_sanitizes() {
        let s = LayoutStore::load(vec![
            rec(9, Rect::new(0, 0, 2, 1)),
            rec(3, Rect::new(4, 1, 1, 1)),
        ])
        .unwrap();
        assert_eq!(s.len(), 2);
        let ids: Vec<_> = s.iter().map(|(id, _)| id.clone()).collect();
        assert_eq!(ids, vec![WidgetId::Int(9), WidgetId::Int(3)]);
        assert_eq!(s.get(&WidgetId::Int(9)).unwrap(), Rect::new(1, 1, 2, 1));
    }

    #[test]
    fn load_sanitizes_negative_wire_fields() {
        let recs = tilegrid_protocol::codec::decode_layout(
            r#"[{"widgetId":7,"colStart":-2,"colSpan":3,"rowStart":-1,"rowSpan":-5}]"#,
        )
        .unwrap();
        let s = LayoutStore::load(recs).unwrap();
        assert_eq!(s.get(&WidgetId::Int(7)).unwrap(), Rect::new(1, 3, 1, 1));
    }

    #[test]
    fn load_rejects_duplicates() {
        let err = LayoutStore::load(vec![
            rec(1, Rect::new(1, 1, 1, 1)),
            rec(1, Rect::new(3, 1, 1, 1)),
        ])
        .unwrap_err();
        assert!(matches!(err, Error::DuplicateWidget(WidgetId::Int(1))));
    }

    #[test]
    fn load_accepts_overlap_but_reports_it() {
        let s = LayoutStore::load(vec![
            rec(1, Rect::new(1, 4, 1, 3)),
            rec(2, Rect::new(3, 4, 1, 3)),
            rec(3, Rect::new(10, 1, 1, 1)),
        ])
        .unwrap();
        assert_eq!(
            s.overlapping_pairs(),
            vec![(WidgetId::Int(1), WidgetId::Int(2))]
        );
        assert!(sample().overlapping_pairs().is_empty());
    }

    #[test]
    fn unknown_id_is_error() {
        let mut s = sample();
        let ghost = WidgetId::name("nope");
        assert!(matches!(s.get(&ghost), Err(Error::UnknownWidget(_))));
        assert!(s.commit(&ghost, Rect::new(1, 1, 1, 1)).is_err());
        assert!(s.snapshot(&ghost).is_err());
        assert!(!s.contains(&ghost));
    }

    #[test]
    fn snapshot_then_rollback_restores() {
        let mut s = sample();
        let id = WidgetId::Int(1);
        assert_eq!(s.snapshot(&id).unwrap(), Rect::new(1, 4, 1, 3));
        s.commit(&id, Rect::new(9, 4, 1, 3)).unwrap();
        assert_eq!(s.rollback_slot(&id), Some(Rect::new(1, 4, 1, 3)));
        assert_eq!(s.rollback(&id).unwrap(), Rect::new(1, 4, 1, 3));
        assert_eq!(s.get(&id).unwrap(), Rect::new(1, 4, 1, 3));
        assert_eq!(s.rollback_slot(&id), None);
    }

    #[test]
    fn rollback_without_snapshot_is_noop() {
        let mut s = sample();
        let id = WidgetId::Int(2);
        assert_eq!(s.rollback(&id).unwrap(), Rect::new(5, 4, 1, 3));
    }

    #[test]
    fn commit_same_rect_twice_is_stable() {
        let mut s = sample();
        let id = WidgetId::Int(1);
        s.commit(&id, Rect::new(1, 4, 5, 3)).unwrap();
        let once = s.records();
        s.commit(&id, Rect::new(1, 4, 5, 3)).unwrap();
        assert_eq!(s.records(), once);
    }

    #[test]
    fn clear_rollback_discards_snapshot() {
        let mut s = sample();
        let id = WidgetId::Int(1);
        s.snapshot(&id).unwrap();
        s.commit(&id, Rect::new(1, 4, 7, 3)).unwrap();
        s.clear_rollback(&id);
        assert_eq!(s.rollback(&id).unwrap(), Rect::new(1, 4, 7, 3));
    }
}
