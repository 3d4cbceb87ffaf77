//! Items a picker must materialize for a scroll position.
//!
//! The window covers the selected item and one neighbor on each side, plus
//! one more while the position is between two items. With wraparound on a
//! list shorter than the window, the same value would be needed twice at
//! once, so such lists expose `2 * N` synthetic slots to the renderer and
//! each slot resolves back to a value through [`IndexSpace::resolve_slot`].

use smallvec::SmallVec;

use crate::index_space::IndexSpace;

/// One item of the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibleItem {
    /// Unbounded position in the scroll space.
    pub logical_index: i32,
    /// Renderer item this logical index maps to.
    pub slot: usize,
    /// Index into the value list.
    pub value_index: usize,
}

/// Result of a layout pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibleWindow {
    items: SmallVec<[VisibleItem; 4]>,
    slot_count: usize,
}

impl VisibleWindow {
    pub fn compute(space: &IndexSpace, raw_index: f32) -> Self {
        let lower = space.clamp_index((raw_index - 1.0).floor() as i32);
        let upper = space.clamp_index((raw_index + 1.0).ceil() as i32);
        let items = (lower..=upper)
            .map(|logical_index| {
                let slot = space.slot_of(logical_index);
                VisibleItem {
                    logical_index,
                    slot,
                    value_index: space.resolve_slot(slot),
                }
            })
            .collect();
        Self {
            items,
            slot_count: space.slot_count(),
        }
    }

    /// A window with nothing to place, for layouts that cannot position items.
    pub(crate) fn empty(space: &IndexSpace) -> Self {
        Self {
            items: SmallVec::new(),
            slot_count: space.slot_count(),
        }
    }

    pub fn items(&self) -> &[VisibleItem] {
        &self.items
    }

    pub fn logical_indices(&self) -> impl Iterator<Item = i32> + '_ {
        self.items.iter().map(|item| item.logical_index)
    }

    /// Number of items the renderer should be able to provide.
    pub fn slot_count(&self) -> usize {
        self.slot_count
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
