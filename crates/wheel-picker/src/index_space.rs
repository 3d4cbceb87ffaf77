//! Index rules of a picker's value list.
//!
//! Every clamp and modulo in the crate goes through [`IndexSpace`].

use crate::error::PickerError;

/// Wrapping lists shorter than this render through `2 * size` synthetic
/// slots, so no value is needed by two slots at once.
const MIN_DISTINCT_WRAP_SIZE: i32 = 4;

/// Index constraints for a list of `size` values, optionally scrolling forever.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexSpace {
    size: i32,
    wraparound: bool,
}

impl IndexSpace {
    /// A single value cannot wrap onto itself, so wraparound is dropped for
    /// `size == 1`.
    pub fn new(size: usize, wraparound: bool) -> Result<Self, PickerError> {
        if size == 0 {
            return Err(PickerError::EmptyValues);
        }
        let size = i32::try_from(size).unwrap_or(i32::MAX);
        Ok(Self {
            size,
            wraparound: wraparound && size > 1,
        })
    }

    pub fn size(&self) -> usize {
        self.size as usize
    }

    pub fn is_wraparound(&self) -> bool {
        self.wraparound
    }

    /// Whether any scrolling is possible at all.
    pub fn is_scrollable(&self) -> bool {
        self.size > 1
    }

    /// Maps a logical index onto a value index in `[0, size)`.
    pub fn normalize(&self, index: i32) -> usize {
        if self.wraparound {
            index.rem_euclid(self.size) as usize
        } else {
            index.clamp(0, self.size - 1) as usize
        }
    }

    /// Identity with wraparound, `[0, size - 1]` otherwise.
    pub fn clamp_index(&self, index: i32) -> i32 {
        if self.wraparound {
            index
        } else {
            index.clamp(0, self.size - 1)
        }
    }

    fn uses_synthetic_slots(&self) -> bool {
        self.wraparound && self.size < MIN_DISTINCT_WRAP_SIZE
    }

    /// Number of items the renderer must be able to provide.
    pub fn slot_count(&self) -> usize {
        if self.uses_synthetic_slots() {
            self.size() * 2
        } else {
            self.size()
        }
    }

    /// Renderer slot showing the item at `logical_index`.
    pub fn slot_of(&self, logical_index: i32) -> usize {
        if self.uses_synthetic_slots() {
            logical_index.rem_euclid(self.size * 2) as usize
        } else {
            self.normalize(logical_index)
        }
    }

    /// Value index shown by a renderer slot.
    pub fn resolve_slot(&self, slot: usize) -> usize {
        self.normalize(i32::try_from(slot).unwrap_or(i32::MAX))
    }

    /// [`clamp_index`](Self::clamp_index) for fractional positions.
    pub fn clamp_position(&self, position: f32) -> f32 {
        if self.wraparound {
            position
        } else {
            position.clamp(0.0, (self.size - 1) as f32)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_wraps_negative_indices() {
        for size in 1..=7usize {
            let space = IndexSpace::new(size, true).unwrap();
            for index in -50..50 {
                let normalized = space.normalize(index);
                assert!(normalized < size, "{index} -> {normalized} for size {size}");
            }
        }

        let space = IndexSpace::new(3, true).unwrap();
        assert_eq!(space.normalize(-9), 0);
        assert_eq!(space.normalize(-1), 2);
        assert_eq!(space.normalize(4), 1);
    }

    #[test]
    fn bounded_space_clamps() {
        let space = IndexSpace::new(21, false).unwrap();
        assert_eq!(space.normalize(-3), 0);
        assert_eq!(space.normalize(30), 20);
        assert_eq!(space.clamp_index(25), 20);
        assert_eq!(space.clamp_position(-0.5), 0.0);
        assert_eq!(space.clamp_position(20.5), 20.0);
        assert_eq!(space.clamp_position(7.25), 7.25);
    }

    #[test]
    fn wraparound_leaves_logical_indices_alone() {
        let space = IndexSpace::new(5, true).unwrap();
        assert_eq!(space.clamp_index(-12), -12);
        assert_eq!(space.clamp_position(42.5), 42.5);
    }

    #[test]
    fn single_value_never_wraps() {
        let space = IndexSpace::new(1, true).unwrap();
        assert!(!space.is_wraparound());
        assert!(!space.is_scrollable());
        assert_eq!(space.clamp_position(3.0), 0.0);
        assert_eq!(space.normalize(-4), 0);
    }

    #[test]
    fn short_wrapping_list_doubles_its_slots() {
        let space = IndexSpace::new(3, true).unwrap();
        assert_eq!(space.slot_count(), 6);
        assert_eq!(space.slot_of(-1), 5);
        assert_eq!(space.slot_of(4), 4);
        assert_eq!(space.resolve_slot(4), 1);
        assert_eq!(space.resolve_slot(space.slot_of(-1)), space.normalize(-1));

        let long = IndexSpace::new(5, true).unwrap();
        assert_eq!(long.slot_count(), 5);
        assert_eq!(long.slot_of(-1), 4);

        let bounded = IndexSpace::new(3, false).unwrap();
        assert_eq!(bounded.slot_count(), 3);
        assert_eq!(bounded.slot_of(7), 2);
    }

    #[test]
    fn empty_list_is_rejected() {
        assert_eq!(IndexSpace::new(0, false), Err(PickerError::EmptyValues));
    }
}
