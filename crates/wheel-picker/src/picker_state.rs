use std::rc::Rc;

use crate::error::PickerError;
use crate::index_space::IndexSpace;
use crate::scroll_model::ScrollModel;

/// Values shown by a picker together with its scroll state.
///
/// The value list is compared by identity: hosts recreate the state when
/// they are handed a different list.
pub struct PickerState<T> {
    values: Rc<[T]>,
    model: ScrollModel,
}

impl<T> PickerState<T> {
    pub fn new(values: Rc<[T]>, initial_index: i32, wraparound: bool) -> Result<Self, PickerError> {
        let space = IndexSpace::new(values.len(), wraparound)?;
        log::debug!(
            "picker state over {} values (wraparound {}) at index {initial_index}",
            values.len(),
            space.is_wraparound()
        );
        Ok(Self {
            values,
            model: ScrollModel::new(space, initial_index),
        })
    }

    pub fn values(&self) -> &Rc<[T]> {
        &self.values
    }

    pub fn model(&self) -> &ScrollModel {
        &self.model
    }

    pub fn index_space(&self) -> IndexSpace {
        self.model.index_space()
    }

    /// Whether `values` is the list this state was built from.
    pub fn is_for(&self, values: &Rc<[T]>) -> bool {
        Rc::ptr_eq(&self.values, values)
    }

    /// Value at a logical index, wrapping or clamping as configured.
    pub fn value_at(&self, logical_index: i32) -> &T {
        &self.values[self.index_space().normalize(logical_index)]
    }

    /// Value rendered by a renderer slot of the visible window.
    pub fn value_for_slot(&self, slot: usize) -> &T {
        &self.values[self.index_space().resolve_slot(slot)]
    }

    pub fn current_value(&self) -> &T {
        &self.values[self.model.current_index()]
    }

    pub fn settled_value(&self) -> &T {
        &self.values[self.model.settled_index()]
    }

    pub fn settled_index(&self) -> usize {
        self.model.settled_index()
    }

    /// Offset of the item list in intervals: `1` with the first item
    /// selected, `1 - n` with the n-th. The extra interval is the neighbor
    /// shown above the selection.
    pub fn offset(&self) -> f32 {
        1.0 - self.model.raw_index()
    }
}

impl<T> Clone for PickerState<T> {
    fn clone(&self) -> Self {
        Self {
            values: Rc::clone(&self.values),
            model: self.model.clone(),
        }
    }
}

impl<T> PartialEq for PickerState<T> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.values, &other.values) && self.model == other.model
    }
}

impl<T> std::fmt::Debug for PickerState<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PickerState")
            .field("values", &self.values.len())
            .field("model", &self.model)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn letters() -> Rc<[char]> {
        Rc::from(vec!['a', 'b', 'c'])
    }

    #[test]
    fn empty_values_are_rejected() {
        let values: Rc<[u8]> = Rc::from(Vec::new());
        assert_eq!(
            PickerState::new(values, 0, false).unwrap_err(),
            PickerError::EmptyValues
        );
    }

    #[test]
    fn values_resolve_through_the_index_space() {
        let state = PickerState::new(letters(), 1, true).unwrap();
        assert_eq!(*state.value_at(-9), 'a');
        assert_eq!(*state.value_at(5), 'c');
        assert_eq!(*state.value_for_slot(4), 'b');
        assert_eq!(*state.settled_value(), 'b');

        let bounded = PickerState::new(letters(), 1, false).unwrap();
        assert_eq!(*bounded.value_at(-9), 'a');
        assert_eq!(*bounded.value_at(5), 'c');
    }

    #[test]
    fn offset_tracks_raw_position() {
        let state = PickerState::new(letters(), 0, false).unwrap();
        assert_eq!(state.offset(), 1.0);
        state.model().scroll_to_index(2);
        assert_eq!(state.offset(), -1.0);
    }

    #[test]
    fn identity_follows_the_value_list() {
        let values = letters();
        let state = PickerState::new(Rc::clone(&values), 0, false).unwrap();
        assert!(state.is_for(&values));
        assert!(!state.is_for(&letters()), "equal contents, different list");
        assert_eq!(state.clone(), state);
    }
}
