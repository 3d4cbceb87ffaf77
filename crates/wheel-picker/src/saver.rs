use std::rc::Rc;

use crate::error::PickerError;
use crate::picker_state::PickerState;

/// Saves and restores a picker across host recreation.
///
/// Only the settled index is kept; a picker restored mid-fling comes back at
/// the item it last rested on.
#[derive(Debug, Clone, Copy, Default)]
pub struct PickerSaver;

impl PickerSaver {
    pub fn save<T>(state: &PickerState<T>) -> usize {
        state.settled_index()
    }

    pub fn restore<T>(
        values: Rc<[T]>,
        wraparound: bool,
        saved: usize,
    ) -> Result<PickerState<T>, PickerError> {
        let index = i32::try_from(saved).unwrap_or(i32::MAX);
        PickerState::new(values, index, wraparound)
    }
}
