//! Binding between a picker and the host that owns the selected index.
//!
//! The host passes its index and value list on every update. The picker
//! follows external index changes without animation and reports settled
//! selections made by the user back through the callback. Selections that
//! merely echo the host's own index are not reported.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::error::PickerError;
use crate::picker_state::PickerState;
use crate::scroll_model::SettledSubscription;

type IndexCallback = Rc<RefCell<Box<dyn FnMut(usize)>>>;

pub struct PickerHost<T> {
    state: PickerState<T>,
    wraparound: bool,
    latest_index: Rc<Cell<i32>>,
    on_index_change: IndexCallback,
    subscription: SettledSubscription,
}

impl<T: 'static> PickerHost<T> {
    pub fn new(
        values: Rc<[T]>,
        index: i32,
        wraparound: bool,
        on_index_change: impl FnMut(usize) + 'static,
    ) -> Result<Self, PickerError> {
        let state = PickerState::new(values, index, wraparound)?;
        let latest_index = Rc::new(Cell::new(index));
        let on_index_change: IndexCallback = Rc::new(RefCell::new(Box::new(on_index_change)));
        let subscription = forward_changes(&state, &latest_index, &on_index_change);
        Ok(Self {
            state,
            wraparound,
            latest_index,
            on_index_change,
            subscription,
        })
    }

    pub fn state(&self) -> &PickerState<T> {
        &self.state
    }

    /// Replaces the change callback; the current subscription keeps working.
    pub fn set_on_index_change(&mut self, on_index_change: impl FnMut(usize) + 'static) {
        *self.on_index_change.borrow_mut() = Box::new(on_index_change);
    }

    /// Applies the host's latest index and value list.
    ///
    /// A changed index that differs from the settled one is scrolled to
    /// without animation. A different list (by identity) replaces the state,
    /// starting at `index`. Returns `true` when that happened, so gesture
    /// adapters bound to the old model can be rebuilt.
    pub fn update(&mut self, values: &Rc<[T]>, index: i32) -> Result<bool, PickerError> {
        let recreated = !self.state.is_for(values);
        if recreated {
            log::debug!("value list replaced; recreating picker state at {index}");
            self.state = PickerState::new(Rc::clone(values), index, self.wraparound)?;
            self.subscription =
                forward_changes(&self.state, &self.latest_index, &self.on_index_change);
        }
        let index_changed = self.latest_index.replace(index) != index;

        // Repeating the same external index never moves the picker.
        let model = self.state.model();
        if (index_changed || recreated) && model.settled_index() as i64 != i64::from(index) {
            log::debug!(
                "external index {index} differs from settled {}; jumping",
                model.settled_index()
            );
            model.scroll_to_index(index);
        }
        Ok(recreated)
    }
}

fn forward_changes<T>(
    state: &PickerState<T>,
    latest_index: &Rc<Cell<i32>>,
    on_index_change: &IndexCallback,
) -> SettledSubscription {
    let latest_index = Rc::clone(latest_index);
    let on_index_change = Rc::clone(on_index_change);
    state.model().subscribe_settled(move |settled| {
        if i64::from(latest_index.get()) == settled as i64 {
            return;
        }
        match on_index_change.try_borrow_mut() {
            Ok(mut callback) => (*callback)(settled),
            Err(_) => log::warn!("index change to {settled} raised inside its own callback"),
        }
    })
}

impl<T> std::fmt::Debug for PickerHost<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PickerHost")
            .field("state", &self.state)
            .field("latest_index", &self.latest_index.get())
            .finish()
    }
}

#[cfg(test)]
#[path = "tests/host_tests.rs"]
mod tests;
