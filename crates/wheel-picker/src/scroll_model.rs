//! Continuous scroll position of a picker and the indices derived from it.
//!
//! [`ScrollModel`] is a cheap handle: clones share the same position. It
//! tracks three indices:
//!
//! - the current index, the position rounded to the nearest item;
//! - the target index, committed when a snap or programmatic scroll decides
//!   where the picker will come to rest;
//! - the settled index, which only moves once the position has reached the
//!   target. This is the selection the host should observe.
//!
//! A positive pixel delta scrolls toward lower indices.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use wheel_animation::{AnimationDriver, AnimationType};

use crate::error::PickerError;
use crate::index_space::IndexSpace;
use crate::item_window::VisibleWindow;
use crate::layout_info::LayoutInfo;

/// Distance in index units under which the position counts as on target.
pub const SETTLE_EPSILON: f32 = 1e-6;

/// What is currently moving the position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollPhase {
    /// Resting on the settled index.
    #[default]
    Idle,
    /// Following direct input.
    Scrolling,
    /// An animation is carrying the position to the target index.
    Settling,
}

type SettledListener = Rc<dyn Fn(usize)>;

struct ModelInner {
    space: IndexSpace,
    raw_index: Cell<f32>,
    /// Committed target as a logical index, so the settle check also works
    /// across laps with wraparound.
    target: Cell<i32>,
    settled: Cell<usize>,
    phase: Cell<ScrollPhase>,
    layout: Cell<LayoutInfo>,
    listeners: RefCell<Vec<(u64, SettledListener)>>,
    next_listener_id: Cell<u64>,
}

/// Shared scroll state of one picker.
#[derive(Clone)]
pub struct ScrollModel {
    inner: Rc<ModelInner>,
}

impl ScrollModel {
    pub fn new(space: IndexSpace, initial_index: i32) -> Self {
        let target = space.clamp_index(initial_index);
        Self {
            inner: Rc::new(ModelInner {
                space,
                raw_index: Cell::new(target as f32),
                target: Cell::new(target),
                settled: Cell::new(space.normalize(target)),
                phase: Cell::new(ScrollPhase::Idle),
                layout: Cell::new(LayoutInfo::Unmeasured),
                listeners: RefCell::new(Vec::new()),
                next_listener_id: Cell::new(1),
            }),
        }
    }

    pub fn index_space(&self) -> IndexSpace {
        self.inner.space
    }

    /// Fractional scroll position. Unbounded with wraparound.
    pub fn raw_index(&self) -> f32 {
        self.inner.raw_index.get()
    }

    pub fn current_index(&self) -> usize {
        self.inner
            .space
            .normalize(self.inner.raw_index.get().round() as i32)
    }

    pub fn target_index(&self) -> usize {
        self.inner.space.normalize(self.inner.target.get())
    }

    /// Target before normalization; differs from [`target_index`](Self::target_index)
    /// only with wraparound.
    pub fn target_logical_index(&self) -> i32 {
        self.inner.target.get()
    }

    pub fn settled_index(&self) -> usize {
        self.inner.settled.get()
    }

    pub fn phase(&self) -> ScrollPhase {
        self.inner.phase.get()
    }

    pub fn layout_info(&self) -> LayoutInfo {
        self.inner.layout.get()
    }

    /// Scrolls by a raw pixel delta from direct input.
    ///
    /// Returns the consumed pixels, which differ from `delta` when a bound is
    /// hit. Before measurement nothing is consumed.
    pub fn apply_delta(&self, delta: f32) -> f32 {
        if !self.inner.layout.get().is_measured() {
            return 0.0;
        }
        self.inner.phase.set(ScrollPhase::Scrolling);
        self.dispatch_delta(delta)
    }

    /// Moves the position without touching the phase. Animations feed their
    /// progress through here.
    pub(crate) fn dispatch_delta(&self, delta: f32) -> f32 {
        let Some(interval) = self.inner.layout.get().interval_extent() else {
            return 0.0;
        };
        let current = self.inner.raw_index.get();
        let next = self.inner.space.clamp_position(current - delta / interval);
        self.inner.raw_index.set(next);
        let consumed = -(next - current) * interval;
        log::trace!("delta {delta} moved position {current} -> {next}, consumed {consumed}");
        self.refresh_settled();
        consumed
    }

    /// Jumps to `index` without animation and settles there.
    pub fn scroll_to_index(&self, index: i32) {
        let target = self.inner.space.clamp_index(index);
        log::debug!("scroll to index {index} (target {target})");
        self.inner.raw_index.set(target as f32);
        self.inner.target.set(target);
        self.inner.phase.set(ScrollPhase::Idle);
        self.refresh_settled();
    }

    /// Animates to `index`, then snaps the position exactly onto it.
    ///
    /// Falls back to [`scroll_to_index`](Self::scroll_to_index) before the
    /// first layout. Dropping the future leaves the position where the
    /// animation stopped, with the target still committed.
    pub async fn animate_scroll_to_index<D>(
        &self,
        index: i32,
        driver: &D,
        animation: AnimationType,
    ) where
        D: AnimationDriver + ?Sized,
    {
        let Some(interval) = self.inner.layout.get().interval_extent() else {
            self.scroll_to_index(index);
            return;
        };
        let target = self.inner.space.clamp_index(index);
        self.commit_target(target);

        let scroll_amount = -(target as f32 - self.inner.raw_index.get()) * interval;
        let mut previous = 0.0f32;
        let mut on_progress = |current: f32| {
            previous += self.dispatch_delta(current - previous);
        };
        driver
            .animate_to(0.0, scroll_amount, 0.0, animation, &mut on_progress)
            .await;
        self.finish_settle();
    }

    /// Commits the index the position will come to rest on.
    pub(crate) fn commit_target(&self, target: i32) {
        let target = self.inner.space.clamp_index(target);
        if self.inner.target.get() != target {
            log::debug!(
                "target index {} -> {target} (value {})",
                self.inner.target.get(),
                self.inner.space.normalize(target)
            );
        }
        self.inner.target.set(target);
        self.inner.phase.set(ScrollPhase::Settling);
        self.refresh_settled();
    }

    /// Puts the position exactly on the committed target.
    pub(crate) fn finish_settle(&self) {
        self.inner.raw_index.set(self.inner.target.get() as f32);
        self.inner.phase.set(ScrollPhase::Idle);
        self.refresh_settled();
    }

    /// Records the measured sizes and returns the items to lay out.
    ///
    /// A zero-sized layout leaves the picker unmeasured and yields an empty
    /// window.
    pub fn on_layout(&self, item_extent: i32, gap_extent: i32) -> VisibleWindow {
        let layout = LayoutInfo::measured(item_extent, gap_extent);
        self.inner.layout.set(layout);
        if !layout.is_measured() {
            log::debug!("zero-sized layout {item_extent}+{gap_extent}; nothing to place");
            return VisibleWindow::empty(&self.inner.space);
        }
        VisibleWindow::compute(&self.inner.space, self.inner.raw_index.get())
    }

    pub fn visible_window(&self) -> Result<VisibleWindow, PickerError> {
        if !self.inner.layout.get().is_measured() {
            return Err(PickerError::NotMeasured);
        }
        Ok(VisibleWindow::compute(
            &self.inner.space,
            self.inner.raw_index.get(),
        ))
    }

    /// Pixel offset at which the item at `logical_index` is placed.
    ///
    /// The selected item sits one interval from the top, below its
    /// predecessor.
    pub fn offset_of(&self, logical_index: i32) -> Result<i32, PickerError> {
        let interval = self
            .inner
            .layout
            .get()
            .interval_extent()
            .ok_or(PickerError::NotMeasured)?;
        let offset = ((logical_index + 1) as f32 - self.inner.raw_index.get()) * interval;
        Ok(offset.round() as i32)
    }

    /// Calls `listener` whenever the settled index changes. The current
    /// value is not replayed.
    pub fn subscribe_settled(&self, listener: impl Fn(usize) + 'static) -> SettledSubscription {
        let id = self.inner.next_listener_id.get();
        self.inner.next_listener_id.set(id + 1);
        self.inner
            .listeners
            .borrow_mut()
            .push((id, Rc::new(listener)));
        SettledSubscription {
            model: Rc::downgrade(&self.inner),
            id,
        }
    }

    fn refresh_settled(&self) {
        let target = self.inner.target.get();
        if (target as f32 - self.inner.raw_index.get()).abs() >= SETTLE_EPSILON {
            return;
        }
        let settled = self.inner.space.normalize(target);
        if self.inner.settled.replace(settled) == settled {
            return;
        }
        log::debug!("settled on index {settled}");
        // Listeners may mutate the model again, so they run on a snapshot.
        let listeners: Vec<SettledListener> = self
            .inner
            .listeners
            .borrow()
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();
        for listener in listeners {
            listener(settled);
        }
    }
}

impl PartialEq for ScrollModel {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl std::fmt::Debug for ScrollModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScrollModel")
            .field("raw_index", &self.inner.raw_index.get())
            .field("target", &self.inner.target.get())
            .field("settled", &self.inner.settled.get())
            .field("phase", &self.inner.phase.get())
            .field("layout", &self.inner.layout.get())
            .finish()
    }
}

/// Keeps a settled-index listener registered; dropping it unsubscribes.
#[must_use = "dropping the subscription unsubscribes immediately"]
pub struct SettledSubscription {
    model: Weak<ModelInner>,
    id: u64,
}

impl Drop for SettledSubscription {
    fn drop(&mut self) {
        if let Some(inner) = self.model.upgrade() {
            inner
                .listeners
                .borrow_mut()
                .retain(|(id, _)| *id != self.id);
        }
    }
}

impl std::fmt::Debug for SettledSubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettledSubscription")
            .field("id", &self.id)
            .finish()
    }
}

#[cfg(test)]
#[path = "tests/scroll_model_tests.rs"]
mod tests;
