//! Scroll and snap state machine of a wheel picker.
//!
//! A wheel picker shows a selected value with one neighbor above and below
//! it. Dragging scrolls continuously, a release snaps onto exactly one item,
//! and with wraparound the list repeats forever.
//!
//! - [`IndexSpace`] holds the clamp and wrap rules.
//! - [`ScrollModel`] owns the fractional position and the current, target
//!   and settled indices.
//! - [`SnapPlanner`] decides where a release comes to rest.
//! - [`VisibleWindow`] lists the items to lay out for a position.
//!
//! [`SnapFlingBehavior`] and [`DragMediator`] connect gestures to the model
//! through a [`wheel_animation::AnimationDriver`]; [`PickerHost`] binds the
//! settled index to a host-owned selection.

mod defaults;
mod drag_mediator;
mod error;
mod fling_behavior;
mod host;
mod index_space;
mod item_window;
mod layout_info;
mod picker_state;
mod saver;
mod scroll_model;
mod snap_planner;
mod velocity_tracker;

pub use defaults::{FlingConfig, PickerDefaults};
pub use drag_mediator::DragMediator;
pub use error::PickerError;
pub use fling_behavior::SnapFlingBehavior;
pub use host::PickerHost;
pub use index_space::IndexSpace;
pub use item_window::{VisibleItem, VisibleWindow};
pub use layout_info::LayoutInfo;
pub use picker_state::PickerState;
pub use saver::PickerSaver;
pub use scroll_model::{ScrollModel, ScrollPhase, SettledSubscription, SETTLE_EPSILON};
pub use snap_planner::{AtMost, SnapDistance, SnapPlanner, Unlimited};
pub use velocity_tracker::VelocityTracker;
