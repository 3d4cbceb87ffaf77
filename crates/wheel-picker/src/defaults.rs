//! Default sizes and fling tuning.
//!
//! Sizes are in logical pixels; multiply by the display density for
//! physical pixels.

use std::rc::Rc;

use wheel_animation::{AnimationType, SpringSpec};

use crate::snap_planner::{SnapDistance, Unlimited};

/// Default values used by pickers.
#[derive(Debug, Clone, Copy)]
pub struct PickerDefaults;

impl PickerDefaults {
    pub const ITEM_EXTENT: f32 = 48.0;
    pub const ITEM_WIDTH: f32 = 80.0;
    pub const DIVIDER_EXTENT: f32 = 2.0;
    /// Release speed, in logical px/s, above which a release counts as a fling.
    pub const VELOCITY_THRESHOLD: f32 = 200.0;
    /// Matches Android's `ViewConfiguration` maximum fling velocity.
    pub const MAX_FLING_VELOCITY: f32 = 8_000.0;
    /// Visible items: the selection and one neighbor on each side.
    pub const VISIBLE_ITEMS: i32 = 3;

    /// Spring of the final snap, at rest within one pixel.
    pub fn snap_spring() -> SpringSpec {
        SpringSpec::medium_low().with_visibility_threshold(1.0)
    }

    /// Animation for programmatic animated scrolls.
    pub fn scroll_animation() -> AnimationType {
        AnimationType::Spring(SpringSpec::default_spring())
    }

    /// Total extent of the picker for the given item and divider extents.
    pub fn picker_extent(item_extent: i32, divider_extent: i32) -> i32 {
        item_extent * Self::VISIBLE_ITEMS + divider_extent * (Self::VISIBLE_ITEMS - 1)
    }

    /// Item extent that fits a picker of `picker_extent` pixels.
    pub fn item_extent_for(picker_extent: i32, divider_extent: i32) -> i32 {
        ((picker_extent - divider_extent * (Self::VISIBLE_ITEMS - 1)) as f32
            / Self::VISIBLE_ITEMS as f32)
            .floor() as i32
    }
}

/// Tuning of the snap fling.
#[derive(Debug, Clone)]
pub struct FlingConfig {
    /// In physical px/s.
    pub velocity_threshold: f32,
    /// In physical px/s.
    pub max_velocity: f32,
    pub snap_spring: SpringSpec,
    pub snap_distance: Rc<dyn SnapDistance>,
}

impl FlingConfig {
    pub fn new(density: f32) -> Self {
        Self {
            velocity_threshold: PickerDefaults::VELOCITY_THRESHOLD * density,
            max_velocity: PickerDefaults::MAX_FLING_VELOCITY * density,
            snap_spring: PickerDefaults::snap_spring(),
            snap_distance: Rc::new(Unlimited),
        }
    }

    pub fn with_velocity_threshold(mut self, velocity_threshold: f32) -> Self {
        self.velocity_threshold = velocity_threshold.abs();
        self
    }

    pub fn with_snap_spring(mut self, snap_spring: SpringSpec) -> Self {
        self.snap_spring = snap_spring;
        self
    }

    pub fn with_snap_distance(mut self, snap_distance: impl SnapDistance + 'static) -> Self {
        self.snap_distance = Rc::new(snap_distance);
        self
    }
}

impl Default for FlingConfig {
    fn default() -> Self {
        Self::new(1.0)
    }
}
