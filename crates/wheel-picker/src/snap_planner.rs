//! Snap targets for the end of a gesture.
//!
//! A fling runs in two phases. The approach phase decays the position to
//! one item short of the target; it only runs when the fling travels more
//! than one interval. The snap phase then springs onto the target. The
//! planner commits each target on the model and returns pixel distances for
//! the animation driver; it never moves the position itself.

use std::fmt;
use std::rc::Rc;

use crate::scroll_model::ScrollModel;

/// Limits how far a fling may travel.
pub trait SnapDistance: fmt::Debug {
    /// Picks the final target given the item the fling starts from and the
    /// target suggested by the decay. `velocity` is in px/s.
    fn calculate_target_index(&self, start_index: i32, suggested_target: i32, velocity: f32)
        -> i32;
}

/// Lets the decay decide.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Unlimited;

impl SnapDistance for Unlimited {
    fn calculate_target_index(&self, _start_index: i32, suggested_target: i32, _velocity: f32) -> i32 {
        suggested_target
    }
}

/// Travels at most this many items from the start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AtMost(pub u32);

impl SnapDistance for AtMost {
    fn calculate_target_index(&self, start_index: i32, suggested_target: i32, _velocity: f32) -> i32 {
        let reach = i32::try_from(self.0).unwrap_or(i32::MAX);
        suggested_target.clamp(
            start_index.saturating_sub(reach),
            start_index.saturating_add(reach),
        )
    }
}

/// Computes snap targets and distances for one picker.
#[derive(Debug, Clone)]
pub struct SnapPlanner {
    model: ScrollModel,
    velocity_threshold: f32,
    snap_distance: Rc<dyn SnapDistance>,
}

impl SnapPlanner {
    pub fn new(model: ScrollModel, velocity_threshold: f32) -> Self {
        Self::with_snap_distance(model, velocity_threshold, Rc::new(Unlimited))
    }

    pub fn with_snap_distance(
        model: ScrollModel,
        velocity_threshold: f32,
        snap_distance: Rc<dyn SnapDistance>,
    ) -> Self {
        Self {
            model,
            velocity_threshold: velocity_threshold.abs(),
            snap_distance,
        }
    }

    pub fn model(&self) -> &ScrollModel {
        &self.model
    }

    pub fn velocity_threshold(&self) -> f32 {
        self.velocity_threshold
    }

    /// Commits the snap target and returns the pixel distance to it.
    ///
    /// Slow releases snap to the nearest item; faster ones to the next item
    /// in the direction of travel. Returns `0.0` before measurement.
    pub fn calculate_snap_offset(&self, velocity: f32) -> f32 {
        let Some(interval) = self.model.layout_info().interval_extent() else {
            return 0.0;
        };
        let raw = self.model.raw_index();
        let target = if velocity.abs() < self.velocity_threshold {
            raw.round()
        } else if velocity > 0.0 {
            raw.floor()
        } else {
            raw.ceil()
        } as i32;
        let target = self.model.index_space().clamp_index(target);

        self.model.commit_target(target);
        let offset = -(target as f32 - raw) * interval;
        log::debug!("snap from {raw} to {target} at velocity {velocity}: {offset}px");
        offset
    }

    /// Pixel distance to the already committed target.
    ///
    /// Used for the snap phase after an approach: the approach ends exactly
    /// one item short, where `floor`/`ceil` would not move on.
    pub fn committed_target_offset(&self) -> f32 {
        let Some(interval) = self.model.layout_info().interval_extent() else {
            return 0.0;
        };
        -(self.model.target_logical_index() as f32 - self.model.raw_index()) * interval
    }

    /// Commits the approach target and returns the distance the approach
    /// phase should travel, or `0.0` when the snap phase alone is enough.
    ///
    /// `decay_offset` is the distance a free decay at `velocity` would cover.
    /// With wraparound the approach never travels more than one lap.
    pub fn calculate_approach_offset(&self, velocity: f32, decay_offset: f32) -> f32 {
        let Some(interval) = self.model.layout_info().interval_extent() else {
            return 0.0;
        };
        let space = self.model.index_space();
        let raw = self.model.raw_index();
        let start = if velocity > 0.0 { raw.ceil() } else { raw.floor() } as i32;

        let mut index_offset = (decay_offset / interval) as i32;
        if space.is_wraparound() {
            let lap = i32::try_from(space.size()).unwrap_or(i32::MAX);
            index_offset = index_offset.clamp(-lap, lap);
        }
        let suggested = space.clamp_index(start.saturating_sub(index_offset));
        let target = space.clamp_index(self.snap_distance.calculate_target_index(
            start,
            suggested,
            velocity,
        ));

        let decay_items = (target - start).abs().saturating_sub(1);
        if decay_items <= 0 {
            return 0.0;
        }
        self.model.commit_target(target);
        let offset = decay_items as f32 * interval * velocity.signum();
        log::debug!(
            "approach from {raw} towards {target}: {decay_items} items, {offset}px (decay {decay_offset}px)"
        );
        offset
    }
}

#[cfg(test)]
#[path = "tests/snap_planner_tests.rs"]
mod tests;
