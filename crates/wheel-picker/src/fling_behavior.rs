//! Snap fling: what happens after the pointer is released.

use wheel_animation::{AnimationDriver, AnimationType, SpringSpec};

use crate::defaults::FlingConfig;
use crate::scroll_model::ScrollModel;
use crate::snap_planner::SnapPlanner;

/// Carries a released picker onto an item.
///
/// The approach phase decays through the items a fast fling skips, the snap
/// phase springs onto the final item, and the position is then set exactly
/// on the target.
#[derive(Debug, Clone)]
pub struct SnapFlingBehavior<D> {
    planner: SnapPlanner,
    driver: D,
    snap_spring: SpringSpec,
}

impl<D: AnimationDriver> SnapFlingBehavior<D> {
    pub fn new(model: ScrollModel, driver: D, config: &FlingConfig) -> Self {
        Self {
            planner: SnapPlanner::with_snap_distance(
                model,
                config.velocity_threshold,
                config.snap_distance.clone(),
            ),
            driver,
            snap_spring: config.snap_spring,
        }
    }

    pub fn planner(&self) -> &SnapPlanner {
        &self.planner
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Runs the fling for a release at `velocity` px/s.
    ///
    /// Returns the velocity left once the picker rests. Dropping the future
    /// stops the fling where it is, with the target still committed.
    pub async fn perform_fling(&self, velocity: f32) -> f32 {
        let model = self.planner.model();
        let decay_offset = self.driver.projected_decay_offset(velocity);
        let approach = self
            .planner
            .calculate_approach_offset(velocity, decay_offset);

        let mut remaining = velocity;
        let snap = if approach != 0.0 {
            let mut previous = 0.0f32;
            let mut on_progress = |value: f32| {
                previous += model.dispatch_delta(value - previous);
            };
            let end = self
                .driver
                .decay_to(velocity, approach, &mut on_progress)
                .await;
            log::debug!(
                "approach finished at {} with {}px/s",
                model.raw_index(),
                end.velocity
            );
            remaining = end.velocity;
            self.planner.committed_target_offset()
        } else {
            self.planner.calculate_snap_offset(remaining)
        };

        if snap != 0.0 {
            let mut previous = 0.0f32;
            let mut on_progress = |value: f32| {
                previous += model.dispatch_delta(value - previous);
            };
            let end = self
                .driver
                .animate_to(
                    0.0,
                    snap,
                    remaining,
                    AnimationType::Spring(self.snap_spring),
                    &mut on_progress,
                )
                .await;
            remaining = end.velocity;
        }

        model.finish_settle();
        log::debug!(
            "fling settled on {} (remaining {remaining}px/s)",
            model.settled_index()
        );
        remaining
    }
}

#[cfg(test)]
#[path = "tests/fling_tests.rs"]
mod tests;
