//! Adapter from drag gestures to the scroll model.
//!
//! Drag moves go straight to [`ScrollModel::apply_delta`]; the release
//! launches a [`SnapFlingBehavior`] as a UI task. Starting a new drag cancels
//! a running fling at its current position.

use std::rc::Rc;

use web_time::Instant;
use wheel_animation::AnimationDriver;
use wheel_runtime::{RuntimeHandle, TaskHandle};

use crate::defaults::FlingConfig;
use crate::fling_behavior::SnapFlingBehavior;
use crate::scroll_model::ScrollModel;
use crate::velocity_tracker::VelocityTracker;

pub struct DragMediator<D> {
    model: ScrollModel,
    fling: Rc<SnapFlingBehavior<D>>,
    runtime: RuntimeHandle,
    tracker: VelocityTracker,
    max_velocity: f32,
    /// Pointer position along the drag, the sum of all moves.
    position: f32,
    started_at: Option<Instant>,
    fling_task: Option<TaskHandle>,
    enabled: bool,
}

impl<D: AnimationDriver + 'static> DragMediator<D> {
    pub fn new(model: ScrollModel, driver: D, config: &FlingConfig, runtime: RuntimeHandle) -> Self {
        Self {
            fling: Rc::new(SnapFlingBehavior::new(model.clone(), driver, config)),
            model,
            runtime,
            tracker: VelocityTracker::new(),
            max_velocity: config.max_velocity,
            position: 0.0,
            started_at: None,
            fling_task: None,
            enabled: true,
        }
    }

    pub fn model(&self) -> &ScrollModel {
        &self.model
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// A disabled picker ignores gestures; programmatic scrolls still work.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.started_at = None;
            self.tracker.reset();
        }
    }

    pub fn is_flinging(&self) -> bool {
        self.fling_task
            .as_ref()
            .is_some_and(|task| task.is_active())
    }

    /// Stops a running fling where it is.
    pub fn cancel_fling(&mut self) {
        if let Some(task) = self.fling_task.take() {
            if task.is_active() {
                log::debug!("fling interrupted at {}", self.model.raw_index());
            }
            task.cancel();
        }
    }

    pub fn on_drag_start(&mut self) {
        if !self.enabled {
            return;
        }
        self.cancel_fling();
        self.tracker.reset();
        self.position = 0.0;
        self.started_at = Some(Instant::now());
    }

    /// Applies a drag move, timestamped with the wall clock.
    pub fn on_drag(&mut self, delta: f32) -> f32 {
        let time_ms = self
            .started_at
            .map_or(0, |start| start.elapsed().as_millis() as i64);
        self.on_drag_at(time_ms, delta)
    }

    /// Applies a drag move that happened `time_ms` after the drag started.
    /// Returns the consumed pixels.
    pub fn on_drag_at(&mut self, time_ms: i64, delta: f32) -> f32 {
        if !self.enabled {
            return 0.0;
        }
        self.position += delta;
        self.tracker.add_position(time_ms, self.position);
        self.model.apply_delta(delta)
    }

    /// Releases the drag with the tracked velocity.
    pub fn on_drag_end(&mut self) {
        if !self.enabled {
            return;
        }
        let velocity = self.tracker.velocity_with_max(self.max_velocity);
        self.tracker.reset();
        self.started_at = None;
        self.fling_with_velocity(velocity);
    }

    /// Launches the snap fling for a release at `velocity` px/s.
    pub fn fling_with_velocity(&mut self, velocity: f32) {
        self.cancel_fling();
        log::debug!(
            "release at {} with {velocity}px/s",
            self.model.raw_index()
        );
        let fling = Rc::clone(&self.fling);
        self.fling_task = self.runtime.spawn_ui(async move {
            fling.perform_fling(velocity).await;
        });
        if self.fling_task.is_none() {
            log::warn!("runtime gone; releasing without a fling");
        }
    }
}

impl<D> Drop for DragMediator<D> {
    fn drop(&mut self) {
        if let Some(task) = self.fling_task.take() {
            task.cancel();
        }
    }
}

impl<D> std::fmt::Debug for DragMediator<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DragMediator")
            .field("model", &self.model)
            .field("enabled", &self.enabled)
            .field("position", &self.position)
            .field("flinging", &self.fling_task.is_some())
            .finish()
    }
}

#[cfg(test)]
#[path = "tests/drag_mediator_tests.rs"]
mod tests;
