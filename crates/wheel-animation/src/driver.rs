use std::future::Future;
use std::pin::Pin;

use wheel_runtime::FrameClock;

use crate::animation::{AnimationType, SpringSpec, TargetAnimation};
use crate::decay_spec::{DecaySpec, SplineBasedDecaySpec};

/// Final state of a finished animation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationEnd {
    pub value: f32,
    /// Velocity left over when the animation stopped, in units per second.
    pub velocity: f32,
}

pub type AnimationFuture<'a> = Pin<Box<dyn Future<Output = AnimationEnd> + 'a>>;

/// Runs animations and reports their progress.
///
/// `on_progress` receives the animated value once per frame. Dropping the
/// returned future cancels the animation; no further progress is reported.
pub trait AnimationDriver {
    /// Signed offset a free decay starting at `initial_velocity` would travel.
    fn projected_decay_offset(&self, initial_velocity: f32) -> f32;

    /// Moves a value from `0.0` to `target_offset`, decaying from
    /// `initial_velocity` when the decay can reach the target and springing
    /// there otherwise.
    fn decay_to<'a>(
        &'a self,
        initial_velocity: f32,
        target_offset: f32,
        on_progress: &'a mut dyn FnMut(f32),
    ) -> AnimationFuture<'a>;

    fn animate_to<'a>(
        &'a self,
        initial_value: f32,
        target_value: f32,
        initial_velocity: f32,
        animation: AnimationType,
        on_progress: &'a mut dyn FnMut(f32),
    ) -> AnimationFuture<'a>;
}

/// [`AnimationDriver`] that advances once per frame of a [`FrameClock`].
#[derive(Debug, Clone)]
pub struct FrameAnimationDriver<D: DecaySpec = SplineBasedDecaySpec> {
    clock: FrameClock,
    decay: D,
    approach_spring: SpringSpec,
}

impl FrameAnimationDriver<SplineBasedDecaySpec> {
    pub fn new(clock: FrameClock) -> Self {
        Self::with_decay(clock, SplineBasedDecaySpec::default())
    }
}

impl<D: DecaySpec> FrameAnimationDriver<D> {
    pub fn with_decay(clock: FrameClock, decay: D) -> Self {
        Self {
            clock,
            decay,
            approach_spring: SpringSpec::medium_low().with_visibility_threshold(0.5),
        }
    }

    /// Spring used when a decay would stop short of, or overshoot away from,
    /// its target.
    pub fn with_approach_spring(mut self, spring: SpringSpec) -> Self {
        self.approach_spring = spring;
        self
    }

    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    pub fn decay(&self) -> &D {
        &self.decay
    }

    fn decay_reaches(&self, initial_velocity: f32, target_offset: f32) -> bool {
        let projected = self.decay.target_offset(initial_velocity);
        projected.signum() == target_offset.signum() && projected.abs() >= target_offset.abs()
    }
}

impl<D: DecaySpec> AnimationDriver for FrameAnimationDriver<D> {
    fn projected_decay_offset(&self, initial_velocity: f32) -> f32 {
        self.decay.target_offset(initial_velocity)
    }

    fn decay_to<'a>(
        &'a self,
        initial_velocity: f32,
        target_offset: f32,
        on_progress: &'a mut dyn FnMut(f32),
    ) -> AnimationFuture<'a> {
        if target_offset == 0.0 {
            return Box::pin(std::future::ready(AnimationEnd {
                value: 0.0,
                velocity: initial_velocity,
            }));
        }

        if !self.decay_reaches(initial_velocity, target_offset) {
            log::trace!(
                "decay from {initial_velocity} cannot reach {target_offset}; springing instead"
            );
            return self.animate_to(
                0.0,
                target_offset,
                initial_velocity,
                AnimationType::Spring(self.approach_spring),
                on_progress,
            );
        }

        Box::pin(async move {
            let duration = self.decay.duration_nanos(initial_velocity);
            let mut start = None;
            loop {
                let now = self.clock.next_frame().await;
                let play_time = now.saturating_sub(*start.get_or_insert(now));
                let offset = self.decay.offset_at(play_time, initial_velocity);
                let velocity = self.decay.velocity_at(play_time, initial_velocity);

                if offset.abs() >= target_offset.abs() {
                    on_progress(target_offset);
                    return AnimationEnd {
                        value: target_offset,
                        velocity,
                    };
                }
                on_progress(offset);
                if play_time >= duration {
                    return AnimationEnd {
                        value: offset,
                        velocity: 0.0,
                    };
                }
            }
        })
    }

    fn animate_to<'a>(
        &'a self,
        initial_value: f32,
        target_value: f32,
        initial_velocity: f32,
        animation: AnimationType,
        on_progress: &'a mut dyn FnMut(f32),
    ) -> AnimationFuture<'a> {
        Box::pin(async move {
            let mut animation =
                TargetAnimation::new(initial_value, target_value, initial_velocity, animation);
            if animation.is_finished() {
                on_progress(target_value);
                return AnimationEnd {
                    value: target_value,
                    velocity: 0.0,
                };
            }

            let mut start = None;
            loop {
                let now = self.clock.next_frame().await;
                let play_time = now.saturating_sub(*start.get_or_insert(now));
                let frame = animation.advance(play_time);
                on_progress(frame.value);
                if frame.finished {
                    return AnimationEnd {
                        value: frame.value,
                        velocity: frame.velocity,
                    };
                }
            }
        })
    }
}

#[cfg(test)]
#[path = "tests/driver_tests.rs"]
mod tests;
