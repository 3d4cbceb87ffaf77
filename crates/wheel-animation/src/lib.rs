//! Animations for the wheel picker.
//!
//! - [`AnimationType`] describes a targeted animation (easing tween or spring).
//! - [`SplineBasedDecaySpec`] describes a fling that decelerates to rest.
//! - [`AnimationDriver`] is the narrow interface the picker consumes; it emits
//!   successive progress values and completes with the final value and
//!   velocity. [`FrameAnimationDriver`] implements it on top of the
//!   `wheel-runtime` frame clock.

mod animation;
mod decay_spec;
mod driver;

pub use animation::{
    AnimationFrame, AnimationSpec, AnimationType, Easing, SpringSpec, TargetAnimation,
};
pub use decay_spec::{
    AndroidFlingSpline, DecaySpec, FlingCalculator, FlingInfo, FlingResult, SplineBasedDecaySpec,
};
pub use driver::{AnimationDriver, AnimationEnd, AnimationFuture, FrameAnimationDriver};
