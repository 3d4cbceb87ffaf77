//! Targeted animations: easing tweens and springs.
//!
//! A [`TargetAnimation`] moves a scalar from an initial value to a target
//! value. It is sampled with the play time of each frame and reports when it
//! has come to rest, so the frame loop that drives it stays trivial.

/// Easing curves, named after their Jetpack Compose counterparts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Easing {
    LinearEasing,
    EaseIn,
    EaseOut,
    EaseInOut,
    /// Material standard curve.
    FastOutSlowInEasing,
    LinearOutSlowInEasing,
    FastOutLinearEasing,
}

impl Easing {
    /// Maps a linear fraction in `[0, 1]` onto the curve.
    pub fn transform(&self, fraction: f32) -> f32 {
        match self {
            Easing::LinearEasing => fraction,
            Easing::EaseIn => cubic_bezier(0.42, 0.0, 1.0, 1.0, fraction),
            Easing::EaseOut => cubic_bezier(0.0, 0.0, 0.58, 1.0, fraction),
            Easing::EaseInOut => cubic_bezier(0.42, 0.0, 0.58, 1.0, fraction),
            Easing::FastOutSlowInEasing => cubic_bezier(0.4, 0.0, 0.2, 1.0, fraction),
            Easing::LinearOutSlowInEasing => cubic_bezier(0.0, 0.0, 0.2, 1.0, fraction),
            Easing::FastOutLinearEasing => cubic_bezier(0.4, 0.0, 1.0, 1.0, fraction),
        }
    }
}

/// Polynomial coefficients of one axis of a cubic bezier through (0,0) and (1,1).
#[derive(Clone, Copy)]
struct BezierAxis {
    a: f32,
    b: f32,
    c: f32,
}

impl BezierAxis {
    fn new(p1: f32, p2: f32) -> Self {
        let c = 3.0 * p1;
        let b = 3.0 * (p2 - p1) - c;
        Self { a: 1.0 - c - b, b, c }
    }

    fn sample(&self, t: f32) -> f32 {
        ((self.a * t + self.b) * t + self.c) * t
    }

    fn slope(&self, t: f32) -> f32 {
        (3.0 * self.a * t + 2.0 * self.b) * t + self.c
    }

    /// Finds `t` such that `sample(t) == x`.
    fn solve(&self, x: f32) -> f32 {
        let mut t = x;
        for _ in 0..8 {
            let error = self.sample(t) - x;
            if error.abs() < 1e-6 {
                return t;
            }
            let slope = self.slope(t);
            if slope.abs() < 1e-6 {
                break;
            }
            t = (t - error / slope).clamp(0.0, 1.0);
        }

        // Newton did not converge; bisect.
        let (mut lo, mut hi) = (0.0f32, 1.0f32);
        t = x;
        for _ in 0..16 {
            let error = self.sample(t) - x;
            if error.abs() < 1e-6 {
                break;
            }
            if error > 0.0 {
                hi = t;
            } else {
                lo = t;
            }
            t = 0.5 * (lo + hi);
        }
        t
    }
}

fn cubic_bezier(x1: f32, y1: f32, x2: f32, y2: f32, fraction: f32) -> f32 {
    if fraction <= 0.0 {
        return 0.0;
    }
    if fraction >= 1.0 {
        return 1.0;
    }
    let t = BezierAxis::new(x1, x2).solve(fraction);
    BezierAxis::new(y1, y2).sample(t)
}

/// Duration based animation with an easing curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationSpec {
    pub duration_millis: u64,
    pub easing: Easing,
    pub delay_millis: u64,
}

impl AnimationSpec {
    pub fn tween(duration_millis: u64, easing: Easing) -> Self {
        Self {
            duration_millis,
            easing,
            delay_millis: 0,
        }
    }

    pub fn linear(duration_millis: u64) -> Self {
        Self::tween(duration_millis, Easing::LinearEasing)
    }

    pub fn with_delay(mut self, delay_millis: u64) -> Self {
        self.delay_millis = delay_millis;
        self
    }
}

impl Default for AnimationSpec {
    fn default() -> Self {
        Self::tween(300, Easing::FastOutSlowInEasing)
    }
}

/// Spring stiffness presets, matching `Spring.Stiffness*` in Compose.
const STIFFNESS_HIGH: f32 = 10_000.0;
const STIFFNESS_MEDIUM: f32 = 1_500.0;
const STIFFNESS_MEDIUM_LOW: f32 = 400.0;
const STIFFNESS_MIN: f32 = 0.1;

/// Largest integration step; longer frames are subdivided.
const MAX_STEP_SECS: f32 = 0.004;

/// A spring at rest moves less than its visibility threshold per 60 FPS frame.
const REST_VELOCITY_FACTOR: f32 = 60.0;

/// Damped spring configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringSpec {
    /// 1.0 is critically damped, below 1.0 bounces, above 1.0 is sluggish.
    pub damping_ratio: f32,
    pub stiffness: f32,
    /// Distance from the target, in value units, that is visually at rest.
    pub visibility_threshold: f32,
}

impl SpringSpec {
    pub fn default_spring() -> Self {
        Self {
            damping_ratio: 1.0,
            stiffness: STIFFNESS_MEDIUM,
            visibility_threshold: 0.01,
        }
    }

    /// Softer spring used to snap a picker onto its target item.
    pub fn medium_low() -> Self {
        Self {
            damping_ratio: 1.0,
            stiffness: STIFFNESS_MEDIUM_LOW,
            visibility_threshold: 0.01,
        }
    }

    pub fn bouncy() -> Self {
        Self {
            damping_ratio: 0.5,
            ..Self::default_spring()
        }
    }

    pub fn stiff() -> Self {
        Self {
            stiffness: STIFFNESS_HIGH,
            ..Self::default_spring()
        }
    }

    pub fn with_visibility_threshold(mut self, threshold: f32) -> Self {
        self.visibility_threshold = threshold.abs();
        self
    }

    fn is_at_rest(&self, displacement: f32, velocity: f32) -> bool {
        displacement.abs() < self.visibility_threshold
            && velocity.abs() < self.visibility_threshold * REST_VELOCITY_FACTOR
    }
}

impl Default for SpringSpec {
    fn default() -> Self {
        Self::default_spring()
    }
}

/// Which targeted animation to run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnimationType {
    Tween(AnimationSpec),
    Spring(SpringSpec),
}

impl Default for AnimationType {
    fn default() -> Self {
        AnimationType::Spring(SpringSpec::default())
    }
}

/// Sample of a running animation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationFrame {
    pub value: f32,
    /// Units per second.
    pub velocity: f32,
    pub finished: bool,
}

/// A scalar animation from an initial value towards a fixed target.
#[derive(Debug, Clone)]
pub struct TargetAnimation {
    initial_value: f32,
    target_value: f32,
    animation: AnimationType,
    value: f32,
    velocity: f32,
    last_play_time_nanos: u64,
    finished: bool,
}

impl TargetAnimation {
    pub fn new(
        initial_value: f32,
        target_value: f32,
        initial_velocity: f32,
        animation: AnimationType,
    ) -> Self {
        let finished = match animation {
            AnimationType::Tween(_) => initial_value == target_value,
            AnimationType::Spring(spec) => {
                spec.is_at_rest(initial_value - target_value, initial_velocity)
            }
        };
        Self {
            initial_value,
            target_value,
            animation,
            value: if finished { target_value } else { initial_value },
            velocity: if finished { 0.0 } else { initial_velocity },
            last_play_time_nanos: 0,
            finished,
        }
    }

    pub fn target_value(&self) -> f32 {
        self.target_value
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn current(&self) -> AnimationFrame {
        AnimationFrame {
            value: self.value,
            velocity: self.velocity,
            finished: self.finished,
        }
    }

    /// Advances the animation to `play_time_nanos` since its start.
    ///
    /// Play times must be non-decreasing. A finished animation keeps
    /// returning its target.
    pub fn advance(&mut self, play_time_nanos: u64) -> AnimationFrame {
        if self.finished {
            return self.current();
        }
        match self.animation {
            AnimationType::Tween(spec) => self.advance_tween(spec, play_time_nanos),
            AnimationType::Spring(spec) => self.advance_spring(spec, play_time_nanos),
        }
        self.last_play_time_nanos = play_time_nanos.max(self.last_play_time_nanos);
        self.current()
    }

    fn advance_tween(&mut self, spec: AnimationSpec, play_time_nanos: u64) {
        let delay_nanos = spec.delay_millis * 1_000_000;
        if play_time_nanos < delay_nanos {
            return;
        }
        let duration_nanos = (spec.duration_millis * 1_000_000).max(1);
        let elapsed = play_time_nanos - delay_nanos;
        let linear = (elapsed as f32 / duration_nanos as f32).clamp(0.0, 1.0);
        let previous = self.value;
        let dt = (play_time_nanos.saturating_sub(self.last_play_time_nanos)) as f32 / 1e9;

        if linear >= 1.0 {
            self.value = self.target_value;
            self.velocity = 0.0;
            self.finished = true;
            return;
        }

        let progress = spec.easing.transform(linear);
        self.value = self.initial_value + (self.target_value - self.initial_value) * progress;
        self.velocity = if dt > 0.0 {
            (self.value - previous) / dt
        } else {
            0.0
        };
    }

    fn advance_spring(&mut self, spec: SpringSpec, play_time_nanos: u64) {
        let total = play_time_nanos.saturating_sub(self.last_play_time_nanos) as f32 / 1e9;
        let stiffness = spec.stiffness.max(STIFFNESS_MIN);
        let damping = 2.0 * spec.damping_ratio * stiffness.sqrt();

        // Semi-implicit Euler on the displacement from the target.
        let mut displacement = self.value - self.target_value;
        let mut velocity = self.velocity;
        let mut elapsed = 0.0f32;
        while elapsed < total {
            let step = MAX_STEP_SECS.min(total - elapsed);
            let acceleration = -stiffness * displacement - damping * velocity;
            velocity += acceleration * step;
            displacement += velocity * step;
            elapsed += step;
        }

        if spec.is_at_rest(displacement, velocity) {
            self.value = self.target_value;
            self.velocity = 0.0;
            self.finished = true;
        } else {
            self.value = self.target_value + displacement;
            self.velocity = velocity;
        }
    }
}

#[cfg(test)]
#[path = "tests/animation_tests.rs"]
mod tests;
