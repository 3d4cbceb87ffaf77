//! Fling decay.
//!
//! Spline-based deceleration with the Android `Scroller` constants, the same
//! curve Compose's `rememberSplineBasedDecay()` produces. All offsets are
//! relative to where the fling started and carry the sign of the velocity.

use std::sync::LazyLock;

const INFLECTION: f32 = 0.35;
const START_TENSION: f32 = 0.5;
const END_TENSION: f32 = 1.0;
const P1: f32 = START_TENSION * INFLECTION;
const P2: f32 = 1.0 - END_TENSION * (1.0 - INFLECTION);

const NB_SAMPLES: usize = 100;

/// Distance coefficients of the fling spline at `NB_SAMPLES + 1` evenly spaced times.
static SPLINE_POSITIONS: LazyLock<[f32; NB_SAMPLES + 1]> = LazyLock::new(|| {
    let mut positions = [0.0f32; NB_SAMPLES + 1];
    // Successive alphas are increasing, so each bisection starts where the
    // previous one ended.
    let mut lower = 0.0f32;
    for (i, slot) in positions.iter_mut().take(NB_SAMPLES).enumerate() {
        let alpha = i as f32 / NB_SAMPLES as f32;
        let (x, coef) = bisect_bezier(alpha, &mut lower);
        *slot = coef * ((1.0 - x) * START_TENSION + x) + x * x * x;
    }
    positions[NB_SAMPLES] = 1.0;
    positions
});

/// Finds `x` in `[lower, 1]` with `bezier(x) == alpha`; returns `x` and `3x(1-x)`.
fn bisect_bezier(alpha: f32, lower: &mut f32) -> (f32, f32) {
    let mut upper = 1.0f32;
    loop {
        let x = *lower + (upper - *lower) / 2.0;
        let coef = 3.0 * x * (1.0 - x);
        let tx = coef * ((1.0 - x) * P1 + x * P2) + x * x * x;
        if (tx - alpha).abs() < 1e-5 {
            return (x, coef);
        }
        if tx > alpha {
            upper = x;
        } else {
            *lower = x;
        }
    }
}

/// Sample of the fling spline.
#[derive(Debug, Clone, Copy)]
pub struct FlingResult {
    /// Fraction of the total distance covered, in `[0, 1]`.
    pub distance_coefficient: f32,
    /// Derivative of the distance coefficient with respect to normalized time.
    pub velocity_coefficient: f32,
}

/// The Android fling spline.
#[derive(Debug, Clone, Copy)]
pub struct AndroidFlingSpline;

impl AndroidFlingSpline {
    /// Samples the spline at normalized time `time` in `[0, 1]`.
    pub fn fling_position(time: f32) -> FlingResult {
        let time = time.clamp(0.0, 1.0);
        let index = (NB_SAMPLES as f32 * time) as usize;
        if index >= NB_SAMPLES {
            return FlingResult {
                distance_coefficient: 1.0,
                velocity_coefficient: 0.0,
            };
        }
        let t_inf = index as f32 / NB_SAMPLES as f32;
        let t_sup = (index + 1) as f32 / NB_SAMPLES as f32;
        let d_inf = SPLINE_POSITIONS[index];
        let d_sup = SPLINE_POSITIONS[index + 1];
        let slope = (d_sup - d_inf) / (t_sup - t_inf);
        FlingResult {
            distance_coefficient: d_inf + (time - t_inf) * slope,
            velocity_coefficient: slope,
        }
    }

    pub fn deceleration(velocity: f32, friction: f32) -> f64 {
        (INFLECTION as f64 * velocity.abs() as f64 / friction as f64).ln()
    }
}

const GRAVITY_EARTH: f32 = 9.80665;
const INCHES_PER_METER: f32 = 39.37;
/// `ln(0.78) / ln(0.9)`
const DECELERATION_RATE: f32 = 2.358_201_6;

/// Deceleration in px/s² for a surface with the given friction and density.
fn compute_deceleration(friction: f32, density: f32) -> f32 {
    GRAVITY_EARTH * INCHES_PER_METER * density * 160.0 * friction
}

/// Distance and duration of one fling.
#[derive(Debug, Clone, Copy)]
pub struct FlingInfo {
    pub initial_velocity: f32,
    /// Unsigned total distance.
    pub distance: f32,
    pub duration_millis: i64,
}

impl FlingInfo {
    fn normalized_time(&self, time_millis: i64) -> f32 {
        if self.duration_millis > 0 {
            time_millis as f32 / self.duration_millis as f32
        } else {
            1.0
        }
    }

    /// Signed offset traveled after `time_millis`.
    pub fn position(&self, time_millis: i64) -> f32 {
        let sample = AndroidFlingSpline::fling_position(self.normalized_time(time_millis));
        self.distance * self.initial_velocity.signum() * sample.distance_coefficient
    }

    /// Signed velocity in px/s after `time_millis`.
    pub fn velocity(&self, time_millis: i64) -> f32 {
        if self.duration_millis <= 0 {
            return 0.0;
        }
        let sample = AndroidFlingSpline::fling_position(self.normalized_time(time_millis));
        sample.velocity_coefficient * self.initial_velocity.signum() * self.distance
            / self.duration_millis as f32
            * 1000.0
    }

    pub fn is_finished(&self, time_millis: i64) -> bool {
        time_millis >= self.duration_millis
    }
}

/// Physical fling model parameterized by friction and screen density.
#[derive(Debug, Clone, Copy)]
pub struct FlingCalculator {
    friction: f32,
    magic_physical_coefficient: f32,
}

impl FlingCalculator {
    /// `ViewConfiguration.getScrollFriction()`
    pub const DEFAULT_FRICTION: f32 = 0.015;

    pub fn new(friction: f32, density: f32) -> Self {
        Self {
            friction,
            magic_physical_coefficient: compute_deceleration(0.84, density),
        }
    }

    pub fn with_density(density: f32) -> Self {
        Self::new(Self::DEFAULT_FRICTION, density)
    }

    fn spline_deceleration(&self, velocity: f32) -> f64 {
        AndroidFlingSpline::deceleration(velocity, self.friction * self.magic_physical_coefficient)
    }

    pub fn fling_duration_millis(&self, velocity: f32) -> i64 {
        if velocity == 0.0 {
            return 0;
        }
        let l = self.spline_deceleration(velocity);
        (1000.0 * (l / (DECELERATION_RATE as f64 - 1.0)).exp()) as i64
    }

    /// Unsigned distance a fling at `velocity` travels before resting.
    pub fn fling_distance(&self, velocity: f32) -> f32 {
        if velocity == 0.0 {
            return 0.0;
        }
        let l = self.spline_deceleration(velocity);
        let exponent = DECELERATION_RATE as f64 / (DECELERATION_RATE as f64 - 1.0) * l;
        self.friction * self.magic_physical_coefficient * exponent.exp() as f32
    }

    pub fn fling_info(&self, velocity: f32) -> FlingInfo {
        FlingInfo {
            initial_velocity: velocity,
            distance: self.fling_distance(velocity),
            duration_millis: self.fling_duration_millis(velocity),
        }
    }
}

/// A decay: motion with an initial velocity and no target, slowing to rest.
pub trait DecaySpec {
    /// Signed offset traveled after `play_time_nanos`.
    fn offset_at(&self, play_time_nanos: u64, initial_velocity: f32) -> f32;

    /// Signed velocity in units per second after `play_time_nanos`.
    fn velocity_at(&self, play_time_nanos: u64, initial_velocity: f32) -> f32;

    fn duration_nanos(&self, initial_velocity: f32) -> u64;

    /// Signed offset at which the decay comes to rest.
    fn target_offset(&self, initial_velocity: f32) -> f32;
}

/// Spline decay matching Android flings.
#[derive(Debug, Clone, Copy)]
pub struct SplineBasedDecaySpec {
    calculator: FlingCalculator,
}

impl SplineBasedDecaySpec {
    pub fn new(density: f32) -> Self {
        Self {
            calculator: FlingCalculator::with_density(density),
        }
    }

    pub fn with_calculator(calculator: FlingCalculator) -> Self {
        Self { calculator }
    }
}

impl Default for SplineBasedDecaySpec {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl DecaySpec for SplineBasedDecaySpec {
    fn offset_at(&self, play_time_nanos: u64, initial_velocity: f32) -> f32 {
        let time_millis = (play_time_nanos / 1_000_000) as i64;
        self.calculator
            .fling_info(initial_velocity)
            .position(time_millis)
    }

    fn velocity_at(&self, play_time_nanos: u64, initial_velocity: f32) -> f32 {
        let time_millis = (play_time_nanos / 1_000_000) as i64;
        self.calculator
            .fling_info(initial_velocity)
            .velocity(time_millis)
    }

    fn duration_nanos(&self, initial_velocity: f32) -> u64 {
        self.calculator
            .fling_duration_millis(initial_velocity)
            .max(0) as u64
            * 1_000_000
    }

    fn target_offset(&self, initial_velocity: f32) -> f32 {
        self.calculator.fling_distance(initial_velocity) * initial_velocity.signum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spline_starts_at_zero_and_ends_at_one() {
        let start = AndroidFlingSpline::fling_position(0.0);
        assert!(start.distance_coefficient.abs() < 0.01);

        let end = AndroidFlingSpline::fling_position(1.0);
        assert!((end.distance_coefficient - 1.0).abs() < 0.01);
    }

    #[test]
    fn spline_is_monotonic() {
        let mut previous = 0.0;
        for i in 0..=100 {
            let sample = AndroidFlingSpline::fling_position(i as f32 / 100.0);
            assert!(
                sample.distance_coefficient >= previous,
                "spline decreased at step {i}"
            );
            previous = sample.distance_coefficient;
        }
    }

    #[test]
    fn faster_flings_travel_further_and_longer() {
        let calc = FlingCalculator::with_density(2.0);
        let slow = calc.fling_info(2_000.0);
        let fast = calc.fling_info(6_000.0);

        assert!(slow.distance > 0.0);
        assert!(slow.duration_millis > 0);
        assert!(fast.distance > slow.distance);
        assert!(fast.duration_millis > slow.duration_millis);
    }

    #[test]
    fn decay_ends_at_its_target_offset() {
        let spec = SplineBasedDecaySpec::new(2.0);
        let velocity = -5_000.0;

        assert!(spec.offset_at(0, velocity).abs() < 1.0);

        let target = spec.target_offset(velocity);
        assert!(target < 0.0, "offset follows the velocity sign");
        let end = spec.offset_at(spec.duration_nanos(velocity), velocity);
        assert!(
            (end - target).abs() < 10.0,
            "end offset {end} should be near target {target}"
        );
    }

    #[test]
    fn zero_velocity_does_not_move() {
        let spec = SplineBasedDecaySpec::default();
        assert_eq!(spec.target_offset(0.0), 0.0);
        assert_eq!(spec.duration_nanos(0.0), 0);
    }
}
