//! Release velocity of a drag.
//!
//! Impulse strategy: the velocity is derived from the kinetic energy the
//! recent samples impart, which is less sensitive to a jittery last sample
//! than a linear fit.

use smallvec::SmallVec;

const HISTORY_SIZE: usize = 20;

/// Samples older than this, relative to the newest one, are ignored.
const HORIZON_MS: i64 = 100;

/// A pause this long between samples means the pointer stopped.
const ASSUME_STOPPED_MS: i64 = 40;

#[derive(Debug, Clone, Copy)]
struct Sample {
    time_ms: i64,
    position: f32,
}

/// Tracks pointer positions along the scroll axis.
#[derive(Debug, Clone, Default)]
pub struct VelocityTracker {
    samples: [Option<Sample>; HISTORY_SIZE],
    newest: usize,
}

impl VelocityTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_position(&mut self, time_ms: i64, position: f32) {
        self.newest = (self.newest + 1) % HISTORY_SIZE;
        self.samples[self.newest] = Some(Sample { time_ms, position });
    }

    pub fn reset(&mut self) {
        self.samples = [None; HISTORY_SIZE];
        self.newest = 0;
    }

    /// Samples within the horizon, newest first.
    fn recent(&self) -> SmallVec<[Sample; HISTORY_SIZE]> {
        let mut recent = SmallVec::new();
        let Some(newest) = self.samples[self.newest] else {
            return recent;
        };
        let mut later = newest;
        for step in 0..HISTORY_SIZE {
            let slot = (self.newest + HISTORY_SIZE - step) % HISTORY_SIZE;
            let Some(sample) = self.samples[slot] else {
                break;
            };
            if newest.time_ms - sample.time_ms > HORIZON_MS
                || later.time_ms - sample.time_ms > ASSUME_STOPPED_MS
            {
                break;
            }
            recent.push(sample);
            later = sample;
        }
        recent
    }

    /// Velocity in px/s; positive when positions increase.
    pub fn velocity(&self) -> f32 {
        let recent = self.recent();
        if recent.len() < 2 {
            return 0.0;
        }

        // Oldest to newest, accumulating the energy each segment imparts.
        let mut work = 0.0f32;
        let mut first_segment = true;
        for pair in recent.windows(2).rev() {
            let (later, earlier) = (pair[0], pair[1]);
            let dt = (later.time_ms - earlier.time_ms) as f32;
            if dt == 0.0 {
                continue;
            }
            let segment_velocity = (later.position - earlier.position) / dt;
            let previous_velocity = energy_to_velocity(work);
            work += (segment_velocity - previous_velocity) * segment_velocity.abs();
            if first_segment {
                work *= 0.5;
                first_segment = false;
            }
        }
        energy_to_velocity(work) * 1000.0
    }

    /// [`velocity`](Self::velocity) limited to `±max_velocity`.
    pub fn velocity_with_max(&self, max_velocity: f32) -> f32 {
        if !max_velocity.is_finite() || max_velocity <= 0.0 {
            return 0.0;
        }
        let velocity = self.velocity();
        if velocity.is_nan() {
            return 0.0;
        }
        velocity.clamp(-max_velocity, max_velocity)
    }
}

fn energy_to_velocity(energy: f32) -> f32 {
    energy.signum() * (2.0 * energy.abs()).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn needs_two_samples() {
        let mut tracker = VelocityTracker::new();
        assert_eq!(tracker.velocity(), 0.0);
        tracker.add_position(0, 10.0);
        assert_eq!(tracker.velocity(), 0.0);
    }

    #[test]
    fn steady_motion() {
        let mut tracker = VelocityTracker::new();
        for step in 0..5 {
            tracker.add_position(step * 10, step as f32 * 50.0);
        }
        let velocity = tracker.velocity();
        assert!(
            (velocity - 5_000.0).abs() < 500.0,
            "expected ~5000, got {velocity}"
        );
    }

    #[test]
    fn upward_motion_is_negative() {
        let mut tracker = VelocityTracker::new();
        for step in 0..4 {
            tracker.add_position(step * 8, -(step as f32) * 20.0);
        }
        assert!(tracker.velocity() < 0.0);
    }

    #[test]
    fn pause_before_release_stops_the_fling() {
        let mut tracker = VelocityTracker::new();
        tracker.add_position(0, 0.0);
        tracker.add_position(10, 100.0);
        tracker.add_position(10 + ASSUME_STOPPED_MS + 1, 100.0);
        assert_eq!(tracker.velocity(), 0.0);
    }

    #[test]
    fn old_samples_fall_out_of_the_horizon() {
        let mut tracker = VelocityTracker::new();
        tracker.add_position(0, 5_000.0);
        for step in 0..4 {
            tracker.add_position(200 + step * 10, step as f32 * 10.0);
        }
        let velocity = tracker.velocity();
        assert!(velocity > 0.0 && velocity < 2_000.0, "got {velocity}");
    }

    #[test]
    fn velocity_is_capped() {
        let mut tracker = VelocityTracker::new();
        tracker.add_position(0, 0.0);
        tracker.add_position(1, 10_000.0);
        assert_eq!(tracker.velocity_with_max(8_000.0), 8_000.0);

        tracker.reset();
        tracker.add_position(0, 10_000.0);
        tracker.add_position(1, 0.0);
        assert_eq!(tracker.velocity_with_max(8_000.0), -8_000.0);
    }
}
