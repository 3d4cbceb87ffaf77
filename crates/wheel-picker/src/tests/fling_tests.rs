use super::*;

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use wheel_animation::FrameAnimationDriver;
use wheel_runtime::{Runtime, TestScheduler, FRAME_NANOS_60FPS};

use crate::index_space::IndexSpace;
use crate::scroll_model::ScrollPhase;
use crate::snap_planner::AtMost;

struct Fixture {
    runtime: Runtime,
    model: ScrollModel,
    fling: Rc<SnapFlingBehavior<FrameAnimationDriver>>,
    settled: Rc<RefCell<Vec<usize>>>,
    _subscription: crate::scroll_model::SettledSubscription,
}

impl Fixture {
    fn new(size: usize, wraparound: bool, initial: i32, config: FlingConfig) -> Self {
        let runtime = Runtime::new(Arc::new(TestScheduler::default()));
        let model = ScrollModel::new(IndexSpace::new(size, wraparound).unwrap(), initial);
        model.on_layout(48, 2);
        let driver = FrameAnimationDriver::new(runtime.frame_clock());
        let fling = Rc::new(SnapFlingBehavior::new(model.clone(), driver, &config));
        let settled = Rc::new(RefCell::new(Vec::new()));
        let subscription = {
            let settled = Rc::clone(&settled);
            model.subscribe_settled(move |index| settled.borrow_mut().push(index))
        };
        Self {
            runtime,
            model,
            fling,
            settled,
            _subscription: subscription,
        }
    }

    /// Runs a fling to completion and returns the remaining velocity.
    fn fling(&self, velocity: f32) -> f32 {
        let remaining = Rc::new(RefCell::new(None));
        {
            let fling = Rc::clone(&self.fling);
            let remaining = Rc::clone(&remaining);
            self.runtime
                .handle()
                .spawn_ui(async move {
                    let left = fling.perform_fling(velocity).await;
                    *remaining.borrow_mut() = Some(left);
                })
                .expect("runtime alive");
        }

        let handle = self.runtime.handle();
        handle.drain_ui();
        let mut frame = 0;
        while self.runtime.needs_frame() && frame < 1_000 {
            frame += 1;
            handle.drain_frame_callbacks(frame * FRAME_NANOS_60FPS);
            handle.drain_ui();
        }
        let left = remaining.borrow_mut().take();
        left.expect("fling finished")
    }
}

#[test]
fn slow_release_settles_on_nearest_item() {
    let fixture = Fixture::new(21, false, 0, FlingConfig::default());
    fixture.model.apply_delta(-520.0);

    fixture.fling(50.0);

    assert_eq!(fixture.model.raw_index(), 10.0);
    assert_eq!(fixture.model.settled_index(), 10);
    assert_eq!(fixture.model.phase(), ScrollPhase::Idle);
    assert_eq!(fixture.settled.borrow().as_slice(), &[10]);
}

#[test]
fn release_on_an_item_settles_without_frames() {
    let fixture = Fixture::new(21, false, 0, FlingConfig::default());
    fixture.model.apply_delta(-500.0);

    fixture.fling(0.0);

    assert_eq!(fixture.model.target_index(), 10);
    assert_eq!(fixture.model.settled_index(), 10);
    assert!(!fixture.runtime.needs_frame());
}

#[test]
fn fast_fling_moves_to_the_next_item() {
    let fixture = Fixture::new(21, false, 0, FlingConfig::default());
    fixture.model.apply_delta(-510.0);

    fixture.fling(-250.0);

    assert_eq!(fixture.model.raw_index(), 11.0);
    assert_eq!(fixture.model.settled_index(), 11);
}

#[test]
fn strong_fling_runs_to_the_end_of_a_bounded_list() {
    let fixture = Fixture::new(21, false, 0, FlingConfig::default());

    fixture.fling(-3_000.0);

    assert_eq!(fixture.model.raw_index(), 20.0);
    assert_eq!(fixture.model.settled_index(), 20);
    assert_eq!(
        fixture.settled.borrow().as_slice(),
        &[20],
        "intermediate items never settle"
    );
}

#[test]
fn snap_distance_limits_the_fling() {
    let config = FlingConfig::default().with_snap_distance(AtMost(3));
    let fixture = Fixture::new(21, false, 5, config);

    fixture.fling(4_000.0);

    assert_eq!(fixture.model.raw_index(), 2.0);
    assert_eq!(fixture.model.settled_index(), 2);
}

#[test]
fn wrapping_fling_is_capped_at_one_lap() {
    let fixture = Fixture::new(3, true, 0, FlingConfig::default());

    fixture.fling(-8_000.0);

    assert_eq!(fixture.model.raw_index(), 3.0);
    assert_eq!(fixture.model.target_logical_index(), 3);
    assert_eq!(fixture.model.settled_index(), 0);
    assert!(
        fixture.settled.borrow().is_empty(),
        "a full lap lands on the same value"
    );
}

#[test]
fn fling_against_the_bound_returns_its_velocity() {
    let fixture = Fixture::new(21, false, 0, FlingConfig::default());

    let remaining = fixture.fling(1_500.0);

    assert_eq!(fixture.model.raw_index(), 0.0);
    assert_eq!(remaining, 1_500.0);
}
