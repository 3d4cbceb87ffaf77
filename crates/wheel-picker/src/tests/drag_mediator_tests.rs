use super::*;

use std::sync::Arc;

use wheel_animation::FrameAnimationDriver;
use wheel_runtime::{Runtime, TestScheduler, FRAME_NANOS_60FPS};

use crate::index_space::IndexSpace;
use crate::scroll_model::ScrollPhase;

fn setup(size: usize, initial: i32) -> (Runtime, DragMediator<FrameAnimationDriver>) {
    let runtime = Runtime::new(Arc::new(TestScheduler::default()));
    let model = ScrollModel::new(IndexSpace::new(size, false).unwrap(), initial);
    model.on_layout(48, 2);
    let driver = FrameAnimationDriver::new(runtime.frame_clock());
    let mediator = DragMediator::new(model, driver, &FlingConfig::default(), runtime.handle());
    (runtime, mediator)
}

fn pump(runtime: &Runtime, frame: &mut u64, max_frames: u64) {
    let handle = runtime.handle();
    handle.drain_ui();
    for _ in 0..max_frames {
        if !runtime.needs_frame() {
            return;
        }
        *frame += 1;
        handle.drain_frame_callbacks(*frame * FRAME_NANOS_60FPS);
        handle.drain_ui();
    }
}

#[test]
fn drag_moves_the_position() {
    let (_runtime, mut mediator) = setup(21, 0);
    mediator.on_drag_start();
    mediator.on_drag_at(0, -100.0);
    let consumed = mediator.on_drag_at(10, -100.0);

    assert_eq!(consumed, -100.0);
    assert_eq!(mediator.model().raw_index(), 4.0);
    assert_eq!(mediator.model().phase(), ScrollPhase::Scrolling);
    assert_eq!(mediator.model().settled_index(), 0);
}

#[test]
fn paused_release_snaps_to_nearest() {
    let (runtime, mut mediator) = setup(21, 0);
    mediator.on_drag_start();
    mediator.on_drag_at(0, -80.0);
    mediator.on_drag_at(10, -50.0);
    mediator.on_drag_at(120, 0.0);
    mediator.on_drag_end();

    pump(&runtime, &mut 0, 600);

    assert!(!mediator.is_flinging());
    assert_eq!(mediator.model().raw_index(), 3.0);
    assert_eq!(mediator.model().settled_index(), 3);
}

#[test]
fn quick_release_flings_past_several_items() {
    let (runtime, mut mediator) = setup(101, 0);
    mediator.on_drag_start();
    for step in 0..5 {
        mediator.on_drag_at(step * 10, -50.0);
    }
    assert_eq!(mediator.model().raw_index(), 5.0);
    mediator.on_drag_end();
    assert!(mediator.is_flinging());

    pump(&runtime, &mut 0, 1_000);

    // -5000px/s decays over about 3180px, 63 whole items past the start.
    assert!(!mediator.is_flinging());
    assert_eq!(mediator.model().raw_index(), 68.0);
    assert_eq!(mediator.model().settled_index(), 68);
    assert_eq!(mediator.model().phase(), ScrollPhase::Idle);
}

#[test]
fn new_drag_interrupts_a_fling() {
    let (runtime, mut mediator) = setup(21, 0);
    mediator.fling_with_velocity(-3_000.0);
    let mut frame = 0;
    pump(&runtime, &mut frame, 6);
    assert!(mediator.is_flinging());

    mediator.on_drag_start();
    assert!(!mediator.is_flinging());
    let stopped_at = mediator.model().raw_index();
    assert!(stopped_at > 0.0 && stopped_at < 20.0, "stopped at {stopped_at}");

    pump(&runtime, &mut frame, 10);
    assert_eq!(mediator.model().raw_index(), stopped_at);
    assert_eq!(mediator.model().settled_index(), 0);
}

#[test]
fn disabled_mediator_ignores_gestures() {
    let (runtime, mut mediator) = setup(21, 4);
    mediator.set_enabled(false);

    mediator.on_drag_start();
    assert_eq!(mediator.on_drag_at(0, -300.0), 0.0);
    mediator.on_drag_end();

    assert!(!mediator.is_flinging());
    assert!(!runtime.needs_frame());
    assert_eq!(mediator.model().raw_index(), 4.0);

    mediator.model().scroll_to_index(9);
    assert_eq!(mediator.model().settled_index(), 9);
}

#[test]
fn wall_clock_drag_is_tracked() {
    let (_runtime, mut mediator) = setup(21, 0);
    mediator.on_drag_start();
    mediator.on_drag(-25.0);
    assert_eq!(mediator.model().raw_index(), 0.5);
}
