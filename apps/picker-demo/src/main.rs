use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use anyhow::Context;
use wheel_animation::FrameAnimationDriver;
use wheel_picker::{
    AtMost, DragMediator, FlingConfig, PickerDefaults, PickerHost, PickerSaver, PickerState,
};
use wheel_runtime::{DefaultScheduler, Runtime, FRAME_NANOS_60FPS};

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

const DENSITY: f32 = 2.0;

/// Simulated display: alternates frame callbacks and UI tasks at 60 FPS.
struct FrameLoop {
    runtime: Runtime,
    frame: u64,
}

impl FrameLoop {
    fn new() -> Self {
        Self {
            runtime: Runtime::new(Arc::new(DefaultScheduler)),
            frame: 0,
        }
    }

    /// Runs frames until nothing is pending. Returns the number of frames.
    fn run_until_idle(&mut self) -> u64 {
        let handle = self.runtime.handle();
        let first = self.frame;
        handle.drain_ui();
        while self.runtime.needs_frame() {
            self.frame += 1;
            handle.drain_frame_callbacks(self.frame * FRAME_NANOS_60FPS);
            handle.drain_ui();
        }
        self.frame - first
    }
}

fn print_window<T: std::fmt::Display>(label: &str, state: &PickerState<T>) -> anyhow::Result<()> {
    let model = state.model();
    let window = model.visible_window()?;
    let mut rows = Vec::with_capacity(window.len());
    for item in window.items() {
        rows.push(format!(
            "{}@{}px",
            state.value_at(item.logical_index),
            model.offset_of(item.logical_index)?
        ));
    }
    println!(
        "{label:<28} raw {:>7.2}  settled {:<4} [{}]",
        model.raw_index(),
        state.settled_value(),
        rows.join(", ")
    );
    Ok(())
}

fn main() -> anyhow::Result<()> {
    #[cfg(feature = "logging")]
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    println!("=== Wheel Picker Walkthrough ===");
    println!();

    let mut frames = FrameLoop::new();
    let item_extent = (PickerDefaults::ITEM_EXTENT * DENSITY).round() as i32;
    let divider_extent = (PickerDefaults::DIVIDER_EXTENT * DENSITY).round() as i32;
    log::info!(
        "picker {}px tall, items {item_extent}px, dividers {divider_extent}px",
        PickerDefaults::picker_extent(item_extent, divider_extent)
    );

    let months: Rc<[&str]> = Rc::from(MONTHS.to_vec());
    let selected = Rc::new(RefCell::new(Vec::new()));
    let mut host = {
        let selected = Rc::clone(&selected);
        PickerHost::new(Rc::clone(&months), 0, true, move |index| {
            log::info!("host selection -> {}", MONTHS[index]);
            selected.borrow_mut().push(index);
        })
        .context("creating the month picker")?
    };
    host.state().model().on_layout(item_extent, divider_extent);
    print_window("initial", host.state())?;

    let config = FlingConfig::new(DENSITY);
    let driver = FrameAnimationDriver::new(frames.runtime.frame_clock());
    let mut mediator = DragMediator::new(
        host.state().model().clone(),
        driver.clone(),
        &config,
        frames.runtime.handle(),
    );

    // Slow drag upward by three items, then hold before release.
    mediator.on_drag_start();
    for step in 0..6 {
        mediator.on_drag_at(step * 16, -25.0 * DENSITY);
    }
    mediator.on_drag_at(200, 0.0);
    print_window("mid drag", host.state())?;
    mediator.on_drag_end();
    let spent = frames.run_until_idle();
    print_window(&format!("slow release ({spent} frames)"), host.state())?;

    // Quick downward flick across the start of the list.
    mediator.on_drag_start();
    for step in 0..4 {
        mediator.on_drag_at(step * 8, 40.0 * DENSITY);
    }
    mediator.on_drag_end();
    let spent = frames.run_until_idle();
    print_window(&format!("wrapping fling ({spent} frames)"), host.state())?;

    // The host picks a value itself; the picker jumps without reporting it.
    let before = selected.borrow().len();
    host.update(&months, 9)?;
    print_window("host selects Oct", host.state())?;
    anyhow::ensure!(
        selected.borrow().len() == before,
        "host-driven change was echoed back"
    );

    // Programmatic animated scroll.
    {
        let model = host.state().model().clone();
        let driver = driver.clone();
        frames.runtime.handle().spawn_ui(async move {
            model
                .animate_scroll_to_index(14, &driver, PickerDefaults::scroll_animation())
                .await;
        });
    }
    let spent = frames.run_until_idle();
    print_window(&format!("animated to 14 ({spent} frames)"), host.state())?;

    // A bounded list with the fling limited to three items per release.
    let days: Rc<[u32]> = (1..=31).collect::<Vec<_>>().into();
    let days_state = PickerState::new(Rc::clone(&days), 14, false)?;
    days_state.model().on_layout(item_extent, divider_extent);
    let mut day_mediator = DragMediator::new(
        days_state.model().clone(),
        driver,
        &config.clone().with_snap_distance(AtMost(3)),
        frames.runtime.handle(),
    );
    day_mediator.fling_with_velocity(-6_000.0 * DENSITY);
    let spent = frames.run_until_idle();
    print_window(&format!("limited fling ({spent} frames)"), &days_state)?;

    let saved = PickerSaver::save(&days_state);
    let restored = PickerSaver::restore(days, false, saved)?;
    restored.model().on_layout(item_extent, divider_extent);
    print_window("restored", &restored)?;

    println!();
    println!(
        "host saw: {}",
        selected
            .borrow()
            .iter()
            .map(|&index| MONTHS[index])
            .collect::<Vec<_>>()
            .join(" -> ")
    );
    Ok(())
}
