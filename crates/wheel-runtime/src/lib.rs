//! Single-threaded UI runtime used to drive picker animations.
//!
//! The runtime owns two queues that the host drains once per frame:
//!
//! - frame callbacks, fired with the frame time in nanoseconds by
//!   [`RuntimeHandle::drain_frame_callbacks`];
//! - spawned UI tasks (`!Send` futures), polled by [`RuntimeHandle::drain_ui`].
//!
//! Animations suspend on [`FrameClock::next_frame`] between frames, so a host
//! loop only has to alternate between the two drains until
//! [`Runtime::needs_frame`] reports `false`.

mod frame_clock;
mod platform;
mod runtime;

pub use frame_clock::{FrameCallbackRegistration, FrameClock, NextFrame};
pub use platform::RuntimeScheduler;
pub use runtime::{DefaultScheduler, Runtime, RuntimeHandle, TaskHandle, TestScheduler};

/// Identifier of a registered frame callback.
pub type FrameCallbackId = u64;

/// Nanoseconds in one frame at 60 FPS, used by simulated frame loops.
pub const FRAME_NANOS_60FPS: u64 = 16_666_667;

#[cfg(test)]
#[path = "tests/runtime_tests.rs"]
mod tests;
