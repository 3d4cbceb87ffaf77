//! Host integration point for frame scheduling.

/// Schedules frames on behalf of the runtime.
///
/// The host implements this to wake its event loop whenever the runtime has
/// frame callbacks or tasks waiting. Wakers created by the runtime call into
/// the scheduler, so implementations must be safe to use from any thread.
pub trait RuntimeScheduler: Send + Sync {
    /// Request that the host schedule a new frame.
    fn schedule_frame(&self);
}
