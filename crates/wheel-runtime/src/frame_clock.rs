use crate::runtime::RuntimeHandle;
use crate::FrameCallbackId;
use std::cell::RefCell;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll, Waker};

/// Source of frame times for animations.
#[derive(Clone, Debug)]
pub struct FrameClock {
    runtime: RuntimeHandle,
}

impl FrameClock {
    pub fn new(runtime: RuntimeHandle) -> Self {
        Self { runtime }
    }

    pub fn runtime_handle(&self) -> RuntimeHandle {
        self.runtime.clone()
    }

    /// Runs `callback` once with the time of the next frame.
    pub fn with_frame_nanos(
        &self,
        callback: impl FnOnce(u64) + 'static,
    ) -> FrameCallbackRegistration {
        let runtime = self.runtime.clone();
        match runtime.register_frame_callback(callback) {
            Some(id) => FrameCallbackRegistration::new(runtime, id),
            None => FrameCallbackRegistration::inactive(runtime),
        }
    }

    /// Resolves with the time of the next frame, in nanoseconds.
    pub fn next_frame(&self) -> NextFrame {
        NextFrame::new(self.clone())
    }
}

/// Keeps a frame callback registered; dropping it unregisters the callback.
#[derive(Debug)]
pub struct FrameCallbackRegistration {
    runtime: RuntimeHandle,
    id: Option<FrameCallbackId>,
}

impl FrameCallbackRegistration {
    fn new(runtime: RuntimeHandle, id: FrameCallbackId) -> Self {
        Self {
            runtime,
            id: Some(id),
        }
    }

    fn inactive(runtime: RuntimeHandle) -> Self {
        Self { runtime, id: None }
    }

    pub fn is_active(&self) -> bool {
        self.id.is_some()
    }

    pub fn cancel(mut self) {
        if let Some(id) = self.id.take() {
            self.runtime.cancel_frame_callback(id);
        }
    }

    /// Marks the callback as consumed without touching the runtime queue.
    fn fired(&mut self) {
        self.id = None;
    }
}

impl Drop for FrameCallbackRegistration {
    fn drop(&mut self) {
        if let Some(id) = self.id.take() {
            self.runtime.cancel_frame_callback(id);
        }
    }
}

#[derive(Default)]
struct NextFrameState {
    registration: Option<FrameCallbackRegistration>,
    time: Option<u64>,
    waker: Option<Waker>,
}

/// Future returned by [`FrameClock::next_frame`].
pub struct NextFrame {
    clock: FrameClock,
    state: Rc<RefCell<NextFrameState>>,
}

impl NextFrame {
    fn new(clock: FrameClock) -> Self {
        Self {
            clock,
            state: Rc::new(RefCell::new(NextFrameState::default())),
        }
    }
}

impl Future for NextFrame {
    type Output = u64;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        if let Some(time) = self.state.borrow().time {
            return Poll::Ready(time);
        }

        let needs_registration = {
            let mut state = self.state.borrow_mut();
            state.waker = Some(cx.waker().clone());
            state.registration.is_none()
        };

        if needs_registration {
            let weak = Rc::downgrade(&self.state);
            let registration = self.clock.with_frame_nanos(move |time| {
                if let Some(state) = weak.upgrade() {
                    let mut state = state.borrow_mut();
                    state.time = Some(time);
                    if let Some(registration) = state.registration.as_mut() {
                        registration.fired();
                    }
                    if let Some(waker) = state.waker.take() {
                        waker.wake();
                    }
                }
            });
            self.state.borrow_mut().registration = Some(registration);
        }

        match self.state.borrow().time {
            Some(time) => Poll::Ready(time),
            None => Poll::Pending,
        }
    }
}

impl Drop for NextFrame {
    fn drop(&mut self) {
        let registration = self.state.borrow_mut().registration.take();
        drop(registration);
    }
}

impl std::fmt::Debug for NextFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NextFrame")
            .field("time", &self.state.borrow().time)
            .finish()
    }
}
