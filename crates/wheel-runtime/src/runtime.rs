use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll, Waker};

use crate::frame_clock::FrameClock;
use crate::platform::RuntimeScheduler;
use crate::FrameCallbackId;

type FrameCallback = Box<dyn FnOnce(u64) + 'static>;

struct FrameCallbackEntry {
    id: FrameCallbackId,
    callback: Option<FrameCallback>,
}

struct TaskEntry {
    id: u64,
    future: Pin<Box<dyn Future<Output = ()> + 'static>>,
}

struct RuntimeInner {
    scheduler: Arc<dyn RuntimeScheduler>,
    needs_frame: Cell<bool>,
    frame_callbacks: RefCell<VecDeque<FrameCallbackEntry>>,
    next_frame_callback_id: Cell<u64>,
    tasks: RefCell<Vec<TaskEntry>>,
    /// Ids of every task that has been spawned and has neither completed nor
    /// been cancelled, including the ones currently being polled.
    live_tasks: RefCell<Vec<u64>>,
    next_task_id: Cell<u64>,
    task_waker: RefCell<Option<Waker>>,
}

impl RuntimeInner {
    fn new(scheduler: Arc<dyn RuntimeScheduler>) -> Self {
        Self {
            scheduler,
            needs_frame: Cell::new(false),
            frame_callbacks: RefCell::new(VecDeque::new()),
            next_frame_callback_id: Cell::new(1),
            tasks: RefCell::new(Vec::new()),
            live_tasks: RefCell::new(Vec::new()),
            next_task_id: Cell::new(1),
            task_waker: RefCell::new(None),
        }
    }

    fn init_task_waker(this: &Rc<Self>) {
        let waker = RuntimeTaskWaker {
            scheduler: Arc::clone(&this.scheduler),
        }
        .into_waker();
        *this.task_waker.borrow_mut() = Some(waker);
    }

    fn schedule(&self) {
        self.needs_frame.set(true);
        self.scheduler.schedule_frame();
    }

    fn has_frame_callbacks(&self) -> bool {
        self.frame_callbacks
            .try_borrow()
            .map(|callbacks| !callbacks.is_empty())
            .unwrap_or(true)
    }

    fn has_live_tasks(&self) -> bool {
        self.live_tasks
            .try_borrow()
            .map(|tasks| !tasks.is_empty())
            .unwrap_or(true)
    }

    fn is_task_live(&self, id: u64) -> bool {
        self.live_tasks.borrow().contains(&id)
    }

    fn spawn_ui_task(&self, future: Pin<Box<dyn Future<Output = ()> + 'static>>) -> u64 {
        let id = self.next_task_id.get();
        self.next_task_id.set(id + 1);
        self.live_tasks.borrow_mut().push(id);
        self.tasks.borrow_mut().push(TaskEntry { id, future });
        log::trace!("spawned ui task {id}");
        self.schedule();
        id
    }

    fn cancel_task(&self, id: u64) {
        self.live_tasks.borrow_mut().retain(|live| *live != id);
        // Dropping a future can cancel frame callbacks, which re-enters the
        // runtime, so the entry is dropped after the borrow is released.
        let removed = {
            let mut tasks = self.tasks.borrow_mut();
            tasks
                .iter()
                .position(|entry| entry.id == id)
                .map(|index| tasks.remove(index))
        };
        if removed.is_some() {
            log::trace!("cancelled ui task {id}");
        }
        drop(removed);
        self.refresh_needs_frame();
    }

    fn poll_async_tasks(&self) -> bool {
        let waker = match self.task_waker.borrow().as_ref() {
            Some(waker) => waker.clone(),
            None => return false,
        };
        let mut cx = Context::from_waker(&waker);
        let tasks = std::mem::take(&mut *self.tasks.borrow_mut());
        let mut pending = Vec::with_capacity(tasks.len());
        let mut made_progress = false;
        for mut entry in tasks {
            // A task cancelled by an earlier task in this pass is skipped.
            if !self.is_task_live(entry.id) {
                continue;
            }
            match entry.future.as_mut().poll(&mut cx) {
                Poll::Ready(()) => {
                    made_progress = true;
                    self.live_tasks.borrow_mut().retain(|live| *live != entry.id);
                }
                Poll::Pending => pending.push(entry),
            }
        }
        // Cancellation requested while the task was out of the queue.
        pending.retain(|entry| self.is_task_live(entry.id));
        if !pending.is_empty() {
            let mut tasks = self.tasks.borrow_mut();
            let spawned_during_poll = std::mem::take(&mut *tasks);
            tasks.extend(pending);
            tasks.extend(spawned_during_poll);
        }
        made_progress
    }

    fn drain_ui(&self) {
        while self.poll_async_tasks() {}
        self.refresh_needs_frame();
    }

    fn register_frame_callback(&self, callback: FrameCallback) -> FrameCallbackId {
        let id = self.next_frame_callback_id.get();
        self.next_frame_callback_id.set(id + 1);
        self.frame_callbacks
            .borrow_mut()
            .push_back(FrameCallbackEntry {
                id,
                callback: Some(callback),
            });
        self.schedule();
        id
    }

    fn cancel_frame_callback(&self, id: FrameCallbackId) {
        {
            let mut callbacks = self.frame_callbacks.borrow_mut();
            if let Some(index) = callbacks.iter().position(|entry| entry.id == id) {
                callbacks.remove(index);
            }
        }
        self.refresh_needs_frame();
    }

    fn drain_frame_callbacks(&self, frame_time_nanos: u64) {
        let pending: Vec<FrameCallback> = {
            let mut callbacks = self.frame_callbacks.borrow_mut();
            callbacks
                .drain(..)
                .filter_map(|mut entry| entry.callback.take())
                .collect()
        };
        for callback in pending {
            callback(frame_time_nanos);
        }
        self.refresh_needs_frame();
    }

    fn refresh_needs_frame(&self) {
        if !self.has_frame_callbacks() && !self.has_live_tasks() {
            self.needs_frame.set(false);
        }
    }
}

/// Owner of the runtime queues.
///
/// Dropping the `Runtime` drops every pending task and frame callback; handles
/// that outlive it become inert.
#[derive(Clone)]
pub struct Runtime {
    inner: Rc<RuntimeInner>,
}

impl Runtime {
    pub fn new(scheduler: Arc<dyn RuntimeScheduler>) -> Self {
        let inner = Rc::new(RuntimeInner::new(scheduler));
        RuntimeInner::init_task_waker(&inner);
        Self { inner }
    }

    pub fn handle(&self) -> RuntimeHandle {
        RuntimeHandle {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Whether frame callbacks or tasks are still waiting to run.
    pub fn needs_frame(&self) -> bool {
        self.inner.needs_frame.get()
    }

    pub fn frame_clock(&self) -> FrameClock {
        FrameClock::new(self.handle())
    }
}

impl std::fmt::Debug for Runtime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runtime")
            .field("needs_frame", &self.inner.needs_frame.get())
            .field("tasks", &self.inner.live_tasks.borrow().len())
            .finish()
    }
}

#[derive(Debug, Default)]
pub struct DefaultScheduler;

impl RuntimeScheduler for DefaultScheduler {
    fn schedule_frame(&self) {}
}

/// Scheduler for tests and headless hosts: only counts frame requests.
#[derive(Debug, Default)]
pub struct TestScheduler {
    requests: AtomicUsize,
}

impl TestScheduler {
    pub fn requested_frames(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

impl RuntimeScheduler for TestScheduler {
    fn schedule_frame(&self) {
        self.requests.fetch_add(1, Ordering::SeqCst);
    }
}

/// Weak handle to a [`Runtime`], cheap to clone into tasks and callbacks.
#[derive(Clone)]
pub struct RuntimeHandle {
    inner: Weak<RuntimeInner>,
}

impl RuntimeHandle {
    pub fn schedule(&self) {
        if let Some(inner) = self.inner.upgrade() {
            inner.schedule();
        }
    }

    /// Spawns a UI task. The future never leaves the runtime thread, so it
    /// may capture `Rc`/`RefCell` state.
    ///
    /// Returns `None` when the runtime has been dropped.
    pub fn spawn_ui<F>(&self, fut: F) -> Option<TaskHandle>
    where
        F: Future<Output = ()> + 'static,
    {
        self.inner.upgrade().map(|inner| {
            let id = inner.spawn_ui_task(Box::pin(fut));
            TaskHandle {
                id,
                runtime: self.clone(),
            }
        })
    }

    pub fn cancel_task(&self, id: u64) {
        if let Some(inner) = self.inner.upgrade() {
            inner.cancel_task(id);
        }
    }

    pub fn is_task_active(&self, id: u64) -> bool {
        self.inner
            .upgrade()
            .is_some_and(|inner| inner.is_task_live(id))
    }

    /// Polls every spawned task until none of them makes further progress.
    pub fn drain_ui(&self) {
        if let Some(inner) = self.inner.upgrade() {
            inner.drain_ui();
        }
    }

    pub fn has_pending_ui(&self) -> bool {
        self.inner
            .upgrade()
            .is_some_and(|inner| inner.has_live_tasks())
    }

    pub fn register_frame_callback(
        &self,
        callback: impl FnOnce(u64) + 'static,
    ) -> Option<FrameCallbackId> {
        self.inner
            .upgrade()
            .map(|inner| inner.register_frame_callback(Box::new(callback)))
    }

    pub fn cancel_frame_callback(&self, id: FrameCallbackId) {
        if let Some(inner) = self.inner.upgrade() {
            inner.cancel_frame_callback(id);
        }
    }

    pub fn drain_frame_callbacks(&self, frame_time_nanos: u64) {
        if let Some(inner) = self.inner.upgrade() {
            inner.drain_frame_callbacks(frame_time_nanos);
        }
    }

    pub fn has_frame_callbacks(&self) -> bool {
        self.inner
            .upgrade()
            .is_some_and(|inner| inner.has_frame_callbacks())
    }

    pub fn frame_clock(&self) -> FrameClock {
        FrameClock::new(self.clone())
    }
}

impl std::fmt::Debug for RuntimeHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuntimeHandle")
            .field("alive", &(self.inner.strong_count() > 0))
            .finish()
    }
}

/// Handle to a spawned UI task.
///
/// Dropping the handle detaches the task; [`TaskHandle::cancel`] drops the
/// future at its current suspension point.
#[derive(Debug)]
pub struct TaskHandle {
    id: u64,
    runtime: RuntimeHandle,
}

impl TaskHandle {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn is_active(&self) -> bool {
        self.runtime.is_task_active(self.id)
    }

    pub fn cancel(self) {
        self.runtime.cancel_task(self.id);
    }
}

struct RuntimeTaskWaker {
    scheduler: Arc<dyn RuntimeScheduler>,
}

impl RuntimeTaskWaker {
    fn into_waker(self) -> Waker {
        futures_task::waker(Arc::new(self))
    }
}

impl futures_task::ArcWake for RuntimeTaskWaker {
    fn wake_by_ref(arc_self: &Arc<Self>) {
        arc_self.scheduler.schedule_frame();
    }
}
