//! Frame scheduling with an at-most-one-pending guarantee
//!
//! [`FrameScheduler`] abstracts the frame clock (`requestAnimationFrame` in
//! the browser). [`FrameThrottle`] sits on top and drops requests while a
//! task is already pending.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

pub type FrameTask = Box<dyn FnOnce()>;

pub trait FrameScheduler {
    type Handle: Copy + fmt::Debug;

    /// Run `task` on the next frame; `None` if the platform refused
    fn request_frame(&self, task: FrameTask) -> Option<Self::Handle>;

    fn cancel_frame(&self, handle: Self::Handle);
}

/// Coalesces frame requests to one pending task
pub struct FrameThrottle<S: FrameScheduler> {
    scheduler: S,
    pending: Cell<bool>,
    handle: Cell<Option<S::Handle>>,
}

impl<S: FrameScheduler> FrameThrottle<S> {
    pub fn new(scheduler: S) -> Self {
        Self {
            scheduler,
            pending: Cell::new(false),
            handle: Cell::new(None),
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.get()
    }

    /// Schedule `task` unless one is already pending; returns whether it was scheduled
    ///
    /// The task must call [`FrameThrottle::begin_frame`] first.
    pub fn schedule(&self, task: FrameTask) -> bool {
        if self.pending.get() {
            return false;
        }

        self.pending.set(true);
        let handle = self.scheduler.request_frame(task);
        match handle {
            // The scheduler may run the task synchronously
            Some(handle) if self.pending.get() => self.handle.set(Some(handle)),
            Some(_) => {}
            None => {
                log::debug!("Frame request refused");
                self.pending.set(false);
                return false;
            }
        }
        true
    }

    /// Mark the pending task as running
    pub fn begin_frame(&self) {
        self.pending.set(false);
        self.handle.set(None);
    }

    /// Cancel the pending task, if any
    pub fn cancel(&self) {
        if let Some(handle) = self.handle.take() {
            self.scheduler.cancel_frame(handle);
        }
        self.pending.set(false);
    }
}

/// A scheduler advanced explicitly by the caller
///
/// Useful for hosts without a frame clock and for deterministic tests.
#[derive(Clone, Default)]
pub struct ManualScheduler {
    queue: Rc<RefCell<VecDeque<(u64, FrameTask)>>>,
    next_id: Rc<Cell<u64>>,
    requested: Rc<Cell<u64>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending_count(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Total number of frames ever requested
    pub fn requested_count(&self) -> u64 {
        self.requested.get()
    }

    /// Run every task queued before this call
    pub fn run_frame(&self) -> usize {
        let tasks: Vec<FrameTask> = self.queue.borrow_mut().drain(..).map(|(_, t)| t).collect();
        let ran = tasks.len();
        for task in tasks {
            task();
        }
        ran
    }
}

impl FrameScheduler for ManualScheduler {
    type Handle = u64;

    fn request_frame(&self, task: FrameTask) -> Option<u64> {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        self.requested.set(self.requested.get() + 1);
        self.queue.borrow_mut().push_back((id, task));
        Some(id)
    }

    fn cancel_frame(&self, handle: u64) {
        self.queue.borrow_mut().retain(|(id, _)| *id != handle);
    }
}
