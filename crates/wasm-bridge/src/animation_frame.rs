//! `requestAnimationFrame` scheduler

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use plot_tooltip_engine::{FrameScheduler, FrameTask};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::Window;

use crate::dom::js_message;

/// A requested frame and the closure the browser will call
struct PendingFrame {
    handle: i32,
    task: Rc<RefCell<Option<FrameTask>>>,
    finished: Rc<Cell<bool>>,
    _closure: Closure<dyn FnMut(f64)>,
}

impl PendingFrame {
    /// Never started; dropping it is safe
    fn is_queued(&self) -> bool {
        self.task.borrow().is_some()
    }
}

/// Owns each frame closure until it has run or been cancelled
#[derive(Clone)]
pub struct AnimationFrameScheduler {
    window: Window,
    frames: Rc<RefCell<Vec<PendingFrame>>>,
}

impl AnimationFrameScheduler {
    pub fn new(window: Window) -> Self {
        Self {
            window,
            frames: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn pending_count(&self) -> usize {
        self.frames.borrow().iter().filter(|f| f.is_queued()).count()
    }

    /// Drop closures whose callback has returned
    fn prune_finished(&self) {
        self.frames.borrow_mut().retain(|frame| !frame.finished.get());
    }
}

impl FrameScheduler for AnimationFrameScheduler {
    type Handle = i32;

    fn request_frame(&self, task: FrameTask) -> Option<i32> {
        self.prune_finished();

        let task = Rc::new(RefCell::new(Some(task)));
        let finished = Rc::new(Cell::new(false));
        let closure = {
            let task = task.clone();
            let finished = finished.clone();
            Closure::wrap(Box::new(move |_timestamp: f64| {
                let next = task.borrow_mut().take();
                if let Some(next) = next {
                    next();
                }
                finished.set(true);
            }) as Box<dyn FnMut(f64)>)
        };

        match self
            .window
            .request_animation_frame(closure.as_ref().unchecked_ref())
        {
            Ok(handle) => {
                self.frames.borrow_mut().push(PendingFrame {
                    handle,
                    task,
                    finished,
                    _closure: closure,
                });
                Some(handle)
            }
            Err(err) => {
                log::warn!("requestAnimationFrame failed: {}", js_message(&err));
                None
            }
        }
    }

    fn cancel_frame(&self, handle: i32) {
        if let Err(err) = self.window.cancel_animation_frame(handle) {
            log::debug!("cancelAnimationFrame failed: {}", js_message(&err));
        }
        // A frame that already started keeps its closure until pruned
        let cancelled: Vec<PendingFrame> = {
            let mut frames = self.frames.borrow_mut();
            let (cancelled, kept) = std::mem::take(&mut *frames)
                .into_iter()
                .partition(|frame| frame.handle == handle && frame.is_queued());
            *frames = kept;
            cancelled
        };
        drop(cancelled);
        self.prune_finished();
    }
}
