//! The UI thread's execution context.
//!
//! Work posted through a [`UiContext`] runs on the thread that created it:
//! inline when posted from that thread, otherwise queued until the UI loop
//! drains its [`UiQueue`].

use log::{debug, warn};
use std::sync::mpsc;
use std::thread::{self, ThreadId};

pub type Task = Box<dyn FnOnce() + Send + 'static>;

#[derive(Clone)]
pub struct UiContext {
    thread: ThreadId,
    tx: mpsc::Sender<Task>,
}

pub struct UiQueue {
    rx: mpsc::Receiver<Task>,
}

impl UiContext {
    /// Binds a new context to the calling thread.
    pub fn current() -> (UiContext, UiQueue) {
        let (tx, rx) = mpsc::channel();
        let context = UiContext {
            thread: thread::current().id(),
            tx,
        };

        (context, UiQueue { rx })
    }

    pub fn is_current(&self) -> bool {
        thread::current().id() == self.thread
    }

    pub fn dispatch<F>(&self, task: F)
    where
        F: FnOnce() + Send + 'static,
    {
        if self.is_current() {
            task();
            return;
        }

        debug!("queueing task for the ui thread");

        if self.tx.send(Box::new(task)).is_err() {
            warn!("ui queue is gone, dropping task");
        }
    }
}

impl UiQueue {
    /// Runs every queued task without blocking. Returns how many ran.
    pub fn run_pending(&self) -> usize {
        let mut ran = 0;

        while let Ok(task) = self.rx.try_recv() {
            task();
            ran += 1;
        }

        ran
    }
}
