//! Single-consumer execution queue
//!
//! Producers push closures from any thread; one designated owner context
//! drains and runs them serially. The player uses this to apply decoder
//! completion events on the same logical thread as user commands, so the
//! two can never race on controller state.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Condvar, Mutex};
use tracing::error;

type Job = Box<dyn FnOnce() + Send + 'static>;

/// FIFO of deferred closures bound to one owner context
///
/// ```rust
/// use aria_core::ExecQueue;
/// use std::sync::Arc;
///
/// let queue = Arc::new(ExecQueue::new());
/// queue.push(|| println!("runs on the owner thread"));
/// queue.exit();
/// queue.run(); // drains the pending closure, then returns
/// ```
#[derive(Default)]
pub struct ExecQueue {
    pending: Mutex<Vec<Job>>,
    wakeup: Condvar,
    exiting: AtomicBool,
    running: AtomicBool,
}

impl ExecQueue {
    /// Create an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue a closure for execution on the owner context
    ///
    /// Safe from any thread, and wakes the owner if it is idle. Pushing
    /// after [`exit`](Self::exit) is allowed; such closures are dropped
    /// unexecuted once the owner loop has returned.
    pub fn push(&self, job: impl FnOnce() + Send + 'static) {
        let mut pending = self.pending.lock().unwrap();
        pending.push(Box::new(job));
        self.wakeup.notify_one();
    }

    /// Drain and execute pending closures until [`exit`](Self::exit)
    ///
    /// Must only be invoked from the designated owner context; concurrent
    /// `run` calls are a contract violation. Blocks while the queue is
    /// empty, swaps out the whole pending batch at once, and executes it
    /// in enqueue order. A panicking closure is caught and logged so one
    /// bad callback cannot halt the owner loop. Returns only after the
    /// exit flag is set and the last batch has drained.
    pub fn run(&self) {
        let was_running = self.running.swap(true, Ordering::AcqRel);
        debug_assert!(!was_running, "ExecQueue::run invoked concurrently");

        loop {
            let batch = {
                let mut pending = self.pending.lock().unwrap();
                while pending.is_empty() && !self.exiting.load(Ordering::Acquire) {
                    pending = self.wakeup.wait(pending).unwrap();
                }
                std::mem::take(&mut *pending)
            };

            for job in batch {
                if catch_unwind(AssertUnwindSafe(move || job())).is_err() {
                    error!("queued task panicked; owner loop continues");
                }
            }

            if self.exiting.load(Ordering::Acquire) && self.pending.lock().unwrap().is_empty() {
                break;
            }
        }

        self.running.store(false, Ordering::Release);
    }

    /// Request shutdown of the owner loop
    ///
    /// Idempotent. Work pushed before this call still drains before
    /// [`run`](Self::run) returns.
    pub fn exit(&self) {
        self.exiting.store(true, Ordering::Release);
        self.wakeup.notify_all();
    }

    /// Whether shutdown has been requested
    pub fn is_exiting(&self) -> bool {
        self.exiting.load(Ordering::Acquire)
    }
}
