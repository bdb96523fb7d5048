// Copyright (c) 2025-2026 Zensical and contributors

// SPDX-License-Identifier: MIT
// All contributions are certified under the DCO

// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to
// deal in the Software without restriction, including without limitation the
// rights to use, copy, modify, merge, publish, distribute, sublicense, and/or
// sell copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:

// The above copyright notice and this permission notice shall be included in
// all copies or substantial portions of the Software.

// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NON-INFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING
// FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS
// IN THE SOFTWARE.

// ----------------------------------------------------------------------------

//! Bounded worker pool.
//!
//! Unlike a generic task-submission executor, [`WorkerPool`] binds exactly
//! one job to a worker for the job's entire run: a checked-out worker
//! disappears from the idle FIFO until its job returns, at which point it
//! releases itself back. This matches a connection dispatcher handing a
//! whole accepted stream to a worker rather than a short-lived closure.

use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Condvar, Mutex};
use std::thread::{self, Builder, JoinHandle};

use crossbeam::channel::{unbounded, Sender};

use crate::error::{Error, Result};
use crate::signal::Signal;

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// A job bound to a worker for its entire run.
///
/// Typically a closure that owns an accepted connection and loops
/// `read_message` → route → reply until the peer disconnects.
pub type Job = Box<dyn FnOnce() + Send>;

/// Identifies a worker slot.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct WorkerId(usize);

/// Bounded pool of pre-spawned worker threads.
pub struct WorkerPool {
    /// Per-worker job senders, indexed by [`WorkerId`].
    senders: Vec<Sender<Job>>,
    /// Join handles, taken on shutdown.
    threads: Mutex<Vec<JoinHandle<()>>>,
    /// Workers not currently bound to a job, in checkout order.
    idle: Mutex<VecDeque<WorkerId>>,
    /// Wakes a blocked [`WorkerPool::checkout`] on release or shutdown.
    idle_signal: Condvar,
    /// Shutdown broadcast.
    signal: Arc<Signal>,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl WorkerPool {
    /// Pre-spawns `num_workers` worker threads.
    ///
    /// # Panics
    ///
    /// Panics if thread creation fails — the ability to spawn the pool's
    /// fixed worker threads is a startup precondition, not a runtime
    /// failure mode.
    #[must_use]
    pub fn new(num_workers: usize) -> Self {
        let signal = Arc::new(Signal::new());
        let mut senders = Vec::with_capacity(num_workers);
        let mut threads = Vec::with_capacity(num_workers);

        for index in 0..num_workers {
            let (sender, receiver) = unbounded::<Job>();
            let handle = Builder::new()
                .name(format!("poet/executor/{}", index + 1))
                .spawn(move || {
                    while let Ok(job) = receiver.recv() {
                        job();
                    }
                })
                .expect("failed to spawn worker thread");
            senders.push(sender);
            threads.push(handle);
        }

        Self {
            senders,
            threads: Mutex::new(threads),
            idle: Mutex::new((0..num_workers).map(WorkerId).collect()),
            idle_signal: Condvar::new(),
            signal,
        }
    }

    /// Number of worker slots the pool was created with.
    #[must_use]
    pub fn num_workers(&self) -> usize {
        self.senders.len()
    }

    /// Blocks until a worker is idle, then removes it from the FIFO.
    ///
    /// The caller owns the returned [`WorkerId`] until it's released via
    /// [`WorkerPool::dispatch`] completing and the job itself calling
    /// [`WorkerPool::release`] — in practice, bundled into the job closure
    /// so the worker returns itself the moment its connection closes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Closed`] if the pool is shutting down.
    pub fn checkout(&self) -> Result<WorkerId> {
        let mut idle = self.idle.lock().expect("idle queue mutex poisoned");
        loop {
            if let Some(id) = idle.pop_front() {
                return Ok(id);
            }
            if self.signal.is_terminating() {
                return Err(Error::Closed);
            }
            idle = self
                .idle_signal
                .wait(idle)
                .expect("idle queue mutex poisoned");
        }
    }

    /// Hands `job` to the worker identified by `id`, to run on its thread.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Closed`] if the worker's thread has already exited.
    pub fn dispatch(&self, id: WorkerId, job: Job) -> Result {
        self.senders
            .get(id.0)
            .ok_or(Error::Closed)?
            .send(job)
            .map_err(|_| Error::Closed)
    }

    /// Returns a worker to the idle FIFO.
    ///
    /// Called by the job itself right before it returns, so the worker is
    /// available for the next [`WorkerPool::checkout`] as soon as its
    /// connection is fully torn down.
    pub fn release(&self, id: WorkerId) {
        self.idle
            .lock()
            .expect("idle queue mutex poisoned")
            .push_back(id);
        self.idle_signal.notify_one();
    }
}

// ----------------------------------------------------------------------------
// Trait implementations
// ----------------------------------------------------------------------------

impl Drop for WorkerPool {
    /// Signals shutdown, wakes any blocked checkout, drops every sender
    /// (which unblocks each worker's `recv` with an error and lets its
    /// loop exit), and joins every worker thread.
    ///
    /// In-flight jobs are allowed to finish; only workers parked waiting
    /// for a job, or dispatcher threads parked in [`WorkerPool::checkout`],
    /// are woken early.
    fn drop(&mut self) {
        let _ = self.signal.terminate();
        self.idle_signal.notify_all();
        self.senders.clear();

        let mut threads = self.threads.lock().expect("thread list mutex poisoned");
        for handle in threads.drain(..) {
            let _ = handle.join();
        }
    }
}

impl fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkerPool")
            .field("workers", &self.num_workers())
            .finish()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;

    #[test]
    fn checkout_removes_worker_from_idle_fifo() {
        let pool = WorkerPool::new(2);
        let a = pool.checkout().unwrap();
        let b = pool.checkout().unwrap();
        assert_ne!(a.0, b.0);
    }

    #[test]
    fn released_worker_is_available_for_reuse() {
        let pool = WorkerPool::new(1);
        let a = pool.checkout().unwrap();
        pool.release(a);
        let b = pool.checkout().unwrap();
        assert_eq!(a.0, b.0);
    }

    #[test]
    fn dispatched_job_runs_on_a_worker_thread() {
        let pool = WorkerPool::new(1);
        let ran = Arc::new(AtomicUsize::new(0));
        let id = pool.checkout().unwrap();
        let flag = Arc::clone(&ran);
        pool.dispatch(id, Box::new(move || {
            flag.fetch_add(1, Ordering::SeqCst);
        }))
        .unwrap();

        for _ in 0..100 {
            if ran.load(Ordering::SeqCst) == 1 {
                break;
            }
            thread::sleep(Duration::from_millis(5));
        }
        assert_eq!(ran.load(Ordering::SeqCst), 1);
    }
}
