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

//! Shutdown signal for synchronization.

use std::sync::{Condvar, Mutex};

use crate::error::{Error, Result};

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// Broadcasts pool shutdown to workers parked waiting for work.
pub struct Signal {
    /// Whether the pool is terminating.
    mutex: Mutex<bool>,
    /// Wakes up waiters once the flag flips.
    condvar: Condvar,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl Signal {
    /// Creates a signal in the non-terminating state.
    #[must_use]
    pub fn new() -> Self {
        Self {
            mutex: Mutex::new(false),
            condvar: Condvar::new(),
        }
    }

    /// Returns whether the pool has started terminating.
    #[must_use]
    pub fn is_terminating(&self) -> bool {
        *self.mutex.lock().expect("signal mutex poisoned")
    }

    /// Flips the flag and wakes every worker blocked on it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Signal`] if the mutex was poisoned by a panicking
    /// worker.
    pub fn terminate(&self) -> Result {
        let mut flag = self.mutex.lock().map_err(|_| Error::Signal)?;
        *flag = true;
        drop(flag);
        self.condvar.notify_all();
        Ok(())
    }
}

impl Default for Signal {
    fn default() -> Self {
        Self::new()
    }
}
