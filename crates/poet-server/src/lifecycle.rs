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

//! Termination on `SIGINT`/`SIGTERM` or the `terminate` method.
//!
//! Both triggers flip the same [`AtomicBool`]; the accept loop and
//! [`crate::dispatcher`]'s handlers share it through
//! [`poet_protocol::SharedContext::shutdown`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

// ----------------------------------------------------------------------------
// Functions
// ----------------------------------------------------------------------------

/// Installs a `ctrlc` handler that flips `shutdown` on the first signal.
///
/// # Panics
///
/// Panics if a signal handler is already installed in this process —
/// that would mean two servers are trying to own process lifecycle at
/// once, which is a startup bug, not a runtime condition to recover from.
pub fn install(shutdown: Arc<AtomicBool>) {
    ctrlc::set_handler(move || {
        tracing::info!("received termination signal, draining connections");
        shutdown.store(true, Ordering::SeqCst);
    })
    .expect("failed to install signal handler");
}
