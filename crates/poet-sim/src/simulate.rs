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

//! Drives a seeded scheduler to completion, recording the full leader-tick
//! sequence (`arrange`'s `nodes_queue`, in the original).

use poet_id::NodeId;
use poet_sgx::{Scheduler, StepOutcome};

// ----------------------------------------------------------------------------
// Functions
// ----------------------------------------------------------------------------

/// Calls [`Scheduler::step`] until the scheduler reports [`StepOutcome::Idle`],
/// expanding each billed slice into one sequence entry per tick.
#[must_use]
pub fn run(scheduler: &Scheduler) -> Vec<NodeId> {
    let mut sequence = Vec::new();
    loop {
        match scheduler.step() {
            StepOutcome::Idle => return sequence,
            StepOutcome::Leader { id, slice } => {
                for _ in 0..slice {
                    sequence.push(id);
                }
            }
        }
    }
}
