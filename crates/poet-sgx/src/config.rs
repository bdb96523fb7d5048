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

//! Scheduler configuration.

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// Bounds and sizing for a [`Scheduler`](crate::scheduler::Scheduler).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SchedulerConfig {
    /// Minimum acceptable declared SGXt.
    pub sgxt_lowerbound: u32,
    /// Maximum acceptable declared SGXt.
    pub sgxt_upperbound: u32,
    /// Number of tier buckets partitioning `[1, sgxt_upperbound]`.
    pub total_tiers: u32,
    /// Maximum number of simultaneously registered nodes.
    pub max_nodes: usize,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl SchedulerConfig {
    /// `TIER_COUNT = ⌈SGXT_UPPERBOUND / TOTAL_TIERS⌉`.
    #[must_use]
    pub fn tier_count(&self) -> u32 {
        self.sgxt_upperbound.div_ceil(self.total_tiers)
    }
}

impl Default for SchedulerConfig {
    /// Matches `poet-server`'s documented defaults.
    fn default() -> Self {
        Self {
            sgxt_lowerbound: 1,
            sgxt_upperbound: 1000,
            total_tiers: 10,
            max_nodes: 1024,
        }
    }
}
