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

//! A single participant's record in the SGX table.

use poet_id::NodeId;

// ----------------------------------------------------------------------------
// Enums
// ----------------------------------------------------------------------------

/// Where a node sits in its lifecycle.
///
/// `PENDING -> READY -> RUNNING -> {READY, RETIRED}`, with `RETIRED`
/// terminal. The scheduler is the only writer of this field after
/// [`NodeRecord`] is created.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum NodeState {
    /// Arrival time is still in the future.
    Pending,
    /// Eligible and sitting in the run queue.
    Ready,
    /// Currently being billed as the leader.
    Running,
    /// `remaining` reached zero; never re-enters the queue.
    Retired,
}

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// A node's registration record.
#[derive(Clone, Debug)]
pub struct NodeRecord {
    /// Monotonic, unique identifier.
    pub id: NodeId,
    /// Logical clock tick at which the node becomes eligible.
    pub arrival_time: u64,
    /// Declared elapsed-time budget, as registered.
    pub sgxt: u32,
    /// Remaining budget; non-increasing, bounded by `sgxt`.
    pub remaining: u64,
    /// Number of completed quantum slices as leader.
    pub leadership: u64,
    /// Opaque attestation public key.
    pub public_key: Box<[u8]>,
    /// Opaque signature over the registration payload.
    pub signature: Box<[u8]>,
    /// Lifecycle state.
    pub state: NodeState,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl NodeRecord {
    /// Whether this node can still be billed.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !matches!(self.state, NodeState::Pending | NodeState::Retired)
    }
}
