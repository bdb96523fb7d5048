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

//! The fixed-capacity node registry.
//!
//! `SgxTable` itself holds no lock — [`Scheduler`](crate::scheduler::Scheduler)
//! is the single synchronized facade over both the table and the run
//! queue, so that the table and the queue it feeds always move under the
//! same critical section, per the single-lock discipline.

use poet_id::{Allocator, NodeId};
use slab::Slab;

use crate::error::{Error, Result};
use crate::node::{NodeRecord, NodeState};
use crate::tier::TierIndex;

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// A fixed-capacity, id-keyed registry of node records.
#[derive(Debug)]
pub struct SgxTable {
    slab: Slab<NodeRecord>,
    allocator: Allocator,
    capacity: usize,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl SgxTable {
    /// Creates an empty table bounded at `capacity` records.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            slab: Slab::with_capacity(capacity),
            allocator: Allocator::new(),
            capacity,
        }
    }

    /// Registers a node, assigning it the next identifier.
    ///
    /// The caller (the scheduler) is responsible for bounds-checking
    /// `sgxt` against `[SGXT_LOWERBOUND, SGXT_UPPERBOUND]` before calling
    /// this — the table only enforces capacity.
    pub fn insert(
        &mut self,
        public_key: Box<[u8]>,
        signature: Box<[u8]>,
        sgxt: u32,
        arrival_time: u64,
    ) -> Result<NodeId> {
        if self.slab.len() >= self.capacity {
            return Err(Error::CapacityExceeded);
        }
        let id = self.allocator.next();
        let record = NodeRecord {
            id,
            arrival_time,
            sgxt,
            remaining: u64::from(sgxt),
            leadership: 0,
            public_key,
            signature,
            state: NodeState::Pending,
        };
        let key = self.slab.insert(record);
        debug_assert_eq!(
            key,
            id.as_usize(),
            "slab never frees a slot, so its key must track the allocator"
        );
        Ok(id)
    }

    /// Looks up a record by identifier.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&NodeRecord> {
        self.slab.get(id.as_usize())
    }

    /// Looks up a record by identifier, for mutation by the scheduler.
    pub(crate) fn get_mut(&mut self, id: NodeId) -> Option<&mut NodeRecord> {
        self.slab.get_mut(id.as_usize())
    }

    /// Bills `delta` ticks against a node's remaining budget.
    ///
    /// # Panics
    ///
    /// Panics if `delta` exceeds the node's remaining budget or the node
    /// doesn't exist — both are internal invariant violations the
    /// scheduler must never trigger, since it only bills a node for as
    /// many ticks as its own slice computation allows.
    pub(crate) fn decrement(&mut self, id: NodeId, delta: u64) {
        let record = self
            .get_mut(id)
            .unwrap_or_else(|| panic!("decrement of unknown node {id}"));
        assert!(
            record.remaining >= delta,
            "decrement underflow on node {id}: remaining={}, delta={delta}",
            record.remaining
        );
        record.remaining -= delta;
        if record.remaining == 0 {
            record.state = NodeState::Retired;
        }
    }

    /// Snapshots every arrived, non-retired record as `(id, tier,
    /// remaining)`.
    #[must_use]
    pub fn snapshot_active(&self, total_tiers: u32) -> Vec<(NodeId, TierIndex, u64)> {
        self.slab
            .iter()
            .filter(|(_, record)| record.is_active())
            .map(|(_, record)| {
                (
                    record.id,
                    TierIndex::of(record.sgxt, total_tiers),
                    record.remaining,
                )
            })
            .collect()
    }

    /// Every record still in [`NodeState::Pending`], in ascending id
    /// order, used to find nodes whose arrival time has just been
    /// reached.
    pub(crate) fn pending_in_order(&self) -> Vec<NodeId> {
        let mut ids: Vec<NodeId> = self
            .slab
            .iter()
            .filter(|(_, record)| record.state == NodeState::Pending)
            .map(|(_, record)| record.id)
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Whether any record still has budget left to bill.
    #[must_use]
    pub fn has_runnable(&self) -> bool {
        self.slab.iter().any(|(_, record)| record.remaining > 0)
    }

    /// Number of registered records, retired or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slab.len()
    }

    /// Whether the table holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slab.is_empty()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn blob() -> Box<[u8]> {
        Box::from([0u8; 4])
    }

    #[test]
    fn insert_assigns_strictly_increasing_ids() {
        let mut table = SgxTable::new(4);
        let a = table.insert(blob(), blob(), 4, 0).unwrap();
        let b = table.insert(blob(), blob(), 4, 0).unwrap();
        assert!(a.as_u32() < b.as_u32());
    }

    #[test]
    fn insert_rejects_past_capacity() {
        let mut table = SgxTable::new(1);
        table.insert(blob(), blob(), 4, 0).unwrap();
        assert_eq!(
            table.insert(blob(), blob(), 4, 0).unwrap_err(),
            Error::CapacityExceeded
        );
    }

    #[test]
    fn decrement_retires_at_zero() {
        let mut table = SgxTable::new(4);
        let id = table.insert(blob(), blob(), 2, 0).unwrap();
        table.decrement(id, 2);
        assert_eq!(table.get(id).unwrap().state, NodeState::Retired);
        assert_eq!(table.get(id).unwrap().remaining, 0);
    }

    #[test]
    #[should_panic(expected = "decrement underflow")]
    fn decrement_past_remaining_panics() {
        let mut table = SgxTable::new(4);
        let id = table.insert(blob(), blob(), 1, 0).unwrap();
        table.decrement(id, 2);
    }

    #[test]
    fn snapshot_active_excludes_pending_and_retired() {
        let mut table = SgxTable::new(4);
        let pending = table.insert(blob(), blob(), 4, 5).unwrap();
        let ready = table.insert(blob(), blob(), 4, 0).unwrap();
        table.get_mut(ready).unwrap().state = NodeState::Ready;
        let retired = table.insert(blob(), blob(), 4, 0).unwrap();
        table.decrement(retired, 4);

        let snapshot = table.snapshot_active(1);
        let ids: Vec<_> = snapshot.iter().map(|(id, ..)| *id).collect();
        assert_eq!(ids, vec![ready]);
        assert!(!ids.contains(&pending));
    }
}
