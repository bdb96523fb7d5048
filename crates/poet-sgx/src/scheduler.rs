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

//! The tiered adaptive scheduler.
//!
//! `Scheduler` is the single synchronized entry point for both the node
//! registry and the run queue: the two always move under the same
//! critical section, since the run queue's only discipline is "accessed
//! from the thread currently holding the SGX lock". Handlers call
//! [`Scheduler::register`] and [`Scheduler::step`]; the router never
//! touches [`SgxTable`] directly.

use std::collections::VecDeque;
use std::sync::Mutex;

use ahash::AHashMap;
use poet_id::NodeId;

use crate::config::SchedulerConfig;
use crate::error::{Error, Result};
use crate::node::NodeState;
use crate::table::SgxTable;
use crate::tier::{Tier, TierIndex};

// ----------------------------------------------------------------------------
// Enums
// ----------------------------------------------------------------------------

/// The outcome of one [`Scheduler::step`] call.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum StepOutcome {
    /// `id` was billed for `slice` ticks as leader.
    Leader {
        /// The node billed during this step.
        id: NodeId,
        /// Number of ticks billed.
        slice: u64,
    },
    /// No node has any budget left to bill.
    Idle,
}

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// Mutable scheduler state, moved under one lock.
struct State {
    table: SgxTable,
    queue: VecDeque<NodeId>,
    clock: u64,
    tiers: AHashMap<TierIndex, Tier>,
}

/// The tiered adaptive scheduler and node registry.
pub struct Scheduler {
    config: SchedulerConfig,
    state: Mutex<State>,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl Scheduler {
    /// Creates an empty scheduler with the given bounds.
    #[must_use]
    pub fn new(config: SchedulerConfig) -> Self {
        Self {
            state: Mutex::new(State {
                table: SgxTable::new(config.max_nodes),
                queue: VecDeque::new(),
                clock: 0,
                tiers: AHashMap::new(),
            }),
            config,
        }
    }

    /// The scheduler's configuration.
    #[must_use]
    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Registers a node arriving at the current clock tick — the only
    /// form reachable from the wire protocol, which has no way to
    /// declare a future arrival.
    pub fn register(
        &self,
        public_key: Box<[u8]>,
        signature: Box<[u8]>,
        sgxt: u32,
    ) -> Result<NodeId> {
        self.register_internal(public_key, signature, sgxt, None)
    }

    /// Registers a node with an explicit arrival time.
    ///
    /// The wire protocol never calls this with anything but the current
    /// clock (see [`Scheduler::register`]); it exists so a simulator can
    /// seed a synthetic population with pre-assigned arrival ticks and
    /// let the clock-driven admission loop in [`Scheduler::step`] bring
    /// each one in when its time comes.
    pub fn register_at(
        &self,
        public_key: Box<[u8]>,
        signature: Box<[u8]>,
        sgxt: u32,
        arrival_time: u64,
    ) -> Result<NodeId> {
        self.register_internal(public_key, signature, sgxt, Some(arrival_time))
    }

    fn register_internal(
        &self,
        public_key: Box<[u8]>,
        signature: Box<[u8]>,
        sgxt: u32,
        arrival_time: Option<u64>,
    ) -> Result<NodeId> {
        if sgxt < self.config.sgxt_lowerbound || sgxt > self.config.sgxt_upperbound {
            return Err(Error::Rejected {
                sgxt,
                lowerbound: self.config.sgxt_lowerbound,
                upperbound: self.config.sgxt_upperbound,
            });
        }
        let mut state = self.lock();
        let clock = state.clock;
        let arrival_time = arrival_time.unwrap_or(clock);
        let id = state.table.insert(public_key, signature, sgxt, arrival_time)?;
        if arrival_time <= clock {
            self.admit_locked(&mut state, id);
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(node = %id, sgxt, arrival_time, "node registered");
        Ok(id)
    }

    /// Returns a node's remaining budget, if it's registered.
    #[must_use]
    pub fn remaining_time(&self, id: NodeId) -> Option<u64> {
        self.lock().table.get(id).map(|record| record.remaining)
    }

    /// Returns a node's accumulated leadership count, if it's registered.
    #[must_use]
    pub fn leadership(&self, id: NodeId) -> Option<u64> {
        self.lock().table.get(id).map(|record| record.leadership)
    }

    /// Snapshots every arrived, non-retired node.
    #[must_use]
    pub fn snapshot_active(&self) -> Vec<(NodeId, TierIndex, u64)> {
        self.lock().table.snapshot_active(self.config.total_tiers)
    }

    /// Advances the schedule by one decision.
    ///
    /// Drives the clock forward when the run queue is empty, admitting
    /// any nodes whose arrival time is reached, then bills the head of
    /// the queue for one slice (`min(tier quantum, remaining)` ticks).
    pub fn step(&self) -> StepOutcome {
        let mut state = self.lock();
        loop {
            if !state.table.has_runnable() {
                return StepOutcome::Idle;
            }
            if state.queue.is_empty() {
                state.clock += 1;
                self.admit_arrived(&mut state);
                continue;
            }

            let head = state.queue.pop_front().expect("queue checked non-empty above");
            state
                .table
                .get_mut(head)
                .expect("queued node must be registered")
                .state = NodeState::Running;
            // The tier table is only rebuilt on admission (see
            // `admit_locked`), never on a bare dequeue: recomputing here
            // would let a slice's own quantum shrink mid-flight as the
            // head's remaining budget falls, which the non-preemption
            // invariant forbids.

            let sgxt = state.table.get(head).expect("queued node must be registered").sgxt;
            let tier = TierIndex::of(sgxt, self.config.total_tiers);
            let quantum = state
                .tiers
                .get(&tier)
                .and_then(Tier::quantum)
                .unwrap_or(0);
            let budget = state.table.get(head).expect("queued node must exist").remaining;
            let slice = quantum.min(budget);

            for _ in 0..slice {
                state.clock += 1;
                state.table.decrement(head, 1);
                self.admit_arrived(&mut state);
            }

            let remaining = state.table.get(head).expect("queued node must exist").remaining;
            if remaining > 0 {
                state.table.get_mut(head).expect("node must exist").state = NodeState::Ready;
                state.queue.push_back(head);
            } else {
                state.table.get_mut(head).expect("node must exist").leadership += 1;
            }

            #[cfg(feature = "tracing")]
            tracing::debug!(leader = %head, slice, "quantum slice billed");
            return StepOutcome::Leader { id: head, slice };
        }
    }

    /// Admits every still-pending node whose arrival time has been
    /// reached by the current clock, in ascending id order.
    fn admit_arrived(&self, state: &mut State) {
        let clock = state.clock;
        let arrived: Vec<NodeId> = state
            .table
            .pending_in_order()
            .into_iter()
            .filter(|id| {
                state
                    .table
                    .get(*id)
                    .is_some_and(|record| record.arrival_time <= clock)
            })
            .collect();
        for id in arrived {
            self.admit_locked(state, id);
        }
    }

    /// Moves a pending node to `READY` and enqueues it; a no-op if it's
    /// already queued or running, matching `admit`'s idempotence
    /// requirement.
    fn admit_locked(&self, state: &mut State, id: NodeId) {
        if let Some(record) = state.table.get_mut(id) {
            if record.state == NodeState::Pending {
                record.state = NodeState::Ready;
                state.queue.push_back(id);
            }
        }
        self.recompute_tiers(state);
    }

    /// Rebuilds the tier table from every currently active node.
    fn recompute_tiers(&self, state: &mut State) {
        state.tiers.clear();
        for (_, tier, remaining) in state.table.snapshot_active(self.config.total_tiers) {
            let entry = state.tiers.entry(tier).or_default();
            entry.n += 1;
            entry.sum_remaining += remaining;
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().expect("sgx table mutex poisoned")
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

    fn config(total_tiers: u32) -> SchedulerConfig {
        SchedulerConfig {
            sgxt_lowerbound: 1,
            sgxt_upperbound: 100,
            total_tiers,
            max_nodes: 16,
        }
    }

    /// Drives `step` until idle, returning the leader sequence.
    fn run_to_completion(scheduler: &Scheduler) -> Vec<NodeId> {
        let mut sequence = Vec::new();
        loop {
            match scheduler.step() {
                StepOutcome::Idle => break,
                StepOutcome::Leader { id, slice } => {
                    for _ in 0..slice {
                        sequence.push(id);
                    }
                }
            }
        }
        sequence
    }

    #[test]
    fn scenario_one_two_node_single_tier() {
        let scheduler = Scheduler::new(config(1));
        let a = scheduler.register(blob(), blob(), 4).unwrap();
        let b = scheduler.register(blob(), blob(), 4).unwrap();

        let sequence = run_to_completion(&scheduler);
        assert_eq!(sequence, vec![a, a, b, b, a, a, b, b]);
        assert_eq!(scheduler.remaining_time(a), Some(0));
        assert_eq!(scheduler.remaining_time(b), Some(0));
    }

    #[test]
    fn scenario_two_staggered_arrivals() {
        let scheduler = Scheduler::new(config(2));
        let a = scheduler.register_at(blob(), blob(), 6, 0).unwrap();
        let b = scheduler.register_at(blob(), blob(), 2, 2).unwrap();

        let sequence = run_to_completion(&scheduler);
        assert_eq!(sequence, [vec![a; 6], vec![b; 2]].concat());
        assert_eq!(scheduler.lock().table.get(a).unwrap().leadership, 1);
        assert_eq!(scheduler.lock().table.get(b).unwrap().leadership, 1);
    }

    #[test]
    fn reject_out_of_bounds_sgxt() {
        let scheduler = Scheduler::new(config(1));
        assert!(scheduler.register(blob(), blob(), 0).is_err());
        assert!(scheduler.register(blob(), blob(), 1000).is_err());
    }

    #[test]
    fn capacity_exceeded_after_max_nodes() {
        let scheduler = Scheduler::new(SchedulerConfig {
            max_nodes: 2,
            ..config(1)
        });
        scheduler.register(blob(), blob(), 4).unwrap();
        scheduler.register(blob(), blob(), 4).unwrap();
        assert!(matches!(
            scheduler.register(blob(), blob(), 4),
            Err(Error::CapacityExceeded)
        ));
    }

    #[test]
    fn queue_membership_stays_unique_across_admissions() {
        let scheduler = Scheduler::new(config(1));
        let a = scheduler.register(blob(), blob(), 4).unwrap();
        let state = scheduler.lock();
        let occurrences = state.queue.iter().filter(|&&id| id == a).count();
        assert_eq!(occurrences, 1);
    }

    #[test]
    fn fairness_within_a_tier_after_a_full_round() {
        let scheduler = Scheduler::new(config(1));
        let a = scheduler.register(blob(), blob(), 20).unwrap();
        let b = scheduler.register(blob(), blob(), 20).unwrap();
        let c = scheduler.register(blob(), blob(), 20).unwrap();

        run_to_completion(&scheduler);

        let lock = scheduler.lock();
        let la = lock.table.get(a).unwrap().leadership;
        let lb = lock.table.get(b).unwrap().leadership;
        let lc = lock.table.get(c).unwrap().leadership;
        assert!(la.abs_diff(lb) <= 1);
        assert!(lb.abs_diff(lc) <= 1);
    }
}
