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

//! Generates a synthetic node population and seeds a scheduler with it.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use poet_id::NodeId;
use poet_sgx::Scheduler;

use crate::cli::Inputs;
use crate::error::Result;

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// A generated node's fixed attributes, kept around after registration so
/// waiting-time and elapsed-time can be computed against them later.
#[derive(Clone, Copy, Debug)]
pub struct Node {
    /// The tick at which the node becomes eligible.
    pub arrival_time: u64,
    /// The declared SGXt budget.
    pub sgxt: u32,
}

// ----------------------------------------------------------------------------
// Functions
// ----------------------------------------------------------------------------

/// Builds an `StdRng`, from the seed if one was given, or from entropy.
#[must_use]
pub fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Draws `inputs.node_count` nodes, each with an SGXt in `[1,
/// sgxt_upperbound]` and an arrival tick in `[0, arrival_max]`.
#[must_use]
pub fn generate(inputs: &Inputs, rng: &mut StdRng) -> Vec<Node> {
    (0..inputs.node_count)
        .map(|_| Node {
            arrival_time: rng.gen_range(0..=inputs.arrival_max),
            sgxt: rng.gen_range(1..=inputs.sgxt_upperbound),
        })
        .collect()
}

/// Registers every generated node at its pre-assigned arrival time,
/// returning each node paired with the identifier the scheduler assigned
/// it (registration order, so indices match).
pub fn seed(scheduler: &Scheduler, nodes: &[Node]) -> Result<Vec<(NodeId, Node)>> {
    nodes
        .iter()
        .enumerate()
        .map(|(index, &node)| {
            let key: Box<[u8]> = index.to_be_bytes().to_vec().into_boxed_slice();
            let id = scheduler.register_at(key.clone(), key, node.sgxt, node.arrival_time)?;
            Ok((id, node))
        })
        .collect()
}
