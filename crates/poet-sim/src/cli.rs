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

//! Gathers the five inputs the simulator needs, one per line, with an
//! optional prompt printed first.
//!
//! Mirrors `get_input_from_user`'s prompt order: seed, node count, SGXt
//! upper bound, total tiers, arrival-time maximum. The SGXt *lower* bound
//! isn't prompted for here — the simulator fixes it at `1`, matching the
//! original simulator (only the server's bound is operator-configurable).

use std::io::{BufRead, Write};
use std::str::FromStr;

use crate::error::{Error, Result};

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// The resolved simulation parameters.
#[derive(Clone, Copy, Debug)]
pub struct Inputs {
    /// `None` means seed from entropy; a negative prompt value maps to this.
    pub seed: Option<u64>,
    /// Number of synthetic nodes to generate.
    pub node_count: usize,
    /// Upper bound on a generated node's declared SGXt.
    pub sgxt_upperbound: u32,
    /// Number of tier buckets.
    pub total_tiers: u32,
    /// Upper bound on a generated node's arrival tick.
    pub arrival_max: u64,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl Inputs {
    /// Reads the five inputs from `input`, printing a prompt before each
    /// one when `prompt` is set (the non-interactive mode the original
    /// selects whenever it's invoked with extra `argv` entries).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Input`] if a line isn't the expected integer, or
    /// if a generated population would be degenerate (zero nodes, or a
    /// zero upper bound on SGXt/tiers).
    pub fn read(prompt: bool, mut input: impl BufRead) -> Result<Self> {
        let seed: i64 = read_value(
            &mut input,
            prompt,
            "Seed for pseudo-random number generator (-1 for random): ",
        )?;
        let node_count: usize = read_value(&mut input, prompt, "Number of nodes in the network: ")?;
        let sgxt_upperbound: u32 = read_value(&mut input, prompt, "SGXtime upper bound: ")?;
        let total_tiers: u32 = read_value(&mut input, prompt, "Total number of tiers: ")?;
        let arrival_max: u64 = read_value(&mut input, prompt, "Arrival maximum time: ")?;

        if node_count == 0 {
            return Err(Error::Input("node count must be at least 1".to_string()));
        }
        if sgxt_upperbound == 0 {
            return Err(Error::Input("SGXt upper bound must be at least 1".to_string()));
        }
        if total_tiers == 0 {
            return Err(Error::Input("total tiers must be at least 1".to_string()));
        }

        Ok(Self {
            seed: u64::try_from(seed).ok(),
            node_count,
            sgxt_upperbound,
            total_tiers,
            arrival_max,
        })
    }
}

// ----------------------------------------------------------------------------
// Functions
// ----------------------------------------------------------------------------

/// Prints `label` (if `prompt`), then reads and parses one line as `T`.
fn read_value<T: FromStr>(input: &mut impl BufRead, prompt: bool, label: &str) -> Result<T> {
    if prompt {
        print!("{label}");
        std::io::stdout().flush()?;
    }
    let mut line = String::new();
    input.read_line(&mut line)?;
    line.trim()
        .parse()
        .map_err(|_| Error::Input(format!("expected an integer, got {:?}", line.trim())))
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn reads_all_five_values_in_order() {
        let input = Cursor::new(b"7\n5\n20\n4\n10\n".to_vec());
        let inputs = Inputs::read(false, input).unwrap();
        assert_eq!(inputs.seed, Some(7));
        assert_eq!(inputs.node_count, 5);
        assert_eq!(inputs.sgxt_upperbound, 20);
        assert_eq!(inputs.total_tiers, 4);
        assert_eq!(inputs.arrival_max, 10);
    }

    #[test]
    fn negative_seed_maps_to_entropy() {
        let input = Cursor::new(b"-1\n3\n10\n2\n5\n".to_vec());
        let inputs = Inputs::read(false, input).unwrap();
        assert_eq!(inputs.seed, None);
    }

    #[test]
    fn zero_node_count_is_rejected() {
        let input = Cursor::new(b"1\n0\n10\n2\n5\n".to_vec());
        assert!(Inputs::read(false, input).is_err());
    }

    #[test]
    fn non_numeric_line_is_rejected() {
        let input = Cursor::new(b"not-a-number\n".to_vec());
        assert!(Inputs::read(false, input).is_err());
    }
}
