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

//! Tier bucketing and quantum derivation.
//!
//! A node's tier is derived from its declared SGXt, never stored, so it
//! can't drift out of sync if the bucketing rule ever changes.

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// Identifies a tier bucket.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct TierIndex(u32);

/// Derived per-tier statistics, rebuilt on every scheduling event.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Tier {
    /// Active (arrived, non-retired) node count in this tier.
    pub n: u64,
    /// Sum of remaining budgets across those nodes.
    pub sum_remaining: u64,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl TierIndex {
    /// Computes the tier a node with the given SGXt belongs to.
    ///
    /// `⌈sgxt / total_tiers⌉`, per the fairness bucketing rule.
    #[must_use]
    pub fn of(sgxt: u32, total_tiers: u32) -> Self {
        Self(div_ceil_u32(sgxt, total_tiers))
    }
}

impl Tier {
    /// The quantum for this tier: `⌈sum_remaining / n²⌉`.
    ///
    /// `None` when the tier is empty (`n == 0`), since the quotient is
    /// undefined rather than zero — an empty tier never contributes a
    /// slice.
    #[must_use]
    pub fn quantum(&self) -> Option<u64> {
        if self.n == 0 {
            return None;
        }
        let denominator = self.n.checked_mul(self.n)?;
        Some(div_ceil_u64(self.sum_remaining, denominator))
    }
}

/// Ceiling division for `u32` operands.
fn div_ceil_u32(numerator: u32, denominator: u32) -> u32 {
    numerator.div_ceil(denominator)
}

/// Ceiling division for `u64` operands.
fn div_ceil_u64(numerator: u64, denominator: u64) -> u64 {
    numerator.div_ceil(denominator)
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_of_rounds_up() {
        assert_eq!(TierIndex::of(4, 1), TierIndex(4));
        assert_eq!(TierIndex::of(6, 2), TierIndex(3));
        assert_eq!(TierIndex::of(2, 2), TierIndex(1));
    }

    #[test]
    fn quantum_matches_scenario_one() {
        let tier = Tier {
            n: 2,
            sum_remaining: 8,
        };
        assert_eq!(tier.quantum(), Some(2));
    }

    #[test]
    fn quantum_matches_scenario_two_single_node_tier() {
        let tier = Tier {
            n: 1,
            sum_remaining: 6,
        };
        assert_eq!(tier.quantum(), Some(6));
    }

    #[test]
    fn empty_tier_has_no_quantum() {
        let tier = Tier::default();
        assert_eq!(tier.quantum(), None);
    }
}
