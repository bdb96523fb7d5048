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

//! Node identifiers.
//!
//! Identifiers are allocated by a single [`Allocator`] owned by the SGX
//! table, are never reused, and are assigned in strictly increasing order,
//! which is what lets the scheduler break same-tick arrival ties by id.

use std::fmt;

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// A node identifier.
///
/// Newtype over `u32` so it can be used directly as a `slab::Slab` key and
/// printed in trace spans without indirection.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct NodeId(u32);

/// Monotonic identifier allocator.
///
/// # Examples
///
/// ```
/// use poet_id::Allocator;
///
/// let mut alloc = Allocator::new();
/// assert_eq!(alloc.next().as_u32(), 0);
/// assert_eq!(alloc.next().as_u32(), 1);
/// ```
#[derive(Clone, Debug, Default)]
pub struct Allocator {
    /// Next identifier to be handed out.
    next: u32,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl NodeId {
    /// Returns the identifier as a plain `u32`.
    #[inline]
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    /// Returns the identifier as a `usize`, for use as a slab key.
    #[inline]
    #[must_use]
    pub const fn as_usize(self) -> usize {
        self.0 as usize
    }

    /// Creates an identifier from a raw slab key.
    ///
    /// Only `poet-sgx` should call this, since it's the only crate that
    /// knows the allocation order matches the slab's key assignment.
    #[inline]
    #[must_use]
    pub const fn from_usize(key: usize) -> Self {
        #[allow(clippy::cast_possible_truncation)]
        Self(key as u32)
    }

    /// Reconstructs an identifier from its wire representation.
    ///
    /// For callers outside `poet-sgx`, such as the protocol layer turning
    /// a JSON integer back into an id to look up.
    #[inline]
    #[must_use]
    pub const fn from_u32(id: u32) -> Self {
        Self(id)
    }
}

impl Allocator {
    /// Creates an allocator starting at zero.
    #[must_use]
    pub const fn new() -> Self {
        Self { next: 0 }
    }

    /// Allocates the next identifier.
    pub fn next(&mut self) -> NodeId {
        let id = NodeId(self.next);
        self.next += 1;
        id
    }
}

// ----------------------------------------------------------------------------
// Trait implementations
// ----------------------------------------------------------------------------

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocator_yields_strictly_increasing_ids() {
        let mut alloc = Allocator::new();
        let a = alloc.next();
        let b = alloc.next();
        let c = alloc.next();
        assert!(a < b && b < c);
    }

    #[test]
    fn display_matches_expected_form() {
        let id = NodeId::from_usize(7);
        assert_eq!(id.to_string(), "#7");
    }
}
