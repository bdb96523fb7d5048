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

//! Errors.

use std::io;

use thiserror::Error;

// ----------------------------------------------------------------------------
// Enums
// ----------------------------------------------------------------------------

/// Error.
///
/// A clean close with no bytes belonging to a new message isn't an error
/// at all — see [`crate::framing::Frame::Eof`].
#[derive(Debug, Error)]
pub enum Error {
    /// An I/O error occurred while reading from the stream.
    #[error("transport error: {0}")]
    Transport(#[from] io::Error),

    /// The byte stream violates the JSON grammar.
    #[error("syntax error at byte offset {offset}: {reason}")]
    Syntax {
        /// Offset of the offending byte within the message.
        offset: usize,
        /// Human-readable reason, never shown to untrusted peers verbatim.
        reason: &'static str,
    },
}

/// Result.
pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    /// Creates a syntax error.
    #[must_use]
    pub(crate) fn syntax(offset: usize, reason: &'static str) -> Self {
        Self::Syntax { offset, reason }
    }
}
