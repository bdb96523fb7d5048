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

//! Startup errors.
//!
//! Everything here is `FATAL_INIT`: a condition that prevents the server
//! from ever accepting a connection. None of these variants are surfaced
//! over the wire — a peer only ever sees `poet-protocol`'s reply kinds.

use std::io;
use std::net::AddrParseError;

use thiserror::Error;

// ----------------------------------------------------------------------------
// Enums
// ----------------------------------------------------------------------------

/// Error.
#[derive(Debug, Error)]
pub enum Error {
    /// A CLI flag or `POET_*` environment variable couldn't be parsed.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The listening socket address was malformed.
    #[error("invalid bind address: {0}")]
    Addr(#[from] AddrParseError),

    /// Binding the listening socket failed.
    #[error("failed to bind: {0}")]
    Bind(#[source] io::Error),
}

/// Result.
pub type Result<T, E = Error> = std::result::Result<T, E>;
