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

//! Strict [RFC 8259](https://www.rfc-editor.org/rfc/rfc8259) JSON parsing
//! and message framing for a byte stream that carries no length header.
//!
//! A [`automaton::Checker`] validates a document one byte at a time with a
//! bounded stack and no backtracking, [`parser::parse`] turns validated
//! bytes into a [`value::Value`] tree, and [`framing::Reader`] combines
//! both to pull successive messages off any [`std::io::Read`] stream.

pub mod automaton;
pub mod error;
pub mod framing;
pub mod parser;
pub mod value;

pub use automaton::{Checker, Signal};
pub use error::{Error, Result};
pub use framing::{Frame, Reader};
pub use parser::parse;
pub use value::Value;
