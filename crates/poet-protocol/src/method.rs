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

//! The static method table.

use poet_json::Value;

use crate::handlers;
use crate::router::{Response, ServerStream, SharedContext};

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// One entry in the method table.
#[derive(Clone, Copy)]
pub struct MethodEntry {
    /// The method name as it appears in the `"method"` field.
    pub name: &'static str,
    /// The bound handler.
    pub handler: fn(&SharedContext, &Value, &mut dyn ServerStream) -> Response,
}

// ----------------------------------------------------------------------------
// Constants
// ----------------------------------------------------------------------------

/// The built-in method table, in the order methods are documented.
pub static METHODS: &[MethodEntry] = &[
    MethodEntry {
        name: "register",
        handler: handlers::register,
    },
    MethodEntry {
        name: "remaining_time",
        handler: handlers::remaining_time,
    },
    MethodEntry {
        name: "get_next_leader",
        handler: handlers::get_next_leader,
    },
    MethodEntry {
        name: "terminate",
        handler: handlers::terminate,
    },
];
