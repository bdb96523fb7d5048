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

//! The message router.
//!
//! The router never touches [`poet_sgx::SgxTable`] directly — it looks up
//! the bound handler for a method name and calls it with the shared
//! context, so scheduler mutation is always funneled through
//! [`poet_sgx::Scheduler`]'s own API.

use std::io::{Read, Write};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use poet_json::Value;
use poet_sgx::Scheduler;

use crate::envelope::{self, ENVELOPE_INVALID};
use crate::method::{self, MethodEntry};

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// State shared across every handler invocation.
#[derive(Clone)]
pub struct SharedContext {
    /// The scheduler and node registry.
    pub scheduler: Arc<Scheduler>,
    /// Set by the `terminate` method; polled by the dispatcher's accept
    /// loop to begin a graceful shutdown.
    pub shutdown: Arc<AtomicBool>,
}

/// A handler's reply, before it's serialized onto the wire.
#[derive(Clone, Debug)]
pub enum Response {
    /// A fully-formed success or idle reply, e.g. `{"status": "ok", ...}`.
    Ok(Value),
    /// A failure, carrying the wire error kind.
    Error(&'static str),
}

/// The static method table and envelope validator.
#[derive(Clone, Copy)]
pub struct Router {
    methods: &'static [MethodEntry],
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl SharedContext {
    /// Creates a context with a fresh, unset shutdown flag.
    #[must_use]
    pub fn new(scheduler: Arc<Scheduler>) -> Self {
        Self {
            scheduler,
            shutdown: Arc::new(AtomicBool::new(false)),
        }
    }
}

impl Response {
    /// Converts this reply into the `Value` a worker writes to the wire.
    #[must_use]
    pub fn into_value(self) -> Value {
        match self {
            Self::Ok(value) => value,
            Self::Error(kind) => envelope::error(kind),
        }
    }
}

impl Router {
    /// Creates a router over the built-in method table
    /// ([`register`](method::register), [`remaining_time`](method::remaining_time),
    /// [`get_next_leader`](method::get_next_leader), [`terminate`](method::terminate)).
    #[must_use]
    pub fn new() -> Self {
        Self {
            methods: method::METHODS,
        }
    }

    /// Creates a router over a caller-supplied method table, for testing
    /// dispatch in isolation from the real handlers.
    #[must_use]
    pub fn with_methods(methods: &'static [MethodEntry]) -> Self {
        Self { methods }
    }

    /// Validates and dispatches one inbound message.
    ///
    /// `stream` is passed through to the handler so that future methods
    /// needing to write partial or streamed replies have a hook to do so;
    /// none of the built-in handlers use it today.
    pub fn dispatch(
        &self,
        ctx: &SharedContext,
        message: &Value,
        stream: &mut dyn ServerStream,
    ) -> Response {
        let envelope = match envelope::read(message) {
            Ok(Some(envelope)) => envelope,
            Ok(None) => return Response::Error(ENVELOPE_INVALID),
            Err(_) => return Response::Error(ENVELOPE_INVALID),
        };
        match self.methods.iter().find(|entry| entry.name == envelope.method) {
            Some(entry) => (entry.handler)(ctx, envelope.data, stream),
            None => Response::Error(ENVELOPE_INVALID),
        }
    }
}

// ----------------------------------------------------------------------------
// Traits
// ----------------------------------------------------------------------------

/// A bidirectional byte stream a handler could write directly to.
///
/// Blanket-implemented for any `Read + Write`, so tests can drive the
/// router over an in-memory duplex pair instead of a real socket.
pub trait ServerStream: Read + Write {}

impl<T: Read + Write> ServerStream for T {}

// ----------------------------------------------------------------------------
// Trait implementations
// ----------------------------------------------------------------------------

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use poet_sgx::SchedulerConfig;

    use super::*;

    fn ctx() -> SharedContext {
        SharedContext::new(Arc::new(Scheduler::new(SchedulerConfig::default())))
    }

    fn stream() -> Cursor<Vec<u8>> {
        Cursor::new(Vec::new())
    }

    #[test]
    fn unknown_method_is_envelope_invalid() {
        let router = Router::new();
        let message = Value::Object(vec![
            ("method".to_string(), Value::String("quux".to_string())),
            ("data".to_string(), Value::Object(vec![])),
        ]);
        let response = router.dispatch(&ctx(), &message, &mut stream());
        assert!(matches!(response, Response::Error(ENVELOPE_INVALID)));
    }

    #[test]
    fn missing_data_is_envelope_invalid() {
        let router = Router::new();
        let message = Value::Object(vec![(
            "method".to_string(),
            Value::String("register".to_string()),
        )]);
        let response = router.dispatch(&ctx(), &message, &mut stream());
        assert!(matches!(response, Response::Error(ENVELOPE_INVALID)));
    }

    #[test]
    fn register_then_remaining_time_round_trips() {
        let router = Router::new();
        let ctx = ctx();
        let register = Value::Object(vec![
            ("method".to_string(), Value::String("register".to_string())),
            (
                "data".to_string(),
                Value::Object(vec![
                    ("public_key".to_string(), Value::String("ab".to_string())),
                    ("signature".to_string(), Value::String("cd".to_string())),
                    ("sgxt".to_string(), Value::Number(4.0)),
                ]),
            ),
        ]);
        let response = router.dispatch(&ctx, &register, &mut stream()).into_value();
        let id = response.get("id").and_then(Value::as_f64).unwrap();

        let query = Value::Object(vec![
            (
                "method".to_string(),
                Value::String("remaining_time".to_string()),
            ),
            (
                "data".to_string(),
                Value::Object(vec![("id".to_string(), Value::Number(id))]),
            ),
        ]);
        let response = router.dispatch(&ctx, &query, &mut stream()).into_value();
        assert_eq!(response.get("remaining").and_then(Value::as_f64), Some(4.0));
    }
}
