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

//! Request envelope shape and reply builders.

use poet_json::Value;

use crate::error::{Error, Result};

// ----------------------------------------------------------------------------
// Constants
// ----------------------------------------------------------------------------

/// Wire error kind for a malformed envelope (missing `method`/`data`, an
/// unknown method name, or malformed method-specific `data`).
pub const ENVELOPE_INVALID: &str = "ENVELOPE_INVALID";

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// A borrowed view of a request's `method` and `data` members.
#[derive(Clone, Copy, Debug)]
pub struct Envelope<'a> {
    /// The requested method name.
    pub method: &'a str,
    /// The method-specific payload.
    pub data: &'a Value,
}

// ----------------------------------------------------------------------------
// Functions
// ----------------------------------------------------------------------------

/// Reads `method` and `data` out of a top-level message.
///
/// # Errors
///
/// Returns [`Error::NotAnObject`] if `message` isn't a JSON object at all.
/// A present-but-malformed `method`/`data` (wrong type, or simply absent)
/// is reported as `Ok(None)` rather than an error, since that's still a
/// well-formed object the caller can describe precisely in a reply.
pub fn read(message: &Value) -> Result<Option<Envelope<'_>>> {
    let Value::Object(_) = message else {
        return Err(Error::NotAnObject);
    };
    let method = message.get("method").and_then(Value::as_str);
    let data = message.get("data");
    Ok(match (method, data) {
        (Some(method), Some(data)) => Some(Envelope { method, data }),
        _ => None,
    })
}

/// Builds a successful reply: `{"status": "ok", ...fields}`.
#[must_use]
pub fn ok(fields: Vec<(String, Value)>) -> Value {
    let mut members = Vec::with_capacity(fields.len() + 1);
    members.push(("status".to_string(), Value::String("ok".to_string())));
    members.extend(fields);
    Value::Object(members)
}

/// Builds the idle reply for `get_next_leader`: `{"status": "idle"}`.
#[must_use]
pub fn idle() -> Value {
    Value::Object(vec![(
        "status".to_string(),
        Value::String("idle".to_string()),
    )])
}

/// Builds an error reply: `{"status": "error", "kind": <kind>}`.
#[must_use]
pub fn error(kind: &str) -> Value {
    Value::Object(vec![
        ("status".to_string(), Value::String("error".to_string())),
        ("kind".to_string(), Value::String(kind.to_string())),
    ])
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_a_well_formed_envelope() {
        let message = Value::Object(vec![
            ("method".to_string(), Value::String("register".to_string())),
            ("data".to_string(), Value::Object(vec![])),
        ]);
        let envelope = read(&message).unwrap().unwrap();
        assert_eq!(envelope.method, "register");
    }

    #[test]
    fn missing_method_reads_as_none() {
        let message = Value::Object(vec![("data".to_string(), Value::Object(vec![]))]);
        assert!(read(&message).unwrap().is_none());
    }

    #[test]
    fn non_object_message_is_an_error() {
        assert!(read(&Value::Array(vec![])).is_err());
    }
}
