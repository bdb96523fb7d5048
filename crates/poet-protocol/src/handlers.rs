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

//! Method handlers.
//!
//! The attestation fields are carried as opaque byte blobs — decoding them
//! from whatever wire encoding a real attestation scheme would use is
//! outside this layer, so a `data.public_key`/`data.signature` string is
//! taken as-is, by its raw UTF-8 bytes.

use std::sync::atomic::Ordering;

use poet_id::NodeId;
use poet_json::Value;
use poet_sgx::{Error as SgxError, StepOutcome};

use crate::envelope::{self, ENVELOPE_INVALID};
use crate::router::{Response, ServerStream, SharedContext};

// ----------------------------------------------------------------------------
// Functions
// ----------------------------------------------------------------------------

/// Registers a node: `data = {"public_key", "signature", "sgxt"}`.
pub fn register(ctx: &SharedContext, data: &Value, _stream: &mut dyn ServerStream) -> Response {
    let Some(public_key) = data.get("public_key").and_then(Value::as_str) else {
        return Response::Error(ENVELOPE_INVALID);
    };
    let Some(signature) = data.get("signature").and_then(Value::as_str) else {
        return Response::Error(ENVELOPE_INVALID);
    };
    let Some(sgxt) = data.get("sgxt").and_then(Value::as_u64).and_then(|n| u32::try_from(n).ok())
    else {
        return Response::Error(ENVELOPE_INVALID);
    };

    match ctx
        .scheduler
        .register(public_key.as_bytes().into(), signature.as_bytes().into(), sgxt)
    {
        Ok(id) => Response::Ok(envelope::ok(vec![(
            "id".to_string(),
            Value::Number(f64::from(id.as_u32())),
        )])),
        Err(SgxError::Rejected { .. }) => Response::Error("REJECTED"),
        Err(SgxError::CapacityExceeded) => Response::Error("CAPACITY_EXCEEDED"),
        Err(SgxError::NotFound(_)) => Response::Error("NOT_FOUND"),
    }
}

/// Looks up a node's remaining budget: `data = {"id"}`.
pub fn remaining_time(
    ctx: &SharedContext,
    data: &Value,
    _stream: &mut dyn ServerStream,
) -> Response {
    let Some(id) = data.get("id").and_then(Value::as_u64).and_then(|n| u32::try_from(n).ok())
    else {
        return Response::Error(ENVELOPE_INVALID);
    };

    match ctx.scheduler.remaining_time(NodeId::from_u32(id)) {
        #[allow(clippy::cast_precision_loss)]
        Some(remaining) => Response::Ok(envelope::ok(vec![(
            "remaining".to_string(),
            Value::Number(remaining as f64),
        )])),
        None => Response::Error("NOT_FOUND"),
    }
}

/// Advances the schedule by one decision: `data = {}`.
pub fn get_next_leader(
    ctx: &SharedContext,
    _data: &Value,
    _stream: &mut dyn ServerStream,
) -> Response {
    match ctx.scheduler.step() {
        #[allow(clippy::cast_precision_loss)]
        StepOutcome::Leader { id, slice } => Response::Ok(envelope::ok(vec![
            ("id".to_string(), Value::Number(f64::from(id.as_u32()))),
            ("slice".to_string(), Value::Number(slice as f64)),
        ])),
        StepOutcome::Idle => Response::Ok(envelope::idle()),
    }
}

/// Requests a graceful shutdown: `data = {}`.
///
/// Only flips the shared flag; the dispatcher's accept loop observes it at
/// its next suspension point and begins draining workers.
pub fn terminate(ctx: &SharedContext, _data: &Value, _stream: &mut dyn ServerStream) -> Response {
    ctx.shutdown.store(true, Ordering::SeqCst);
    Response::Ok(envelope::ok(vec![]))
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::sync::Arc;

    use poet_sgx::{Scheduler, SchedulerConfig};

    use super::*;

    fn ctx() -> SharedContext {
        SharedContext::new(Arc::new(Scheduler::new(SchedulerConfig::default())))
    }

    fn stream() -> Cursor<Vec<u8>> {
        Cursor::new(Vec::new())
    }

    fn data(fields: Vec<(&str, Value)>) -> Value {
        Value::Object(fields.into_iter().map(|(k, v)| (k.to_string(), v)).collect())
    }

    #[test]
    fn register_rejects_out_of_bounds_sgxt() {
        let ctx = ctx();
        let response = register(
            &ctx,
            &data(vec![
                ("public_key", Value::String("ab".to_string())),
                ("signature", Value::String("cd".to_string())),
                ("sgxt", Value::Number(0.0)),
            ]),
            &mut stream(),
        );
        assert!(matches!(response, Response::Error("REJECTED")));
    }

    #[test]
    fn register_missing_field_is_envelope_invalid() {
        let ctx = ctx();
        let response = register(
            &ctx,
            &data(vec![("public_key", Value::String("ab".to_string()))]),
            &mut stream(),
        );
        assert!(matches!(response, Response::Error(ENVELOPE_INVALID)));
    }

    #[test]
    fn remaining_time_unknown_id_is_not_found() {
        let ctx = ctx();
        let response = remaining_time(&ctx, &data(vec![("id", Value::Number(999.0))]), &mut stream());
        assert!(matches!(response, Response::Error("NOT_FOUND")));
    }

    #[test]
    fn get_next_leader_is_idle_with_no_nodes() {
        let ctx = ctx();
        let response = get_next_leader(&ctx, &data(vec![]), &mut stream());
        let Response::Ok(value) = response else {
            panic!("expected Ok response");
        };
        assert_eq!(value.get("status").and_then(Value::as_str), Some("idle"));
    }

    #[test]
    fn terminate_sets_the_shutdown_flag() {
        let ctx = ctx();
        terminate(&ctx, &data(vec![]), &mut stream());
        assert!(ctx.shutdown.load(Ordering::SeqCst));
    }
}
