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

//! Drives the dispatcher and router end-to-end over an in-memory duplex,
//! never a real socket.

use std::collections::VecDeque;
use std::io::{self, Read, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use poet_json::{Frame, Reader};
use poet_protocol::{Router, SharedContext};
use poet_server::dispatcher::{self, Duplex, Listener};
use poet_sgx::{Scheduler, SchedulerConfig};

// ----------------------------------------------------------------------------
// Test duplex and listener
// ----------------------------------------------------------------------------

#[derive(Clone)]
struct MemoryDuplex {
    inbound: Arc<Mutex<VecDeque<u8>>>,
    outbound: Arc<Mutex<VecDeque<u8>>>,
}

impl MemoryDuplex {
    fn pair() -> (Self, Self) {
        let a = Arc::new(Mutex::new(VecDeque::new()));
        let b = Arc::new(Mutex::new(VecDeque::new()));
        (
            Self {
                inbound: Arc::clone(&a),
                outbound: Arc::clone(&b),
            },
            Self { inbound: b, outbound: a },
        )
    }
}

impl Read for MemoryDuplex {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut inbound = self.inbound.lock().expect("memory duplex mutex poisoned");
        let n = inbound.len().min(buf.len());
        for slot in buf.iter_mut().take(n) {
            *slot = inbound.pop_front().expect("checked length above");
        }
        Ok(n)
    }
}

impl Write for MemoryDuplex {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.outbound
            .lock()
            .expect("memory duplex mutex poisoned")
            .extend(buf.iter().copied());
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Duplex for MemoryDuplex {
    fn try_clone(&self) -> io::Result<Self> {
        Ok(self.clone())
    }
}

/// Hands out server-side [`MemoryDuplex`] halves pushed onto a channel,
/// so a test controls exactly when each "connection" becomes available.
struct MemoryListener {
    incoming: Mutex<Receiver<MemoryDuplex>>,
}

impl MemoryListener {
    fn new() -> (Self, Sender<MemoryDuplex>) {
        let (sender, receiver) = mpsc::channel();
        (
            Self {
                incoming: Mutex::new(receiver),
            },
            sender,
        )
    }
}

impl Listener for MemoryListener {
    type Stream = MemoryDuplex;

    fn accept(&self) -> io::Result<MemoryDuplex> {
        match self
            .incoming
            .lock()
            .expect("memory listener mutex poisoned")
            .try_recv()
        {
            Ok(stream) => Ok(stream),
            Err(TryRecvError::Empty) => Err(io::Error::from(io::ErrorKind::WouldBlock)),
            Err(TryRecvError::Disconnected) => Err(io::Error::from(io::ErrorKind::BrokenPipe)),
        }
    }
}

/// Reads exactly one framed JSON reply off a client-side duplex half.
fn read_reply(client: &mut MemoryDuplex) -> poet_json::Value {
    let mut reader = Reader::new(client.clone());
    loop {
        if let Frame::Message(value) = reader.read_message().expect("valid reply") {
            return value;
        }
        thread::sleep(Duration::from_millis(5));
    }
}

fn register_request() -> Vec<u8> {
    br#"{"method":"register","data":{"public_key":"ab","signature":"cd","sgxt":4}}"#.to_vec()
}

// ----------------------------------------------------------------------------
// Scenario 3 — registration under load
// ----------------------------------------------------------------------------

#[test]
fn scenario_three_registration_under_load() {
    let (listener, incoming) = MemoryListener::new();
    let pool = Arc::new(poet_executor::WorkerPool::new(20));
    let ctx = SharedContext::new(Arc::new(Scheduler::new(SchedulerConfig {
        max_nodes: 64,
        ..SchedulerConfig::default()
    })));
    let router = Router::new();
    let shutdown = Arc::new(AtomicBool::new(false));

    let serve_pool = Arc::clone(&pool);
    let serve_ctx = ctx.clone();
    let serve_shutdown = Arc::clone(&shutdown);
    let server = thread::spawn(move || {
        dispatcher::serve(&listener, &serve_pool, &serve_ctx, router, &serve_shutdown);
    });

    // `MemoryDuplex::read` reports an empty queue as a clean EOF rather than
    // blocking, unlike a real socket, so every request must be written
    // before its server half is handed to the listener.
    let mut clients = Vec::new();
    for _ in 0..21 {
        let (mut client, server_half) = MemoryDuplex::pair();
        client.write_all(&register_request()).expect("write succeeds");
        incoming.send(server_half).expect("listener still open");
        clients.push(client);
    }

    let replies: Vec<_> = clients
        .iter_mut()
        .map(|client| read_reply(client).get("id").and_then(poet_json::Value::as_f64))
        .collect();

    assert!(replies.iter().all(Option::is_some));
    let mut ids: Vec<_> = replies.into_iter().flatten().collect();
    ids.sort_by(|a, b| a.partial_cmp(b).unwrap());
    ids.dedup();
    assert_eq!(ids.len(), 21);

    shutdown.store(true, Ordering::SeqCst);
    drop(pool);
    server.join().expect("server thread does not panic");
}

// ----------------------------------------------------------------------------
// Scenario 4 — malformed JSON, connection stays open
// ----------------------------------------------------------------------------

#[test]
fn scenario_four_malformed_json_keeps_connection_open() {
    let ctx = SharedContext::new(Arc::new(Scheduler::new(SchedulerConfig::default())));
    let (mut client, server) = MemoryDuplex::pair();
    client.write_all(b"{\"method\":}").unwrap();
    client.write_all(&register_request()).unwrap();

    dispatcher_test_drive(server, ctx, Router::new());

    let syntax_reply = read_reply(&mut client);
    assert_eq!(
        syntax_reply.get("kind").and_then(poet_json::Value::as_str),
        Some("SYNTAX_ERROR")
    );
    let register_reply = read_reply(&mut client);
    assert_eq!(
        register_reply.get("status").and_then(poet_json::Value::as_str),
        Some("ok")
    );
}

// ----------------------------------------------------------------------------
// Scenario 5 — unknown method
// ----------------------------------------------------------------------------

#[test]
fn scenario_five_unknown_method_is_envelope_invalid() {
    let ctx = SharedContext::new(Arc::new(Scheduler::new(SchedulerConfig::default())));
    let message = poet_json::Value::Object(vec![
        ("method".to_string(), poet_json::Value::String("quux".to_string())),
        ("data".to_string(), poet_json::Value::Object(vec![])),
    ]);
    let reply = Router::new()
        .dispatch(&ctx, &message, &mut io::Cursor::new(Vec::new()))
        .into_value();
    assert_eq!(
        reply.get("kind").and_then(poet_json::Value::as_str),
        Some("ENVELOPE_INVALID")
    );
}

// ----------------------------------------------------------------------------
// Scenario 6 — capacity
// ----------------------------------------------------------------------------

#[test]
fn scenario_six_capacity_exceeded_on_the_fourth_node() {
    let ctx = SharedContext::new(Arc::new(Scheduler::new(SchedulerConfig {
        max_nodes: 3,
        ..SchedulerConfig::default()
    })));
    let router = Router::new();

    let mut ids = Vec::new();
    for _ in 0..3 {
        let message = poet_json::Value::Object(vec![
            ("method".to_string(), poet_json::Value::String("register".to_string())),
            (
                "data".to_string(),
                poet_json::Value::Object(vec![
                    ("public_key".to_string(), poet_json::Value::String("ab".to_string())),
                    ("signature".to_string(), poet_json::Value::String("cd".to_string())),
                    ("sgxt".to_string(), poet_json::Value::Number(4.0)),
                ]),
            ),
        ]);
        let reply = router
            .dispatch(&ctx, &message, &mut io::Cursor::new(Vec::new()))
            .into_value();
        ids.push(reply.get("id").and_then(poet_json::Value::as_f64).expect("registered"));
    }
    assert_eq!(ids, vec![0.0, 1.0, 2.0]);

    let fourth = poet_json::Value::Object(vec![
        ("method".to_string(), poet_json::Value::String("register".to_string())),
        (
            "data".to_string(),
            poet_json::Value::Object(vec![
                ("public_key".to_string(), poet_json::Value::String("ab".to_string())),
                ("signature".to_string(), poet_json::Value::String("cd".to_string())),
                ("sgxt".to_string(), poet_json::Value::Number(4.0)),
            ]),
        ),
    ]);
    let reply = router
        .dispatch(&ctx, &fourth, &mut io::Cursor::new(Vec::new()))
        .into_value();
    assert_eq!(
        reply.get("kind").and_then(poet_json::Value::as_str),
        Some("CAPACITY_EXCEEDED")
    );
}

// ----------------------------------------------------------------------------
// Shared driver for a single-connection scenario
// ----------------------------------------------------------------------------

/// Runs one connection's worth of [`dispatcher::serve`] machinery without
/// spinning up a whole pool, by feeding a single pre-built stream through
/// a one-shot listener.
fn dispatcher_test_drive(server: MemoryDuplex, ctx: SharedContext, router: Router) {
    let (listener, incoming) = MemoryListener::new();
    incoming.send(server).expect("listener still open");
    drop(incoming);
    let pool = Arc::new(poet_executor::WorkerPool::new(1));
    let shutdown = Arc::new(AtomicBool::new(false));
    let worker_shutdown = Arc::clone(&shutdown);

    let handle = {
        let pool = Arc::clone(&pool);
        thread::spawn(move || {
            dispatcher::serve(&listener, &pool, &ctx, router, &worker_shutdown);
        })
    };

    thread::sleep(Duration::from_millis(100));
    shutdown.store(true, Ordering::SeqCst);
    drop(pool);
    handle.join().expect("server thread does not panic");
}
