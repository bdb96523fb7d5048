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

//! The accept loop: hands each connection to a worker for its lifetime.
//!
//! [`Listener`] is the seam that lets the whole loop run in tests over an
//! in-memory duplex instead of a real socket. A checked-out worker owns
//! its connection until the peer disconnects or a framing error occurs;
//! the worker then releases itself back to the pool.

use std::io::{self, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use poet_executor::{Job, WorkerPool};
use poet_json::{Frame, Reader};
use poet_protocol::{Response, Router, SharedContext};

// ----------------------------------------------------------------------------
// Constants
// ----------------------------------------------------------------------------

/// How long the accept loop sleeps between non-blocking `accept()` polls.
const ACCEPT_POLL_INTERVAL: Duration = Duration::from_millis(50);

// ----------------------------------------------------------------------------
// Traits
// ----------------------------------------------------------------------------

/// A duplex byte stream that can be split into an independent read handle
/// and kept as a write handle, the way a socket's file descriptor is
/// shared by [`TcpStream::try_clone`].
pub trait Duplex: Read + Write + Send + 'static {
    /// Returns an independent handle to the same underlying connection.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform fails to duplicate the handle.
    fn try_clone(&self) -> io::Result<Self>
    where
        Self: Sized;
}

/// Accepts connections, abstracting over a real socket or a test double.
pub trait Listener: Send {
    /// The per-connection stream type this listener produces.
    type Stream: Duplex;

    /// Accepts the next connection, non-blockingly.
    ///
    /// # Errors
    ///
    /// Returns [`io::ErrorKind::WouldBlock`] if no connection is pending,
    /// or any other I/O error from the underlying transport.
    fn accept(&self) -> io::Result<Self::Stream>;
}

// ----------------------------------------------------------------------------
// Trait implementations
// ----------------------------------------------------------------------------

impl Duplex for TcpStream {
    fn try_clone(&self) -> io::Result<Self> {
        TcpStream::try_clone(self)
    }
}

impl Listener for TcpListener {
    type Stream = TcpStream;

    fn accept(&self) -> io::Result<TcpStream> {
        let (stream, _addr) = TcpListener::accept(self)?;
        stream.set_nodelay(true)?;
        Ok(stream)
    }
}

// ----------------------------------------------------------------------------
// Functions
// ----------------------------------------------------------------------------

/// Runs the accept loop until `shutdown` is set.
///
/// On each iteration: accept (or poll, if nothing is pending), check out
/// an idle worker, and dispatch a job that owns the connection until it
/// closes. Stops immediately if the pool itself reports it's shutting
/// down, since that means no worker will ever become available again.
pub fn serve<L: Listener>(
    listener: &L,
    pool: &Arc<WorkerPool>,
    ctx: &SharedContext,
    router: Router,
    shutdown: &AtomicBool,
) {
    while !shutdown.load(Ordering::SeqCst) {
        let stream = match listener.accept() {
            Ok(stream) => stream,
            Err(err) if err.kind() == io::ErrorKind::WouldBlock => {
                thread::sleep(ACCEPT_POLL_INTERVAL);
                continue;
            }
            Err(err) => {
                tracing::warn!(%err, "accept failed");
                continue;
            }
        };

        let worker = match pool.checkout() {
            Ok(worker) => worker,
            Err(_) => break,
        };

        let job_pool = Arc::clone(pool);
        let job_ctx = ctx.clone();
        let job: Job = Box::new(move || {
            handle_connection(stream, &job_ctx, router);
            job_pool.release(worker);
        });
        if pool.dispatch(worker, job).is_err() {
            break;
        }
    }
}

/// Reads and routes messages off one connection until it closes or a
/// framing error occurs.
fn handle_connection<S: Duplex>(mut stream: S, ctx: &SharedContext, router: Router) {
    let read_half = match stream.try_clone() {
        Ok(half) => half,
        Err(err) => {
            tracing::warn!(%err, "failed to split connection");
            return;
        }
    };
    let mut reader = Reader::new(read_half);

    loop {
        let frame = match reader.read_message() {
            Ok(frame) => frame,
            // A syntax error is the peer's problem, not the transport's:
            // reply and keep reading, per the malformed-JSON scenario.
            Err(poet_json::Error::Syntax { .. }) => {
                let reply = poet_protocol::envelope::error("SYNTAX_ERROR");
                if stream.write_all(reply.to_string().as_bytes()).is_err() {
                    break;
                }
                continue;
            }
            Err(err) => {
                tracing::debug!(%err, "connection closed on transport error");
                break;
            }
        };
        let message = match frame {
            Frame::Message(value) => value,
            Frame::Eof => break,
        };

        let reply = router.dispatch(ctx, &message, &mut stream).into_value();
        if stream.write_all(reply.to_string().as_bytes()).is_err() {
            break;
        }
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use poet_sgx::{Scheduler, SchedulerConfig};

    use super::*;

    /// An in-memory duplex stream shared between a test's client half and
    /// the dispatcher's server half, so the accept loop can be exercised
    /// without opening a real socket.
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
                Self {
                    inbound: b,
                    outbound: a,
                },
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

    fn ctx() -> SharedContext {
        SharedContext::new(Arc::new(Scheduler::new(SchedulerConfig::default())))
    }

    #[test]
    fn handles_a_single_request_and_writes_a_reply() {
        let (mut client, server) = MemoryDuplex::pair();
        client
            .write_all(br#"{"method":"get_next_leader","data":{}}"#)
            .unwrap();

        handle_connection(server, &ctx(), Router::new());

        let mut reply = Vec::new();
        client.read_to_end(&mut reply).unwrap();
        let reply = String::from_utf8(reply).unwrap();
        assert!(reply.contains("\"idle\""));
    }
}
