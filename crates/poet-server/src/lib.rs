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

//! The coordinator's network-facing binary, as a library: binds a
//! listening socket, dispatches each connection to a worker for its
//! lifetime, and retires on `SIGINT`/`SIGTERM` or a `terminate` request.
//!
//! Split from `main.rs` so the integration suite in `tests/` can drive
//! [`dispatcher::serve`] over an in-memory duplex instead of a real
//! socket.

pub mod cli;
pub mod dispatcher;
pub mod error;
pub mod lifecycle;

use std::net::{SocketAddr, TcpListener};
use std::sync::Arc;

use poet_executor::WorkerPool;
use poet_protocol::{Router, SharedContext};
use poet_sgx::Scheduler;
use socket2::{Domain, Socket, Type};

use crate::cli::Config;
use crate::error::Error;

/// Binds, installs the signal handler, and runs the accept loop until
/// shutdown.
///
/// # Errors
///
/// Returns [`Error`] if configuration couldn't be resolved or the
/// listening socket couldn't be bound.
pub fn run(args: impl Iterator<Item = String>) -> Result<(), Error> {
    let config = Config::from_env(args).map_err(|err| Error::Config(err.to_string()))?;
    tracing::info!(?config, "starting poet-server");

    let listener = bind(&config).map_err(Error::Bind)?;

    let scheduler = Arc::new(Scheduler::new(config.scheduler));
    let ctx = SharedContext::new(scheduler);
    lifecycle::install(Arc::clone(&ctx.shutdown));

    let pool = Arc::new(WorkerPool::new(config.max_threads));
    let router = Router::new();

    dispatcher::serve(&listener, &pool, &ctx, router, &ctx.shutdown);

    tracing::info!("shutdown complete");
    Ok(())
}

/// Binds and listens with the configured `backlog`, which
/// [`TcpListener::bind`] alone doesn't expose.
fn bind(config: &Config) -> std::io::Result<TcpListener> {
    let addr: SocketAddr = ([0, 0, 0, 0], config.port).into();
    let socket = Socket::new(Domain::for_address(addr), Type::STREAM, None)?;
    socket.set_reuse_address(true)?;
    socket.bind(&addr.into())?;
    socket.listen(i32::try_from(config.backlog).unwrap_or(i32::MAX))?;
    socket.set_nonblocking(true)?;
    Ok(socket.into())
}
