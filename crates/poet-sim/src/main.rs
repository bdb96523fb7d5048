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

//! Standalone simulator: generates a synthetic node population, drives the
//! tiered scheduler to completion outside of any network context, and
//! reports the leader sequence plus waiting-time/elapsed-time statistics.
//!
//! Run with no arguments for interactive prompts, or with any argument to
//! read the same five values from stdin without prompting — mirroring
//! `POET++.c`'s `argc > 1` check.

mod cli;
mod error;
mod population;
mod report;
mod simulate;

use std::io::{self, BufRead};
use std::process::ExitCode;

use poet_sgx::{Scheduler, SchedulerConfig};
use tracing_subscriber::EnvFilter;

use crate::cli::Inputs;
use crate::error::Result;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let prompt = std::env::args().count() <= 1;
    let stdin = io::stdin();
    match run(prompt, stdin.lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(prompt: bool, input: impl BufRead) -> Result<()> {
    let inputs = Inputs::read(prompt, input)?;

    let mut rng = population::seeded_rng(inputs.seed);
    let nodes = population::generate(&inputs, &mut rng);

    let scheduler = Scheduler::new(SchedulerConfig {
        sgxt_lowerbound: 1,
        sgxt_upperbound: inputs.sgxt_upperbound,
        total_tiers: inputs.total_tiers,
        max_nodes: inputs.node_count,
    });
    let registered = population::seed(&scheduler, &nodes)?;

    let sequence = simulate::run(&scheduler);
    let stats = report::compute(&registered, &sequence, &scheduler);
    report::print(&stats, &sequence);

    Ok(())
}
