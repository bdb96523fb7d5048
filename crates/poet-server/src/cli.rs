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

//! Hand-rolled flag parsing, with `POET_*` environment fallbacks.
//!
//! Seven flat flags don't earn a dependency on a full argument parser;
//! `std::env::args` plus a small lookup table reads the same as the
//! config loaders elsewhere in this codebase.

use std::collections::HashMap;
use std::env;

use poet_sgx::SchedulerConfig;

use crate::error::{Error, Result};

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// Fully resolved server configuration.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    /// TCP port to listen on.
    pub port: u16,
    /// `listen(2)` backlog.
    pub backlog: u32,
    /// Number of pre-spawned worker threads (one per concurrent connection).
    pub max_threads: usize,
    /// The scheduler's node-table and tiering bounds.
    pub scheduler: SchedulerConfig,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl Config {
    /// Resolves configuration from CLI flags, falling back to `POET_*`
    /// environment variables, falling back to built-in defaults.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if a value is present but not a valid
    /// integer, or if a flag name is unrecognized.
    pub fn from_env(args: impl Iterator<Item = String>) -> Result<Self> {
        let flags = parse_flags(args)?;
        let scheduler = SchedulerConfig::default();
        Ok(Self {
            port: resolve(&flags, "port", "POET_PORT", 7700)?,
            backlog: resolve(&flags, "backlog", "POET_BACKLOG", 128)?,
            max_threads: resolve(&flags, "max-threads", "POET_MAX_THREADS", 64)?,
            scheduler: SchedulerConfig {
                max_nodes: resolve(&flags, "max-nodes", "POET_MAX_NODES", scheduler.max_nodes)?,
                sgxt_lowerbound: resolve(
                    &flags,
                    "sgxt-lowerbound",
                    "POET_SGXT_LOWERBOUND",
                    scheduler.sgxt_lowerbound,
                )?,
                sgxt_upperbound: resolve(
                    &flags,
                    "sgxt-upperbound",
                    "POET_SGXT_UPPERBOUND",
                    scheduler.sgxt_upperbound,
                )?,
                total_tiers: resolve(
                    &flags,
                    "total-tiers",
                    "POET_TOTAL_TIERS",
                    scheduler.total_tiers,
                )?,
            },
        })
    }
}

// ----------------------------------------------------------------------------
// Functions
// ----------------------------------------------------------------------------

/// Splits `--flag value` pairs out of the argument list (skipping `argv[0]`).
fn parse_flags(mut args: impl Iterator<Item = String>) -> Result<HashMap<String, String>> {
    args.next();
    let mut flags = HashMap::new();
    loop {
        let Some(flag) = args.next() else {
            break;
        };
        let Some(name) = flag.strip_prefix("--") else {
            return Err(Error::Config(format!("unrecognized argument: {flag}")));
        };
        let value = args
            .next()
            .ok_or_else(|| Error::Config(format!("--{name} requires a value")))?;
        flags.insert(name.to_string(), value);
    }
    Ok(flags)
}

/// Resolves one setting: CLI flag, then environment variable, then default.
fn resolve<T>(
    flags: &HashMap<String, String>,
    flag: &str,
    env_var: &str,
    default: T,
) -> Result<T>
where
    T: std::str::FromStr,
{
    let raw = flags.get(flag).cloned().or_else(|| env::var(env_var).ok());
    match raw {
        Some(raw) => raw
            .parse()
            .map_err(|_| Error::Config(format!("--{flag}: invalid value {raw:?}"))),
        None => Ok(default),
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> impl Iterator<Item = String> + use<> {
        std::iter::once("poet-server".to_string())
            .chain(values.iter().map(ToString::to_string))
            .collect::<Vec<_>>()
            .into_iter()
    }

    #[test]
    fn defaults_apply_with_no_flags() {
        let config = Config::from_env(args(&[])).unwrap();
        assert_eq!(config.port, 7700);
        assert_eq!(config.max_threads, 64);
    }

    #[test]
    fn explicit_flag_overrides_default() {
        let config = Config::from_env(args(&["--port", "9000"])).unwrap();
        assert_eq!(config.port, 9000);
    }

    #[test]
    fn unrecognized_argument_is_an_error() {
        assert!(Config::from_env(args(&["port", "9000"])).is_err());
    }

    #[test]
    fn non_numeric_value_is_an_error() {
        assert!(Config::from_env(args(&["--port", "nope"])).is_err());
    }
}
