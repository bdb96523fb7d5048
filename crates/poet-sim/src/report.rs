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

//! Per-node waiting-time and elapsed-time statistics, plus the plain-text
//! report the original prints from `show_overall_queue` and
//! `average_estimated_time`.

use poet_id::NodeId;
use poet_sgx::Scheduler;

use crate::population::Node;

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// Everything reported about one node once the simulation has finished.
#[derive(Clone, Copy, Debug)]
pub struct NodeStats {
    /// The node's identifier.
    pub id: NodeId,
    /// The tick at which the node became eligible.
    pub arrival_time: u64,
    /// The node's declared SGXt budget.
    pub sgxt: u32,
    /// Number of completed leadership retirements (0 or 1 in this system,
    /// since a node never re-enters the queue once retired).
    pub leadership: u64,
    /// One past the last tick at which this node appears in the sequence.
    pub release_time: u64,
    /// `release_time - arrival_time - sgxt`.
    pub waiting_time: i64,
    /// `release_time - arrival_time`.
    pub elapsed_time: i64,
}

// ----------------------------------------------------------------------------
// Functions
// ----------------------------------------------------------------------------

/// Computes [`NodeStats`] for every registered node against the completed
/// leader sequence.
#[must_use]
pub fn compute(registered: &[(NodeId, Node)], sequence: &[NodeId], scheduler: &Scheduler) -> Vec<NodeStats> {
    registered
        .iter()
        .map(|&(id, node)| {
            let release_time = sequence
                .iter()
                .rposition(|&leader| leader == id)
                .map_or(0, |index| index as u64 + 1);
            let arrival = node.arrival_time as i64;
            let release = release_time as i64;
            NodeStats {
                id,
                arrival_time: node.arrival_time,
                sgxt: node.sgxt,
                leadership: scheduler.leadership(id).unwrap_or(0),
                release_time,
                waiting_time: release - arrival - i64::from(node.sgxt),
                elapsed_time: release - arrival,
            }
        })
        .collect()
}

/// Arithmetic mean.
#[must_use]
pub fn mean(values: &[i64]) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let total: f64 = values.iter().sum::<i64>() as f64;
    total / values.len() as f64
}

/// Sample standard deviation (divides by `n - 1`); `0.0` for fewer than
/// two samples, where the original's `n_count - 1` divisor would blow up.
#[must_use]
pub fn sample_stddev(values: &[i64], mean: f64) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let sum_sq: f64 = values
        .iter()
        .map(|&value| {
            let delta = value as f64 - mean;
            delta * delta
        })
        .sum();
    #[allow(clippy::cast_precision_loss)]
    let denominator = (values.len() - 1) as f64;
    (sum_sq / denominator).sqrt()
}

/// Prints the leader sequence, per-node stats, and summary statistics.
pub fn print(stats: &[NodeStats], sequence: &[NodeId]) {
    println!("Overall queue:");
    println!("--------------");
    for id in sequence {
        print!("[{id}]");
    }
    println!();
    println!();

    println!("Pass     :\tArrival\tSGXt\t#Leader\tWaiting\tElapsed");
    for node in stats {
        println!(
            "[{:>6}]:\t{:>7}\t{:>4}\t{:>7}\t{:>7}\t{:>7}",
            node.id, node.arrival_time, node.sgxt, node.leadership, node.waiting_time, node.elapsed_time
        );
    }
    println!();

    let waiting: Vec<i64> = stats.iter().map(|node| node.waiting_time).collect();
    let elapsed: Vec<i64> = stats.iter().map(|node| node.elapsed_time).collect();
    let waiting_mean = mean(&waiting);
    let elapsed_mean = mean(&elapsed);

    println!("Avg waiting time: {waiting_mean:.6}");
    println!("Standard deviation (waiting): {:.6}", sample_stddev(&waiting, waiting_mean));
    println!("Avg elapsed time: {elapsed_mean:.6}");
    println!("Standard deviation (elapsed): {:.6}", sample_stddev(&elapsed, elapsed_mean));
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_of_uniform_values_is_exact() {
        assert!((mean(&[2, 4, 6]) - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn stddev_of_a_single_value_is_zero() {
        assert_eq!(sample_stddev(&[5], 5.0), 0.0);
    }

    #[test]
    fn stddev_of_identical_values_is_zero() {
        let values = [3, 3, 3];
        assert_eq!(sample_stddev(&values, mean(&values)), 0.0);
    }

    #[test]
    fn release_time_tracks_the_last_occurrence_in_sequence() {
        let scheduler = Scheduler::new(poet_sgx::SchedulerConfig {
            sgxt_lowerbound: 1,
            sgxt_upperbound: 10,
            total_tiers: 1,
            max_nodes: 4,
        });
        let a = scheduler.register_at(Box::from([0u8]), Box::from([0u8]), 2, 0).unwrap();
        let b = scheduler.register_at(Box::from([1u8]), Box::from([1u8]), 2, 0).unwrap();
        let sequence = crate::simulate::run(&scheduler);

        let registered = vec![
            (a, Node { arrival_time: 0, sgxt: 2 }),
            (b, Node { arrival_time: 0, sgxt: 2 }),
        ];
        let stats = compute(&registered, &sequence, &scheduler);
        assert_eq!(stats[0].release_time, sequence.iter().rposition(|&id| id == a).unwrap() as u64 + 1);
        assert_eq!(stats[0].leadership, 1);
        assert_eq!(stats[1].leadership, 1);
    }
}
