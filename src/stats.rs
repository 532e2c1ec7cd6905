//! Load statistics over a ring, used to judge how evenly keys spread.

use crate::error::RingError;
use crate::hash::HashFunction;
use crate::ring::RingSnapshot;
use statrs::statistics::Statistics;

/// Summary of per-node key counts.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadReport {
    pub mean: f64,
    /// Coefficient of variation (population standard deviation / mean).
    pub cv: f64,
    pub min: u64,
    pub max: u64,
    pub max_min_ratio: f64,
}

impl LoadReport {
    pub fn from_counts(counts: &[u64]) -> Option<Self> {
        let min = *counts.iter().min()?;
        let max = *counts.iter().max()?;

        let values: Vec<f64> = counts.iter().map(|count| *count as f64).collect();
        let mean = Statistics::mean(&values);
        let std_dev = Statistics::population_std_dev(&values);

        Some(Self {
            mean,
            cv: if mean > 0.0 { std_dev / mean } else { 0.0 },
            min,
            max,
            max_min_ratio: max as f64 / min.max(1) as f64,
        })
    }
}

/// Counts how many `keys` route to each node, in [`RingSnapshot::nodes`] order.
pub fn key_load<I>(
    snapshot: &RingSnapshot,
    hash_function: &dyn HashFunction,
    keys: I,
) -> Result<Vec<u64>, RingError>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut counts = vec![0u64; snapshot.node_count()];

    for key in keys {
        let owner = snapshot.route_index(hash_function.hash(key.as_ref()))?;
        counts[owner] += 1;
    }

    Ok(counts)
}
