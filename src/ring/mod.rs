//! Virtual-node consistent hashing ring.
//!
//! [`RingBuilder`] turns a node set into an immutable [`RingSnapshot`]: a sorted table of
//! `(point, owner)` pairs where every node holds `vnodes_per_node` points labelled
//! `"{id}/{i}"`. Keys route to the owner of the first point at or after their hash, wrapping
//! around to the first point.
//!
//! [`ConsistentHashRouter`] serves queries from the current snapshot and swaps in a new one
//! atomically. Readers never lock and never see a half-replaced ring.

mod builder;
pub mod diff;
mod router;
mod snapshot;

pub use builder::RingBuilder;
pub use router::ConsistentHashRouter;
pub use snapshot::RingSnapshot;

#[cfg(test)]
use crate::hash::HashFunction;
#[cfg(test)]
use std::{collections::HashMap, sync::Arc};

/// Hash function answering from a fixed table; panics on any other input.
#[cfg(test)]
pub(crate) fn scripted_hash(script: &[(&str, u64)]) -> Arc<dyn HashFunction> {
    let table: HashMap<String, u64> = script
        .iter()
        .map(|(input, hash)| (input.to_string(), *hash))
        .collect();

    Arc::new(move |input: &str| match table.get(input) {
        Some(hash) => *hash,
        None => panic!("unexpected hash input in test: {input}"),
    })
}

#[cfg(test)]
mod router_tests;
