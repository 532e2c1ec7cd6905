use super::RingSnapshot;
use crate::error::{MAX_RING_POINTS, RingError};
use crate::hash::HashFunction;
use crate::node::Node;
use itertools::Itertools;
use log::{debug, warn};
use std::sync::Arc;

/// Turns a node set into an immutable, sorted [`RingSnapshot`].
///
/// Building touches no shared state, so it can run on any thread while
/// readers keep routing against the previously published snapshot.
#[derive(Clone)]
pub struct RingBuilder {
    hash_function: Arc<dyn HashFunction>,
    vnodes_per_node: usize,
}

impl RingBuilder {
    pub fn new(hash_function: Arc<dyn HashFunction>, vnodes_per_node: usize) -> Self {
        Self {
            hash_function,
            vnodes_per_node,
        }
    }

    pub fn hash_function(&self) -> Arc<dyn HashFunction> {
        self.hash_function.clone()
    }

    pub fn vnodes_per_node(&self) -> usize {
        self.vnodes_per_node
    }

    /// Builds the snapshot for `nodes`, tagged with `version`.
    //
    // Implementation
    // Every distinct node (first occurrence of an id wins) gets `vnodes_per_node` points,
    // hashed from the labels "{id}/{i}". Points are kept in generation order and a
    // permutation of generation indices is sorted by (point, generation index), so equal
    // points keep the order they were generated in. Both output arrays are materialized
    // once from that permutation.
    //
    pub fn build<I>(&self, nodes: I, version: u64) -> Result<RingSnapshot, RingError>
    where
        I: IntoIterator,
        I::Item: Into<Arc<Node>>,
    {
        let mut received = 0usize;
        let nodes: Vec<Arc<Node>> = nodes
            .into_iter()
            .map(Into::into)
            .inspect(|_| received += 1)
            .unique_by(|node: &Arc<Node>| node.id.clone())
            .collect();

        if nodes.is_empty() {
            return Err(RingError::Configuration("node set is empty".to_string()));
        }

        if self.vnodes_per_node == 0 {
            return Err(RingError::Configuration(
                "vnodes_per_node must be positive".to_string(),
            ));
        }

        let total = nodes
            .len()
            .checked_mul(self.vnodes_per_node)
            .filter(|total| *total <= MAX_RING_POINTS)
            .ok_or(RingError::Capacity {
                nodes: nodes.len(),
                vnodes_per_node: self.vnodes_per_node,
                limit: MAX_RING_POINTS,
            })?;

        if received > nodes.len() {
            debug!(
                "Dropped {} duplicate node ids while building ring version {version}",
                received - nodes.len()
            );
        }

        let mut generated = Vec::with_capacity(total);
        for node in &nodes {
            for i in 0..self.vnodes_per_node {
                generated.push(self.hash_function.hash(&node.vnode_label(i)));
            }
        }

        // Both fit in u32: total <= i32::MAX.
        let vnodes = self.vnodes_per_node as u32;
        let mut order: Vec<u32> = (0..total as u32).collect();
        order.sort_unstable_by_key(|&g| (generated[g as usize], g));

        let points: Vec<u64> = order.iter().map(|&g| generated[g as usize]).collect();
        let owners: Vec<u32> = order.iter().map(|&g| g / vnodes).collect();

        let collisions = points.windows(2).filter(|w| w[0] == w[1]).count();
        if collisions > 0 {
            warn!("Ring version {version} has {collisions} colliding virtual points");
        }

        debug!(
            "Built ring version {version}: {} nodes, {} points",
            nodes.len(),
            points.len()
        );

        Ok(RingSnapshot::from_sorted(version, points, owners, nodes))
    }
}
