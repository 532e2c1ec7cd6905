use crate::error::{MAX_RING_POINTS, RingError};
use crate::node::Node;
use std::collections::HashMap;
use std::sync::Arc;

/// Size of the hash space, 2^64.
const RING_SPAN: u128 = 1 << 64;

/// One immutable, versioned instance of the ring table.
///
/// `points` is sorted ascending and `owners[i]` is the index (into `nodes`)
/// of the node owning `points[i]`. A snapshot is never modified after it is
/// built; membership changes produce a new one.
#[derive(Debug, Clone)]
pub struct RingSnapshot {
    version: u64,
    points: Vec<u64>,
    owners: Vec<u32>,
    nodes: Vec<Arc<Node>>,
}

impl RingSnapshot {
    /// A snapshot with no points. Every routing query on it fails with
    /// [`RingError::EmptyRing`].
    pub fn empty(version: u64) -> Self {
        Self {
            version,
            points: Vec::new(),
            owners: Vec::new(),
            nodes: Vec::new(),
        }
    }

    /// Assembles a snapshot from explicit `(point, owner)` columns.
    ///
    /// `points` must already be sorted. Distinct nodes are collected by id in
    /// first-seen order.
    pub fn from_parts(
        version: u64,
        points: Vec<u64>,
        owners: Vec<Arc<Node>>,
    ) -> Result<Self, RingError> {
        if points.len() != owners.len() {
            return Err(RingError::Configuration(format!(
                "{} points but {} owners",
                points.len(),
                owners.len()
            )));
        }

        check_point_count(points.len())?;

        if points.windows(2).any(|w| w[0] > w[1]) {
            return Err(RingError::Configuration(
                "points must be sorted in ascending order".to_string(),
            ));
        }

        let mut nodes: Vec<Arc<Node>> = Vec::new();
        let mut index_by_id: HashMap<String, u32> = HashMap::new();

        let owners = owners
            .into_iter()
            .map(|owner| {
                *index_by_id.entry(owner.id.clone()).or_insert_with(|| {
                    nodes.push(owner);
                    (nodes.len() - 1) as u32
                })
            })
            .collect();

        Ok(Self::from_sorted(version, points, owners, nodes))
    }

    pub(crate) fn from_sorted(
        version: u64,
        points: Vec<u64>,
        owners: Vec<u32>,
        nodes: Vec<Arc<Node>>,
    ) -> Self {
        debug_assert_eq!(points.len(), owners.len());
        debug_assert!(points.windows(2).all(|w| w[0] <= w[1]));
        debug_assert!(owners.iter().all(|owner| (*owner as usize) < nodes.len()));

        Self {
            version,
            points,
            owners,
            nodes,
        }
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Number of virtual points on the ring.
    pub fn ring_size(&self) -> usize {
        self.points.len()
    }

    /// Number of distinct nodes on the ring.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Distinct nodes, in the order they were first seen.
    pub fn nodes(&self) -> &[Arc<Node>] {
        &self.nodes
    }

    pub fn points(&self) -> &[u64] {
        &self.points
    }

    /// Owner of every point, aligned with [`RingSnapshot::points`].
    pub fn owners(&self) -> impl Iterator<Item = &Arc<Node>> {
        self.owners.iter().map(|owner| &self.nodes[*owner as usize])
    }

    /// Index of the first point `>= key_hash`, wrapping to 0 past the end.
    fn successor(&self, key_hash: u64) -> usize {
        let idx = self.points.partition_point(|point| *point < key_hash);

        if idx == self.points.len() { 0 } else { idx }
    }

    /// Index into [`RingSnapshot::nodes`] of the node owning `key_hash`.
    pub(crate) fn route_index(&self, key_hash: u64) -> Result<usize, RingError> {
        if self.is_empty() {
            return Err(RingError::EmptyRing);
        }

        Ok(self.owners[self.successor(key_hash)] as usize)
    }

    /// Returns the owner of the first point at or after `key_hash`.
    pub fn route(&self, key_hash: u64) -> Result<&Arc<Node>, RingError> {
        let owner = self.route_index(key_hash)?;

        Ok(&self.nodes[owner])
    }

    /// Walks clockwise from the `route` position and collects up to `count`
    /// distinct nodes.
    ///
    /// Returns fewer than `count` nodes when the ring has fewer distinct
    /// nodes. A `count` of zero always yields an empty list.
    pub fn route_replicas(
        &self,
        key_hash: u64,
        count: usize,
    ) -> Result<Vec<Arc<Node>>, RingError> {
        if count == 0 {
            return Ok(Vec::new());
        }

        if self.is_empty() {
            return Err(RingError::EmptyRing);
        }

        let start = self.successor(key_hash);
        let wanted = count.min(self.nodes.len());
        let mut replicas: Vec<u32> = Vec::with_capacity(wanted);

        let (before, after) = self.owners.split_at(start);
        for owner in after.iter().chain(before) {
            if !replicas.contains(owner) {
                replicas.push(*owner);
                if replicas.len() == wanted {
                    break;
                }
            }
        }

        Ok(replicas
            .into_iter()
            .map(|owner| self.nodes[owner as usize].clone())
            .collect())
    }

    /// Fraction of the hash space owned by each distinct node, in
    /// [`RingSnapshot::nodes`] order. The fractions sum to 1.
    //
    // A point owns the arc (previous point, point]. The arc of the first point wraps
    // around from the last one.
    //
    pub fn ownership(&self) -> Vec<(Arc<Node>, f64)> {
        let (Some(first), Some(last)) = (self.points.first(), self.points.last()) else {
            return Vec::new();
        };

        let mut arcs = vec![0u128; self.nodes.len()];
        arcs[self.owners[0] as usize] += RING_SPAN - u128::from(last - first);

        for (w, owner) in self.points.windows(2).zip(&self.owners[1..]) {
            arcs[*owner as usize] += u128::from(w[1] - w[0]);
        }

        self.nodes
            .iter()
            .cloned()
            .zip(arcs)
            .map(|(node, arc)| (node, arc as f64 / RING_SPAN as f64))
            .collect()
    }
}

fn check_point_count(points: usize) -> Result<(), RingError> {
    if points > MAX_RING_POINTS {
        return Err(RingError::Configuration(format!(
            "{points} points exceeds the limit of {MAX_RING_POINTS}"
        )));
    }

    Ok(())
}

impl Default for RingSnapshot {
    fn default() -> Self {
        Self::empty(0)
    }
}
