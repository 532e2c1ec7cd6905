use thiserror::Error;

/// Largest number of virtual points a single snapshot may hold.
pub const MAX_RING_POINTS: usize = i32::MAX as usize;

/// Structural failures of ring construction and routing.
///
/// None of these are transient, so nothing in the crate retries them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RingError {
    /// Invalid build inputs, e.g. an empty node set or zero virtual nodes.
    #[error("invalid ring configuration: {0}")]
    Configuration(String),

    /// `nodes * vnodes_per_node` does not fit the addressable point range.
    #[error(
        "ring capacity exceeded: {nodes} nodes x {vnodes_per_node} vnodes exceeds {limit} points"
    )]
    Capacity {
        nodes: usize,
        vnodes_per_node: usize,
        limit: usize,
    },

    /// A routing query hit a snapshot with zero points.
    #[error("cannot route on an empty ring")]
    EmptyRing,
}
