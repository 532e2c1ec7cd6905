//! Consistent hashing ring for sharding and request routing.
//!
//! Keys map onto a bounded, changing set of nodes. Lookups are deterministic binary searches
//! over an immutable snapshot, adding or removing a node remaps only about `1/N` of the keys,
//! and a rebuilt ring replaces the old one atomically while lookups keep running.
//!
//! The pieces, leaf first:
//! - [`HashFunction`]: the pluggable `&str -> u64` strategy ([`HashAlgorithm`] picks a
//!   built-in one).
//! - [`RingBuilder`]: node set + virtual node count -> [`RingSnapshot`].
//! - [`RingSnapshot`]: sorted `(point, owner)` table with `route` and `route_replicas`.
//! - [`ConsistentHashRouter`]: hot-swappable reference to the current snapshot.
//! - [`refresher::RingRefresher`]: republishes when a membership source changes.

pub mod error;
pub mod hash;
pub mod node;
pub mod refresher;
pub mod ring;
pub mod settings;
pub mod stats;
mod utils;

pub use error::RingError;
pub use hash::{HashAlgorithm, HashFunction};
pub use node::Node;
pub use ring::{ConsistentHashRouter, RingBuilder, RingSnapshot};
pub use settings::RingSettings;
