use super::RingSnapshot;
use crate::error::RingError;
use crate::hash::HashFunction;
use crate::node::Node;
use arc_swap::ArcSwap;
use log::info;
use std::sync::Arc;
use tokio::sync::watch::{self, Receiver, Sender};

/// Long-lived routing facade over the current [`RingSnapshot`].
///
/// Queries are lock-free: each one pins the current snapshot and runs
/// entirely against it. Membership changes never touch a published snapshot;
/// a replacement is built elsewhere and swapped in with [`publish`].
///
/// [`publish`]: ConsistentHashRouter::publish
pub struct ConsistentHashRouter {
    hash_function: Arc<dyn HashFunction>,
    current: ArcSwap<RingSnapshot>,
    published: Sender<u64>,
}

impl ConsistentHashRouter {
    pub fn new(
        hash_function: Arc<dyn HashFunction>,
        initial: impl Into<Arc<RingSnapshot>>,
    ) -> Self {
        let initial = initial.into();
        let (published, _) = watch::channel(initial.version());

        Self {
            hash_function,
            current: ArcSwap::new(initial),
            published,
        }
    }

    /// A router over an empty ring; queries fail until a snapshot is published.
    pub fn empty(hash_function: Arc<dyn HashFunction>) -> Self {
        Self::new(hash_function, RingSnapshot::empty(0))
    }

    pub fn get_node_for_key(&self, key: &str) -> Result<Arc<Node>, RingError> {
        let key_hash = self.hash_function.hash(key);

        self.current.load().route(key_hash).cloned()
    }

    pub fn get_replicas_for_key(
        &self,
        key: &str,
        count: usize,
    ) -> Result<Vec<Arc<Node>>, RingError> {
        let key_hash = self.hash_function.hash(key);

        self.current.load().route_replicas(key_hash, count)
    }

    /// Atomically replaces the current snapshot.
    ///
    /// Queries already holding the previous snapshot finish against it.
    pub fn publish(&self, snapshot: impl Into<Arc<RingSnapshot>>) {
        let snapshot = snapshot.into();
        let version = snapshot.version();
        let node_count = snapshot.node_count();
        let ring_size = snapshot.ring_size();

        self.current.store(snapshot);
        self.published.send_replace(version);

        info!("Published ring version {version} ({node_count} nodes, {ring_size} points)");
    }

    /// The snapshot currently in use, for running several queries against
    /// one consistent ring state.
    pub fn snapshot(&self) -> Arc<RingSnapshot> {
        self.current.load_full()
    }

    /// Receives the version of every snapshot published after this call.
    pub fn subscribe(&self) -> Receiver<u64> {
        self.published.subscribe()
    }

    pub fn hash_function(&self) -> Arc<dyn HashFunction> {
        self.hash_function.clone()
    }

    pub fn version(&self) -> u64 {
        self.current.load().version()
    }

    pub fn ring_size(&self) -> usize {
        self.current.load().ring_size()
    }

    pub fn node_count(&self) -> usize {
        self.current.load().node_count()
    }
}
