//! Keeps a router's ring in sync with an external membership source.
//!
//! The refresher polls the source on an interval. When the set of node ids changes it builds a
//! replacement snapshot on a blocking thread (away from the query path) and publishes it with the
//! next version number. Unchanged membership publishes nothing.

use crate::node::Node;
use crate::ring::{ConsistentHashRouter, RingBuilder, RingSnapshot};
use anyhow::{Result, bail};
use log::{error, info};
use std::collections::BTreeSet;
use std::{sync::Arc, time::Duration};
use tokio::sync::watch::Receiver;
use tokio::task;
use tokio::time;

pub trait MembershipSource {
    fn current_nodes(&self) -> impl Future<Output = Result<Vec<Node>>> + Send;
}

pub struct RingRefresher {
    builder: RingBuilder,
    router: Arc<ConsistentHashRouter>,
}

fn same_members(snapshot: &RingSnapshot, nodes: &[Node]) -> bool {
    let current: BTreeSet<&str> = snapshot.nodes().iter().map(|n| n.id.as_str()).collect();
    let incoming: BTreeSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();

    current == incoming
}

impl RingRefresher {
    pub fn new(builder: RingBuilder, router: Arc<ConsistentHashRouter>) -> Self {
        Self { builder, router }
    }

    /// Rebuilds and publishes if membership changed. Returns whether a new
    /// snapshot was published.
    async fn refresh<T: MembershipSource + Sync + Send>(&self, source: &T) -> Result<bool> {
        let nodes = source.current_nodes().await?;
        let current = self.router.snapshot();

        if same_members(&current, &nodes) {
            return Ok(false);
        }

        let Some(version) = current.version().checked_add(1) else {
            bail!("ring version {} cannot be advanced", current.version());
        };

        let builder = self.builder.clone();
        let next = task::spawn_blocking(move || builder.build(nodes, version)).await??;

        info!(
            "Detected membership change: old={} nodes (v{}), new={} nodes (v{})",
            current.node_count(),
            current.version(),
            next.node_count(),
            next.version()
        );
        self.router.publish(next);

        Ok(true)
    }

    pub async fn start<T: MembershipSource + Sync + Send + 'static>(
        self,
        interval: Duration,
        source: Arc<T>,
    ) -> (impl FnOnce(), Receiver<u64>) {
        let rx = self.router.subscribe();

        let task = tokio::spawn(async move {
            let mut ticker = time::interval(interval);

            loop {
                let result = self.refresh(source.as_ref()).await;

                if let Err(e) = result {
                    error!("error refreshing ring: {e}");
                }

                ticker.tick().await;
            }
        });

        let close_function = move || {
            task.abort();
            info!("RingRefresher stopped");
        };

        info!("RingRefresher started");

        (close_function, rx)
    }
}
