use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Display;
use std::hash::{Hash, Hasher};

/// A physical node that keys can be routed to.
///
/// Identity is the `id` alone: two nodes with the same id are the same node
/// no matter what the other fields say.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub address: String,
    pub port: u16,
    pub region: String,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl Node {
    pub fn new(
        id: impl Into<String>,
        address: impl Into<String>,
        port: u16,
        region: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            address: address.into(),
            port,
            region: region.into(),
            metadata: HashMap::new(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Label of the `index`-th virtual point of this node.
    pub(crate) fn vnode_label(&self, index: usize) -> String {
        format!("{}/{}", self.id, index)
    }

    #[cfg(test)]
    pub fn example(id: &str) -> Self {
        Self::new(id, "10.0.0.1", 8080, "ap-south-1")
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Node {}

impl Hash for Node {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl Display for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}:{}", self.id, self.address, self.port)
    }
}

/// Parses a JSON array of nodes, e.g. a membership list loaded from config.
pub fn parse_nodes(json: &str) -> Result<Vec<Node>> {
    serde_json::from_str(json).context("failed to parse node list")
}
