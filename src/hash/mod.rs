//! Pluggable hash strategies.
//!
//! The ring only needs a deterministic `&str -> u64` mapping with a uniform
//! output distribution. The same function places virtual nodes and lookup
//! keys, so a builder and the router serving its snapshots must share it.

mod crypto;
mod murmur;

pub use crypto::{Md5Hash, Sha1Hash};
pub use murmur::Murmur3Hash;

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use strum::{Display, EnumIter, EnumString};

pub trait HashFunction: Send + Sync {
    fn hash(&self, input: &str) -> u64;
}

impl<F> HashFunction for F
where
    F: Fn(&str) -> u64 + Send + Sync,
{
    fn hash(&self, input: &str) -> u64 {
        self(input)
    }
}

/// Built-in hash strategies, selectable from configuration.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Display,
    EnumString,
    EnumIter,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum HashAlgorithm {
    Md5,
    Sha1,
    #[default]
    Murmur3,
}

impl HashAlgorithm {
    pub fn hasher(self) -> Arc<dyn HashFunction> {
        match self {
            HashAlgorithm::Md5 => Arc::new(Md5Hash),
            HashAlgorithm::Sha1 => Arc::new(Sha1Hash),
            HashAlgorithm::Murmur3 => Arc::new(Murmur3Hash),
        }
    }
}

/// Reads the first 8 bytes of a digest as a big-endian integer.
fn leading_u64(bytes: &[u8]) -> u64 {
    bytes
        .iter()
        .take(8)
        .fold(0u64, |acc, byte| (acc << 8) | u64::from(*byte))
}
