use crate::hash::HashAlgorithm;
use crate::ring::RingBuilder;
use anyhow::{Result, anyhow};
use std::env;
use std::time::Duration;

macro_rules! define_settings {
    ($(($field:ident, $env_name:expr, $type:ty, $default:expr)),* $(,)?) => {
        /// Ring configuration, read from `RING_*` environment variables.
        ///
        /// Unset variables fall back to their defaults; set but unparsable
        /// ones are an error.
        #[derive(Debug, Clone, PartialEq)]
        pub struct RingSettings {
            $(pub $field: $type,)*
        }

        impl Default for RingSettings {
            fn default() -> Self {
                Self {
                    $($field: $default,)*
                }
            }
        }

        impl RingSettings {
            /// Every environment variable these settings are read from.
            pub const VARIABLES: &'static [&'static str] = &[$($env_name),*];

            pub fn from_lookup<F>(lookup: F) -> Result<Self>
            where
                F: Fn(&str) -> Option<String>,
            {
                Ok(Self {
                    $(
                        $field: match lookup($env_name) {
                            Some(val) => val.parse::<$type>().map_err(|_| {
                                anyhow!(
                                    "Failed to parse environment variable {} with value '{}' as {}",
                                    $env_name,
                                    val,
                                    stringify!($type)
                                )
                            })?,
                            None => $default,
                        },
                    )*
                })
            }
        }
    };
}

define_settings!(
    (vnodes_per_node, "RING_VNODES_PER_NODE", usize, 300),
    (
        hash_algorithm,
        "RING_HASH_ALGORITHM",
        HashAlgorithm,
        HashAlgorithm::Murmur3
    ),
    (
        refresh_interval_seconds,
        "RING_REFRESH_INTERVAL_SECONDS",
        u64,
        30
    ),
);

impl RingSettings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn builder(&self) -> RingBuilder {
        RingBuilder::new(self.hash_algorithm.hasher(), self.vnodes_per_node)
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_seconds)
    }
}
