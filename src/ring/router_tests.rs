use crate::hash::{HashAlgorithm, HashFunction, Murmur3Hash};
use crate::node::Node;
use crate::ring::{ConsistentHashRouter, RingBuilder, scripted_hash};
use crate::stats::{LoadReport, key_load};
use crate::utils::init_logging;
use anyhow::Result;
use itertools::Itertools;
use log::LevelFilter;
use rand::{Rng, SeedableRng, rngs::StdRng};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::thread;
use std::time::{Duration, Instant};
use strum::IntoEnumIterator;

fn nodes(prefix: &str, count: usize) -> Vec<Node> {
    (0..count)
        .map(|i| {
            Node::new(
                format!("{prefix}{i}"),
                format!("10.0.0.{i}"),
                8080,
                "ap-south-1",
            )
        })
        .collect()
}

#[test]
fn test_three_nodes_one_point_each() -> Result<()> {
    init_logging(LevelFilter::Debug);

    let hash = scripted_hash(&[
        ("A/0", 10),
        ("B/0", 20),
        ("C/0", 30),
        ("k5", 5),
        ("k15", 15),
        ("k20", 20),
        ("k25", 25),
        ("k35", 35),
    ]);
    let builder = RingBuilder::new(hash, 1);
    let snapshot = builder.build(["A", "B", "C"].map(Node::example), 1)?;
    let router = ConsistentHashRouter::new(builder.hash_function(), snapshot);

    assert_eq!(router.get_node_for_key("k5")?.id, "A");
    assert_eq!(router.get_node_for_key("k15")?.id, "B");
    assert_eq!(router.get_node_for_key("k20")?.id, "B");
    assert_eq!(router.get_node_for_key("k25")?.id, "C");
    assert_eq!(router.get_node_for_key("k35")?.id, "A");

    let replicas = router.get_replicas_for_key("k25", 2)?;
    assert_eq!(
        replicas.iter().map(|n| n.id.as_str()).collect::<Vec<_>>(),
        vec!["C", "A"]
    );

    assert_eq!(router.ring_size(), 3);
    assert_eq!(router.node_count(), 3);

    Ok(())
}

#[test]
fn test_same_key_same_node() -> Result<()> {
    for algorithm in HashAlgorithm::iter() {
        let builder = RingBuilder::new(algorithm.hasher(), 300);
        let router =
            ConsistentHashRouter::new(builder.hash_function(), builder.build(nodes("N", 3), 1)?);

        let first = router.get_node_for_key("user:12345")?;
        for _ in 0..1000 {
            assert_eq!(
                router.get_node_for_key("user:12345")?.id,
                first.id,
                "{algorithm} routed the same key differently"
            );
        }
    }

    Ok(())
}

#[test]
fn test_replicas_are_distinct() -> Result<()> {
    let builder = RingBuilder::new(Arc::new(Murmur3Hash), 100);
    let router =
        ConsistentHashRouter::new(builder.hash_function(), builder.build(nodes("N", 5), 1)?);

    for i in 0..2000 {
        let key = format!("user_key:{i}");

        for count in [1, 3, 5, 8] {
            let replicas = router.get_replicas_for_key(&key, count)?;

            assert_eq!(replicas.len(), count.min(router.node_count()));
            assert!(replicas.iter().map(|n| &n.id).all_unique());
            // the first replica is always the primary owner
            assert_eq!(replicas[0].id, router.get_node_for_key(&key)?.id);
        }
    }

    Ok(())
}

#[test]
fn test_distribution_is_fair_across_nodes() -> Result<()> {
    const NODE_COUNT: usize = 16;
    const VNODES_PER_NODE: usize = 7500;
    const SAMPLES: usize = 400_000;

    let builder = RingBuilder::new(Arc::new(Murmur3Hash), VNODES_PER_NODE);
    let snapshot = builder.build(nodes("N", NODE_COUNT), 1)?;

    let shares: f64 = snapshot.ownership().iter().map(|(_, share)| share).sum();
    assert!((shares - 1.0).abs() < 1e-9, "ownership sums to {shares}");

    // Seeded, so the sample is reproducible
    let mut rng = StdRng::seed_from_u64(42);
    let keys = (0..SAMPLES).map(|_| format!("{:x}", rng.random::<u64>()));

    let counts = key_load(&snapshot, &Murmur3Hash, keys)?;
    assert_eq!(counts.iter().sum::<u64>(), SAMPLES as u64);

    let report = LoadReport::from_counts(&counts).expect("non-empty ring");
    assert!(report.cv < 0.02, "CV too high: {report:?}");
    assert!(
        report.max_min_ratio < 1.1,
        "max/min ratio too high: {report:?}"
    );

    Ok(())
}

#[test]
fn test_concurrent_publish_is_never_torn() -> Result<()> {
    const READERS: usize = 4;
    const PUBLISHES: u64 = 200;

    init_logging(LevelFilter::Warn);

    // Even versions route to "E*" nodes, odd versions to "O*" nodes
    let builder = RingBuilder::new(Arc::new(Murmur3Hash), 50);
    let router =
        ConsistentHashRouter::new(builder.hash_function(), builder.build(nodes("E", 4), 0)?);

    let done = AtomicBool::new(false);
    let queries = AtomicUsize::new(0);

    thread::scope(|s| {
        for reader in 0..READERS {
            let router = &router;
            let done = &done;
            let queries = &queries;

            s.spawn(move || {
                let mut last_version = 0;
                let mut i = 0usize;

                while !done.load(Ordering::Acquire) {
                    let key = format!("reader-{reader}:{i}");
                    i += 1;

                    let snapshot = router.snapshot();
                    let version = snapshot.version();
                    assert!(version >= last_version, "observed version went backwards");
                    last_version = version;

                    let prefix = if version % 2 == 0 { "E" } else { "O" };
                    let key_hash = router.hash_function().hash(&key);

                    let owner = snapshot.route(key_hash).expect("ring is never empty");
                    assert!(owner.id.starts_with(prefix), "v{version} routed to {owner}");

                    let replicas = snapshot
                        .route_replicas(key_hash, 3)
                        .expect("ring is never empty");
                    assert_eq!(replicas.len(), 3);
                    assert!(replicas.iter().all(|n| n.id.starts_with(prefix)));

                    let node = router.get_node_for_key(&key).expect("ring is never empty");
                    assert!(node.id.starts_with('E') || node.id.starts_with('O'));

                    queries.fetch_add(1, Ordering::Relaxed);
                }
            });
        }

        // Let every reader get going before the ring starts changing
        let started = Instant::now();
        while queries.load(Ordering::Relaxed) < READERS
            && started.elapsed() < Duration::from_secs(5)
        {
            thread::yield_now();
        }

        for version in 1..=PUBLISHES {
            let prefix = if version % 2 == 0 { "E" } else { "O" };
            let next = builder
                .build(nodes(prefix, 4), version)
                .expect("valid ring");
            router.publish(next);
        }

        done.store(true, Ordering::Release);
    });

    assert_eq!(router.version(), PUBLISHES);
    assert!(queries.load(Ordering::Relaxed) > 0);

    Ok(())
}
