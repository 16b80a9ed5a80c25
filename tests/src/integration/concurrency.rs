//! # Concurrency Integration Tests
//!
//! One `BlockStore` shared by many reporters and allocators.
//!
//! ## Properties Tested:
//!
//! 1. **At-most-once**: no block reaches two allocators
//! 2. **No loss**: blocks handed out plus blocks left equal blocks reported
//! 3. **Single record**: racing first reports from one node share one record
//! 4. **Async callers**: tokio tasks on a multi-thread runtime see the same guarantees

#[cfg(test)]
mod tests {
    use parking_lot::Mutex;
    use rand::Rng;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Barrier};
    use std::thread;

    use tbs_block_allocation::test_utils::{block_key, fill_node, make_block, make_identity};
    use tbs_block_allocation::{
        AllocatorConfig, BlockAllocationApi, BlockStore, SelectionPolicy,
    };
    use tbs_types::{AffinityId, NodeIdentity, StorageTier};

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    const TIERS: u16 = 3;
    const NODES_PER_TIER: u8 = 6;
    const BLOCKS_PER_NODE: u64 = 200;

    fn shared_store(policy: SelectionPolicy) -> Arc<BlockStore> {
        Arc::new(
            BlockStore::new(
                AllocatorConfig::new()
                    .with_tier_count(TIERS)
                    .with_selection_policy(policy),
            )
            .unwrap(),
        )
    }

    fn all_nodes() -> Vec<NodeIdentity> {
        (0..TIERS)
            .flat_map(|tier| {
                (1..=NODES_PER_TIER).map(move |host| make_identity(tier, u32::from(host % 3), host))
            })
            .collect()
    }

    fn total_blocks() -> usize {
        usize::from(TIERS) * usize::from(NODES_PER_TIER) * BLOCKS_PER_NODE as usize
    }

    // =============================================================================
    // THREADS
    // =============================================================================

    #[test]
    fn test_reporters_and_allocators_race() {
        for policy in [SelectionPolicy::RoundRobin, SelectionPolicy::Random] {
            let store = shared_store(policy);
            let nodes = all_nodes();
            let reporters_left = AtomicUsize::new(nodes.len());
            let handed_out = Mutex::new(Vec::new());

            thread::scope(|s| {
                for node in &nodes {
                    let store = &store;
                    let reporters_left = &reporters_left;
                    s.spawn(move || {
                        fill_node(store.as_ref(), node, 0, BLOCKS_PER_NODE).unwrap();
                        reporters_left.fetch_sub(1, Ordering::AcqRel);
                    });
                }

                for _ in 0..6 {
                    let store = &store;
                    let reporters_left = &reporters_left;
                    let handed_out = &handed_out;
                    s.spawn(move || {
                        let mut rng = rand::thread_rng();
                        let mut local = Vec::new();
                        loop {
                            let tier = rng.gen_range(0..TIERS + 1);
                            let affinity = AffinityId(rng.gen_range(0..4));
                            match store.get_block(Some(StorageTier(tier)), affinity) {
                                Some(block) => local.push(block_key(&block)),
                                None if reporters_left.load(Ordering::Acquire) == 0 => break,
                                None => thread::yield_now(),
                            }
                        }
                        handed_out.lock().extend(local);
                    });
                }
            });

            let handed_out = handed_out.into_inner();
            let unique: HashSet<_> = handed_out.iter().copied().collect();
            assert_eq!(unique.len(), handed_out.len(), "{policy}: duplicate hand-out");

            // Allocators stop on the first miss after the last reporter; drain the rest.
            let mut leftover = 0;
            while let Some(block) = store.get_block(None, AffinityId::ANY) {
                assert!(!unique.contains(&block_key(&block)));
                leftover += 1;
            }
            assert_eq!(handed_out.len() + leftover, total_blocks(), "{policy}: lost blocks");
        }
    }

    #[test]
    fn test_racing_reporters_for_one_node() {
        let store = shared_store(SelectionPolicy::RoundRobin);
        let node = make_identity(1, 2, 9);
        let reporters = 12;
        let barrier = Barrier::new(reporters);

        thread::scope(|s| {
            for r in 0..reporters {
                let store = &store;
                let barrier = &barrier;
                s.spawn(move || {
                    barrier.wait();
                    let first = r as u64 * 10;
                    fill_node(store.as_ref(), &node, first, 10).unwrap();
                });
            }
        });

        let tier = store.tier(StorageTier(1)).unwrap();
        assert_eq!(tier.node_count(), 1);
        assert_eq!(tier.affinity_group_count(), 1);
        assert_eq!(store.lookup_node(&node).unwrap().free_count(), reporters * 10);
    }

    #[test]
    fn test_registration_and_reports_interleave() {
        let store = shared_store(SelectionPolicy::Random);
        let node = make_identity(0, 1, 1);
        let barrier = Barrier::new(2);

        thread::scope(|s| {
            s.spawn(|| {
                barrier.wait();
                // Loses with DuplicateRegistration if the report got there first.
                let _ = store.add_node(node);
            });
            s.spawn(|| {
                barrier.wait();
                store.add_block(make_block(&node, 0)).unwrap();
            });
        });

        assert_eq!(store.stats().nodes(), 1);
        let block = store.get_block(Some(StorageTier(0)), AffinityId(1)).unwrap();
        assert_eq!(block.owner(), &node);
    }

    // =============================================================================
    // ASYNC CALLERS
    // =============================================================================

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_async_tasks_share_store() {
        let store = shared_store(SelectionPolicy::RoundRobin);
        for node in all_nodes() {
            fill_node(store.as_ref(), &node, 0, BLOCKS_PER_NODE).unwrap();
        }
        let seen = Arc::new(Mutex::new(HashSet::new()));

        let mut handles = Vec::new();
        for task in 0..16u32 {
            let store = Arc::clone(&store);
            let seen = Arc::clone(&seen);
            handles.push(tokio::spawn(async move {
                let mut count = 0usize;
                let tier = StorageTier((task % u32::from(TIERS)) as u16);
                while let Some(block) = store.get_block(Some(tier), AffinityId(task % 3)) {
                    assert!(seen.lock().insert(block_key(&block)), "duplicate hand-out");
                    count += 1;
                    if count % 64 == 0 {
                        tokio::task::yield_now().await;
                    }
                }
                count
            }));
        }

        let mut handed_out = 0;
        for handle in handles {
            handed_out += handle.await.unwrap();
        }
        assert_eq!(handed_out, total_blocks());
        assert_eq!(seen.lock().len(), total_blocks());
        assert_eq!(store.stats().free_blocks(), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_async_reporters_then_drain() {
        let store = shared_store(SelectionPolicy::Random);
        let mut reporters = Vec::new();
        for node in all_nodes() {
            let store = Arc::clone(&store);
            reporters.push(tokio::spawn(async move {
                for address in 0..BLOCKS_PER_NODE {
                    store.add_block(make_block(&node, address)).unwrap();
                }
            }));
        }
        for r in reporters {
            r.await.unwrap();
        }

        assert_eq!(store.stats().free_blocks(), total_blocks());
        assert_eq!(store.stats().nodes(), all_nodes().len());
    }
}
