//! # Allocation Scenarios
//!
//! End-to-end walkthroughs that go through every layer: a store built from
//! TOML, nodes arriving as raw descriptors, blocks arriving as raw reports,
//! and allocation requests spread over tiers and affinity groups.
//!
//! ## Flows Tested:
//!
//! 1. **Descriptor → Registration**: raw node attributes resolve and register
//! 2. **Report → Allocation**: raw block reports come back out as blocks
//! 3. **Tier Degradation**: a drained fast tier degrades to slower tiers in order
//! 4. **Logging**: a store runs under an installed subscriber

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use tbs_block_allocation::test_utils::{fill_node, make_identity, TEST_PORT};
    use tbs_block_allocation::{
        AllocationError, AllocatorConfig, BlockAllocationApi, BlockStore, SelectionPolicy,
    };
    use tbs_telemetry::{init_logging, TelemetryConfig};
    use tbs_types::{
        AffinityId, BlockLocation, BlockReport, NodeDescriptor, NodeIdentity, StorageTier,
        StorageType,
    };

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    const CLUSTER_TOML: &str = r#"
        [allocation]
        tier_count = 3
        selection_policy = "roundrobin"
    "#;

    fn cluster() -> BlockStore {
        BlockStore::new(AllocatorConfig::from_toml_str(CLUSTER_TOML).unwrap()).unwrap()
    }

    /// Descriptor as a node would send it: IPv4 octets plus port.
    fn descriptor(tier: u16, affinity: u32, octets: [u8; 4]) -> NodeDescriptor {
        NodeDescriptor {
            storage_type: StorageType(1),
            tier: StorageTier(tier),
            affinity: AffinityId(affinity),
            address: octets.to_vec(),
            port: TEST_PORT,
        }
    }

    fn report(owner: &NodeDescriptor, address: u64) -> BlockReport {
        BlockReport {
            owner: owner.clone(),
            location: BlockLocation::new(address, 1 << 20, 7),
        }
    }

    // =============================================================================
    // DESCRIPTOR AND REPORT FLOWS
    // =============================================================================

    #[test]
    fn test_descriptor_registration_then_reports() {
        let store = cluster();
        let d = descriptor(0, 5, [192, 168, 1, 10]);

        store.register_node(&d).unwrap();
        assert!(matches!(
            store.register_node(&d),
            Err(AllocationError::DuplicateRegistration { .. })
        ));

        for address in 0..3 {
            store.add_block_report(report(&d, address)).unwrap();
        }

        let identity = NodeIdentity::try_from(&d).unwrap();
        assert_eq!(store.lookup_node(&identity).unwrap().free_count(), 3);

        let block = store.get_block(Some(StorageTier(0)), AffinityId(5)).unwrap();
        assert_eq!(block.owner(), &identity);
        assert_eq!(block.location().access_key, 7);
        assert_eq!(NodeDescriptor::from(block.owner()), d);
    }

    #[test]
    fn test_ipv6_descriptor() {
        let store = cluster();
        let mut octets = [0u8; 16];
        octets[0] = 0xfd;
        octets[15] = 1;
        let d = NodeDescriptor {
            address: octets.to_vec(),
            ..descriptor(2, 0, [0, 0, 0, 0])
        };

        store.add_block_report(report(&d, 0)).unwrap();
        let block = store.get_block(Some(StorageTier(2)), AffinityId::ANY).unwrap();
        assert!(block.owner().address().is_ipv6());
    }

    #[test]
    fn test_bad_reports_leave_store_untouched() {
        let store = cluster();
        let unspecified = descriptor(0, 1, [0, 0, 0, 0]);
        let short = NodeDescriptor {
            address: vec![10, 0],
            ..descriptor(0, 1, [0, 0, 0, 0])
        };
        let wrong_tier = descriptor(3, 1, [10, 0, 0, 1]);

        assert!(matches!(
            store.add_block_report(report(&unspecified, 0)),
            Err(AllocationError::MalformedIdentity(_))
        ));
        assert!(matches!(
            store.add_block_report(report(&short, 0)),
            Err(AllocationError::MalformedIdentity(_))
        ));
        assert!(matches!(
            store.add_block_report(report(&wrong_tier, 0)),
            Err(AllocationError::TierOutOfRange { .. })
        ));

        assert_eq!(store.stats().nodes(), 0);
        assert!(store.get_block(None, AffinityId::ANY).is_none());
    }

    // =============================================================================
    // TIER DEGRADATION
    // =============================================================================

    #[test]
    fn test_fast_tier_degrades_in_tier_order() {
        let store = cluster();
        fill_node(&store, &make_identity(0, 1, 1), 0, 2).unwrap();
        fill_node(&store, &make_identity(1, 1, 1), 0, 3).unwrap();
        fill_node(&store, &make_identity(2, 1, 1), 0, 4).unwrap();

        let tiers: Vec<u16> = std::iter::from_fn(|| {
            store
                .get_block(Some(StorageTier(0)), AffinityId(1))
                .map(|b| b.tier().0)
        })
        .collect();

        assert_eq!(tiers, vec![0, 0, 1, 1, 1, 2, 2, 2, 2]);
    }

    #[test]
    fn test_slow_tier_preference_degrades_to_lowest_first() {
        let store = cluster();
        fill_node(&store, &make_identity(0, 0, 1), 0, 1).unwrap();
        fill_node(&store, &make_identity(1, 0, 1), 0, 1).unwrap();

        // Tier 2 is empty; the scan starts over from tier 0.
        let first = store.get_block(Some(StorageTier(2)), AffinityId::ANY).unwrap();
        let second = store.get_block(Some(StorageTier(2)), AffinityId::ANY).unwrap();
        assert_eq!(first.tier(), StorageTier(0));
        assert_eq!(second.tier(), StorageTier(1));
    }

    #[test]
    fn test_round_robin_spreads_within_affinity_group() {
        let store = cluster();
        let nodes: Vec<_> = (1..=3).map(|host| make_identity(1, 4, host)).collect();
        for node in &nodes {
            fill_node(&store, node, 0, 30).unwrap();
        }

        let mut per_node: HashMap<NodeIdentity, usize> = HashMap::new();
        for _ in 0..30 {
            let block = store.get_block(Some(StorageTier(1)), AffinityId(4)).unwrap();
            *per_node.entry(*block.owner()).or_default() += 1;
        }

        assert_eq!(per_node.len(), 3);
        assert!(per_node.values().all(|&n| n == 10), "{per_node:?}");
    }

    #[test]
    fn test_random_policy_still_drains_everything() {
        let store = BlockStore::new(
            AllocatorConfig::new()
                .with_tier_count(2)
                .with_selection_policy(SelectionPolicy::Random),
        )
        .unwrap();
        for host in 1..=5 {
            fill_node(&store, &make_identity(1, u32::from(host), host), 0, 20).unwrap();
        }

        let mut drained = 0;
        while store.get_block(Some(StorageTier(0)), AffinityId(3)).is_some() {
            drained += 1;
        }
        assert_eq!(drained, 100);
    }

    // =============================================================================
    // LOGGING
    // =============================================================================

    #[test]
    fn test_store_runs_under_subscriber() {
        let config = TelemetryConfig::default().with_log_level("tbs_block_allocation=debug");
        // Another test in this binary may already own the global subscriber.
        let _ = init_logging(&config);

        let store = cluster();
        let d = descriptor(1, 2, [10, 1, 1, 1]);
        store.add_block_report(report(&d, 0)).unwrap();
        assert!(store.get_block(Some(StorageTier(0)), AffinityId(2)).is_some());
        assert!(store.add_node(make_identity(9, 0, 1)).is_err());
    }
}
