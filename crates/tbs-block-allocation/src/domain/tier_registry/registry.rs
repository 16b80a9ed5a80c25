//! TierRegistry: routes ingestion and allocation within one tier.

use super::stats::TierStats;
use crate::domain::config::SelectionPolicy;
use crate::domain::errors::AllocationError;
use crate::domain::node_pool::NodePool;
use crate::domain::node_record::NodeRecord;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;
use tbs_types::{AffinityId, Block, NodeIdentity, StorageTier};
use tracing::{debug, info};

/// Registry for a single storage tier.
///
/// ## Ownership
///
/// `membership` holds the authoritative `Arc<NodeRecord>` for each node. The
/// affinity pools and the "any" pool hold clones of the same `Arc`, so a
/// block pushed through any path is visible to every pool the node is in.
///
/// ## Thread Safety
///
/// Both maps are sharded (`DashMap`) and use the entry API for
/// insert-if-absent. Pool membership sits behind each pool's `RwLock`.
#[derive(Debug)]
pub struct TierRegistry {
    tier: StorageTier,
    policy: SelectionPolicy,
    membership: DashMap<NodeIdentity, Arc<NodeRecord>>,
    affinity_pools: DashMap<AffinityId, Arc<NodePool>>,
    any_pool: NodePool,
}

impl TierRegistry {
    pub fn new(tier: StorageTier, policy: SelectionPolicy) -> Self {
        debug!(tier = %tier, policy = %policy, "block selection configured");
        Self {
            tier,
            policy,
            membership: DashMap::new(),
            affinity_pools: DashMap::new(),
            any_pool: NodePool::new(policy),
        }
    }

    pub fn tier(&self) -> StorageTier {
        self.tier
    }

    pub fn policy(&self) -> SelectionPolicy {
        self.policy
    }

    /// Enqueue a reported block, registering its owner on first sight.
    ///
    /// Caller guarantees the block belongs to this tier.
    pub(crate) fn add_block(&self, block: Block) {
        let owner = *block.owner();
        // Copy the Arc out so the shard read guard is gone before `register`
        // takes the same shard for writing.
        let existing = self.membership.get(&owner).map(|r| Arc::clone(r.value()));
        let record = match existing {
            Some(record) => record,
            None => self.register(owner).0,
        };
        record.add_free_block(block);
    }

    /// Explicitly register a node.
    ///
    /// Fails with `DuplicateRegistration` if the identity is already a member.
    /// Caller guarantees the identity belongs to this tier.
    pub(crate) fn add_node(&self, identity: NodeIdentity) -> Result<(), AllocationError> {
        match self.register(identity) {
            (_, true) => Ok(()),
            (_, false) => Err(AllocationError::DuplicateRegistration { node: identity }),
        }
    }

    /// Pop one free block, preferring the given affinity group.
    ///
    /// `AffinityId::ANY` goes straight to the tier-wide pool. Any other
    /// affinity tries its own pool first and falls back to the tier-wide pool
    /// when that group is missing or drained.
    pub fn get_block(&self, affinity: AffinityId) -> Option<Block> {
        if affinity.is_any() {
            return self.any_pool.get();
        }

        let pool = self
            .affinity_pools
            .get(&affinity)
            .map(|p| Arc::clone(p.value()));
        if let Some(block) = pool.and_then(|p| p.get()) {
            return Some(block);
        }

        debug!(tier = %self.tier, affinity = %affinity, "affinity group empty, using any group");
        self.any_pool.get()
    }

    /// Membership lookup.
    pub fn get_node(&self, identity: &NodeIdentity) -> Option<Arc<NodeRecord>> {
        self.membership.get(identity).map(|r| Arc::clone(r.value()))
    }

    pub fn node_count(&self) -> usize {
        self.membership.len()
    }

    pub fn affinity_group_count(&self) -> usize {
        self.affinity_pools.len()
    }

    /// Advisory counters for this tier.
    pub fn stats(&self) -> TierStats {
        TierStats {
            tier: self.tier,
            nodes: self.membership.len(),
            affinity_groups: self.affinity_pools.len(),
            free_blocks: self
                .membership
                .iter()
                .map(|entry| entry.value().free_count())
                .sum(),
        }
    }

    /// Insert-if-absent on the membership map.
    ///
    /// Returns the surviving record and whether this call created it. Only
    /// the creating call attaches the record to the pools, so a node is
    /// attached exactly once no matter how many callers race.
    fn register(&self, identity: NodeIdentity) -> (Arc<NodeRecord>, bool) {
        let record = match self.membership.entry(identity) {
            Entry::Occupied(entry) => return (Arc::clone(entry.get()), false),
            Entry::Vacant(entry) => {
                let record = Arc::new(NodeRecord::new(identity));
                entry.insert(Arc::clone(&record));
                record
            }
        };
        self.attach(&record);
        (record, true)
    }

    /// Add a freshly registered record to its affinity pool and the "any" pool.
    fn attach(&self, record: &Arc<NodeRecord>) {
        let identity = record.identity();
        info!(
            tier = %self.tier,
            affinity = %identity.affinity(),
            storage_type = %identity.storage_type(),
            node = %identity.endpoint(),
            "adding storage node"
        );

        let policy = self.policy;
        let pool = Arc::clone(
            self.affinity_pools
                .entry(identity.affinity())
                .or_insert_with(|| Arc::new(NodePool::new(policy)))
                .value(),
        );
        pool.add(Arc::clone(record));
        self.any_pool.add(Arc::clone(record));
    }
}
