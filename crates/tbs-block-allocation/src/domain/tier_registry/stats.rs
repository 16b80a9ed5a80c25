//! Advisory per-tier counters.

use tbs_types::StorageTier;

/// Point-in-time view of one tier. Counts may be stale under concurrent
/// mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierStats {
    pub tier: StorageTier,
    /// Registered nodes.
    pub nodes: usize,
    /// Affinity groups created so far.
    pub affinity_groups: usize,
    /// Free blocks across all nodes.
    pub free_blocks: usize,
}

impl TierStats {
    /// True if no node in the tier currently offers a block.
    pub fn is_exhausted(&self) -> bool {
        self.free_blocks == 0
    }
}

/// Point-in-time view of a whole store, one entry per tier in index order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StoreStats {
    pub tiers: Vec<TierStats>,
}

impl StoreStats {
    /// Registered nodes across all tiers.
    pub fn nodes(&self) -> usize {
        self.tiers.iter().map(|t| t.nodes).sum()
    }

    /// Free blocks across all tiers.
    pub fn free_blocks(&self) -> usize {
        self.tiers.iter().map(|t| t.free_blocks).sum()
    }
}
