//! # Block Allocation API Implementation

use super::*;
use crate::domain::node_record::NodeRecord;
use crate::ports::inbound::BlockAllocationApi;
use std::sync::Arc;
use tbs_types::{AffinityId, Block, BlockReport, NodeDescriptor, NodeIdentity};
use tracing::debug;

impl BlockAllocationApi for BlockStore {
    fn add_block(&self, block: Block) -> Result<(), AllocationError> {
        let tier = self.route(block.tier())?;
        tier.add_block(block);
        Ok(())
    }

    fn add_block_report(&self, report: BlockReport) -> Result<(), AllocationError> {
        let block = Block::try_from(report)?;
        self.add_block(block)
    }

    fn add_node(&self, identity: NodeIdentity) -> Result<(), AllocationError> {
        self.route(identity.tier())?.add_node(identity)
    }

    fn register_node(&self, descriptor: &NodeDescriptor) -> Result<(), AllocationError> {
        let identity = NodeIdentity::try_from(descriptor)?;
        self.add_node(identity)
    }

    fn get_block(
        &self,
        preferred_tier: Option<StorageTier>,
        affinity: AffinityId,
    ) -> Option<Block> {
        match preferred_tier {
            Some(tier) => match self.tier(tier) {
                Some(registry) => {
                    if let Some(block) = registry.get_block(affinity) {
                        return Some(block);
                    }
                    // The caller may get a different tier than it asked for.
                    debug!(
                        preferred_tier = %tier,
                        affinity = %affinity,
                        "preferred tier has no free block, scanning all tiers"
                    );
                }
                None => debug!(
                    preferred_tier = %tier,
                    tier_count = self.config.tier_count,
                    affinity = %affinity,
                    "preferred tier not configured, scanning all tiers"
                ),
            },
            None => debug!(affinity = %affinity, "no preferred tier, scanning all tiers"),
        }
        self.tiers.iter().find_map(|tier| tier.get_block(affinity))
    }

    fn lookup_node(&self, identity: &NodeIdentity) -> Option<Arc<NodeRecord>> {
        self.tier(identity.tier())?.get_node(identity)
    }
}
