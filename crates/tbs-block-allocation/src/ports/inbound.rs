//! # Inbound Ports (Driving Ports)
//!
//! The primary API of the allocation core. Transport adapters (RPC servers,
//! node heartbeat handlers) call into this; the core never calls out.

use crate::domain::errors::AllocationError;
use crate::domain::node_record::NodeRecord;
use std::sync::Arc;
use tbs_types::{AffinityId, Block, BlockReport, NodeDescriptor, NodeIdentity, StorageTier};

/// Primary API for block ingestion, node registration and allocation.
///
/// Every method is a single synchronous attempt. Nothing blocks waiting for
/// blocks to appear and nothing retries.
pub trait BlockAllocationApi: Send + Sync {
    /// Offer a free block reported by its owning node.
    ///
    /// The owner is registered on first sight.
    ///
    /// ## Errors
    ///
    /// - `TierOutOfRange`: the owner's tier is not configured; nothing is stored
    fn add_block(&self, block: Block) -> Result<(), AllocationError>;

    /// Resolve a raw block report and offer the block.
    ///
    /// ## Errors
    ///
    /// - `MalformedIdentity`: owner attributes do not resolve; no record is created
    /// - `TierOutOfRange`: as for [`add_block`](Self::add_block)
    fn add_block_report(&self, report: BlockReport) -> Result<(), AllocationError>;

    /// Explicitly register a node.
    ///
    /// ## Errors
    ///
    /// - `DuplicateRegistration`: the identity is already a member
    /// - `TierOutOfRange`: the identity's tier is not configured
    fn add_node(&self, identity: NodeIdentity) -> Result<(), AllocationError>;

    /// Resolve raw node attributes and register the node.
    ///
    /// ## Errors
    ///
    /// - `MalformedIdentity`: attributes do not resolve; no record is created
    /// - plus everything [`add_node`](Self::add_node) returns
    fn register_node(&self, descriptor: &NodeDescriptor) -> Result<(), AllocationError>;

    /// Hand out one free block.
    ///
    /// `preferred_tier` is tried first when it is set and configured. If it
    /// has nothing, every tier is scanned in ascending order. `None` means the
    /// whole store is out of free blocks; it is not an error.
    fn get_block(&self, preferred_tier: Option<StorageTier>, affinity: AffinityId)
        -> Option<Block>;

    /// Look up a registered node.
    ///
    /// The record is a read-only view: identity and advisory free count.
    fn lookup_node(&self, identity: &NodeIdentity) -> Option<Arc<NodeRecord>>;
}
