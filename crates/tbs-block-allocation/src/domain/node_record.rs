//! # Node Record
//!
//! A registered storage node: its identity plus a FIFO queue of the free
//! blocks it has reported. Node pools hold `Arc<NodeRecord>` handles to the
//! one record that lives in the tier's membership map.

use parking_lot::Mutex;
use std::collections::VecDeque;
use tbs_types::{AffinityId, Block, NodeIdentity, StorageTier};

/// Identity plus free-block queue for one storage node.
///
/// The queue has its own lock, so pops on different records never contend.
///
/// Outside this crate a record is read-only: blocks enter through
/// `BlockStore::add_block` and leave through `BlockStore::get_block`.
///
/// ```compile_fail
/// use tbs_block_allocation::{
///     AffinityId, AllocatorConfig, Block, BlockAllocationApi, BlockLocation, BlockStore,
///     NodeIdentity, StorageTier, StorageType,
/// };
///
/// let store = BlockStore::new(AllocatorConfig::new()).unwrap();
/// let node = NodeIdentity::parse(StorageType(0), StorageTier(0), AffinityId(1), "10.0.0.1", 4420)
///     .unwrap();
/// store.add_node(node).unwrap();
/// let record = store.lookup_node(&node).unwrap();
/// record.add_free_block(Block::new(node, BlockLocation::new(0, 4096, 0)));
/// ```
///
/// ```compile_fail
/// use tbs_block_allocation::{
///     AffinityId, AllocatorConfig, BlockAllocationApi, BlockStore, NodeIdentity, StorageTier,
///     StorageType,
/// };
///
/// let store = BlockStore::new(AllocatorConfig::new()).unwrap();
/// let node = NodeIdentity::parse(StorageType(0), StorageTier(0), AffinityId(1), "10.0.0.1", 4420)
///     .unwrap();
/// store.add_node(node).unwrap();
/// let _block = store.lookup_node(&node).unwrap().get_free_block();
/// ```
#[derive(Debug)]
pub struct NodeRecord {
    identity: NodeIdentity,
    free_blocks: Mutex<VecDeque<Block>>,
}

impl NodeRecord {
    pub fn new(identity: NodeIdentity) -> Self {
        Self {
            identity,
            free_blocks: Mutex::new(VecDeque::new()),
        }
    }

    pub fn identity(&self) -> &NodeIdentity {
        &self.identity
    }

    pub fn tier(&self) -> StorageTier {
        self.identity.tier()
    }

    pub fn affinity(&self) -> AffinityId {
        self.identity.affinity()
    }

    /// Enqueue a free block at the tail.
    pub(crate) fn add_free_block(&self, block: Block) {
        self.free_blocks.lock().push_back(block);
    }

    /// Dequeue the oldest free block, or `None` if the node has none.
    ///
    /// Never waits for a block to arrive.
    pub(crate) fn get_free_block(&self) -> Option<Block> {
        self.free_blocks.lock().pop_front()
    }

    /// Current queue length. Advisory: may be stale as soon as it returns.
    pub fn free_count(&self) -> usize {
        self.free_blocks.lock().len()
    }
}
