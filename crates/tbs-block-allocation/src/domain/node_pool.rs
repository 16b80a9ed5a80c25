//! # Node Pool
//!
//! Ordered group of nodes scanned for a free block: one per affinity group,
//! plus the tier-wide "any" group.
//!
//! `get` runs under the read lock and sees a fixed membership for the whole
//! scan. `add` takes the write lock and is rare next to `get`.

use crate::domain::config::SelectionPolicy;
use crate::domain::node_record::NodeRecord;
use crate::domain::selection::BlockSelection;
use parking_lot::RwLock;
use std::sync::Arc;
use tbs_types::Block;

/// A group of node records plus the strategy that picks where scans start.
#[derive(Debug)]
pub struct NodePool {
    nodes: RwLock<Vec<Arc<NodeRecord>>>,
    selection: BlockSelection,
}

impl NodePool {
    pub fn new(policy: SelectionPolicy) -> Self {
        Self::with_selection(BlockSelection::new(policy))
    }

    /// Build with an explicit selection strategy.
    pub fn with_selection(selection: BlockSelection) -> Self {
        Self {
            nodes: RwLock::new(Vec::new()),
            selection,
        }
    }

    /// Append a record to the group.
    pub(crate) fn add(&self, record: Arc<NodeRecord>) {
        self.nodes.write().push(record);
    }

    /// Pop one free block from the group.
    ///
    /// Starts at the selection's index and walks every member once, wrapping
    /// around. Returns the first block found, or `None` if every member's
    /// queue was empty.
    pub fn get(&self) -> Option<Block> {
        let nodes = self.nodes.read();
        let size = nodes.len();
        if size == 0 {
            return None;
        }
        let start = self.selection.next_start(size);
        (0..size).find_map(|i| nodes[(start + i) % size].get_free_block())
    }

    /// Number of member nodes.
    pub fn len(&self) -> usize {
        self.nodes.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.read().is_empty()
    }

    /// Sum of member free counts (advisory).
    pub fn free_blocks(&self) -> usize {
        self.nodes.read().iter().map(|n| n.free_count()).sum()
    }

    pub fn selection(&self) -> &BlockSelection {
        &self.selection
    }
}
