//! # Block Selection
//!
//! Picks where a node pool starts its scan for a free block.
//!
//! A closed set of strategies, dispatched with a `match` rather than a trait
//! object. Each [`NodePool`] owns one instance built from the store's
//! [`SelectionPolicy`].
//!
//! [`NodePool`]: crate::domain::node_pool::NodePool

use crate::domain::config::SelectionPolicy;
use rand::Rng;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Start-index strategy for scanning a group of nodes.
#[derive(Debug)]
pub enum BlockSelection {
    /// Shared counter, taken modulo the group size on every call.
    ///
    /// `fetch_add` wraps at `usize::MAX`, so the counter never leaves the
    /// valid range even after overflow.
    RoundRobin { counter: AtomicUsize },
    /// Uniform start from the calling thread's RNG.
    Random,
}

impl BlockSelection {
    /// Build the strategy a policy names.
    pub fn new(policy: SelectionPolicy) -> Self {
        match policy {
            SelectionPolicy::RoundRobin => Self::round_robin_starting_at(0),
            SelectionPolicy::Random => BlockSelection::Random,
        }
    }

    /// Round-robin with a chosen counter value. Deterministic, so tests use
    /// it to pin scan order.
    pub fn round_robin_starting_at(start: usize) -> Self {
        BlockSelection::RoundRobin {
            counter: AtomicUsize::new(start),
        }
    }

    /// Policy this strategy implements.
    pub fn policy(&self) -> SelectionPolicy {
        match self {
            BlockSelection::RoundRobin { .. } => SelectionPolicy::RoundRobin,
            BlockSelection::Random => SelectionPolicy::Random,
        }
    }

    /// Index in `[0, group_size)` to start scanning from.
    ///
    /// Groups of zero or one always start at 0.
    pub fn next_start(&self, group_size: usize) -> usize {
        if group_size <= 1 {
            return 0;
        }
        match self {
            BlockSelection::RoundRobin { counter } => {
                counter.fetch_add(1, Ordering::Relaxed) % group_size
            }
            BlockSelection::Random => rand::thread_rng().gen_range(0..group_size),
        }
    }
}
