//! # Block Allocation Engine
//!
//! Metadata-side allocator of a tiered distributed storage service. Storage
//! nodes report free extents ("blocks"); clients ask for a block on a
//! preferred tier near a locality hint and get one, or learn the store is out
//! of space.
//!
//! ## Architecture
//!
//! ```text
//! node reports ──add_block──→ BlockStore ──by owner tier──→ TierRegistry[t]
//!                                                           │ membership map
//!                                                           ↓
//!                                                      NodeRecord (FIFO)
//!
//! client ──get_block(tier, affinity)──→ BlockStore
//!            │ preferred tier, then every tier in index order
//!            ↓
//!       TierRegistry ──affinity pool, then "any" pool──→ NodePool
//!            │ selection picks a start index, scan wraps once
//!            ↓
//!       first NodeRecord with a free block
//! ```
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Description |
//! |----|-----------|-------------|
//! | 1 | Fixed Tier | A node lives in the tier it first declared, forever |
//! | 2 | Single Record | One `NodeRecord` per identity; pools share it via `Arc` |
//! | 3 | At-Most-Once | A block sits in one queue; a pop moves it to one caller |
//! | 4 | Monotone Counts | Free counts change only through add/get of blocks |
//!
//! ## Crate Structure (Hexagonal Architecture)
//!
//! - `domain/` - Selection, node records, pools, tier registries, config, errors
//! - `ports/` - Inbound API trait
//! - `service/` - `BlockStore` facade implementing the API
//!
//! ## Usage
//!
//! ```ignore
//! use tbs_block_allocation::{AllocatorConfig, BlockAllocationApi, BlockStore, SelectionPolicy};
//!
//! let config = AllocatorConfig::new()
//!     .with_tier_count(2)
//!     .with_selection_policy(SelectionPolicy::RoundRobin);
//! let store = BlockStore::new(config)?;
//!
//! store.add_block(block)?;
//! let block = store.get_block(Some(StorageTier(0)), AffinityId(5));
//! ```

pub mod domain;
pub mod ports;
pub mod service;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

// Re-export key types for convenience
pub use domain::config::{AllocatorConfig, SelectionPolicy};
pub use domain::errors::{AllocationError, ConfigError};
pub use domain::node_pool::NodePool;
pub use domain::node_record::NodeRecord;
pub use domain::selection::BlockSelection;
pub use domain::tier_registry::{StoreStats, TierRegistry, TierStats};
pub use ports::inbound::BlockAllocationApi;
pub use service::BlockStore;

// Re-export shared types callers need for every call
pub use tbs_types::{
    AffinityId, Block, BlockLocation, BlockReport, NodeDescriptor, NodeIdentity, StorageTier,
    StorageType,
};
