//! # Tier Registry
//!
//! Membership and allocation for one storage tier.
//!
//! ## Module Structure
//!
//! - `registry` - TierRegistry: membership map, affinity pools, "any" pool
//! - `stats` - TierStats and StoreStats advisory snapshots

mod registry;
mod stats;


// Re-export public API
pub use registry::TierRegistry;
pub use stats::{StoreStats, TierStats};
