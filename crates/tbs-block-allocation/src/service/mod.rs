//! # Block Store Service
//!
//! The top-level facade implementing the allocation API.
//!
//! ## Architecture
//!
//! This service:
//! 1. Owns one `TierRegistry` per configured tier
//! 2. Routes ingestion and registration by the node's declared tier
//! 3. Routes allocation to the preferred tier, then scans every tier
//! 4. Is built from an explicit `AllocatorConfig`; there is no global state

mod api;

use crate::domain::config::AllocatorConfig;
use crate::domain::errors::{AllocationError, ConfigError};
use crate::domain::tier_registry::{StoreStats, TierRegistry};
use tbs_types::StorageTier;
use tracing::{info, warn};

/// The Block Store.
///
/// ## Thread Safety
///
/// Every method takes `&self`. Share across threads or async tasks with
/// `Arc<BlockStore>`; all synchronization lives inside the tiers.
#[derive(Debug)]
pub struct BlockStore {
    /// Store configuration.
    config: AllocatorConfig,
    /// Tier registries, indexed by `StorageTier`.
    tiers: Vec<TierRegistry>,
}

impl BlockStore {
    /// Create a store with one empty registry per configured tier.
    ///
    /// ## Errors
    ///
    /// - `ZeroTiers`: a store without tiers cannot route anything
    pub fn new(config: AllocatorConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let tiers = (0..config.tier_count)
            .map(|t| TierRegistry::new(StorageTier(t), config.selection_policy))
            .collect();

        info!(
            tier_count = config.tier_count,
            selection_policy = %config.selection_policy,
            "block store initialized"
        );

        Ok(Self { config, tiers })
    }

    pub fn config(&self) -> &AllocatorConfig {
        &self.config
    }

    pub fn tier_count(&self) -> u16 {
        self.config.tier_count
    }

    /// Registry for a tier, or `None` if the tier is not configured.
    pub fn tier(&self, tier: StorageTier) -> Option<&TierRegistry> {
        self.tiers.get(tier.index())
    }

    /// Advisory counters for every tier.
    pub fn stats(&self) -> StoreStats {
        StoreStats {
            tiers: self.tiers.iter().map(TierRegistry::stats).collect(),
        }
    }

    /// Registry a reporting node must land in.
    pub(crate) fn route(&self, tier: StorageTier) -> Result<&TierRegistry, AllocationError> {
        self.tier(tier).ok_or_else(|| {
            warn!(
                tier = %tier,
                tier_count = self.config.tier_count,
                "rejecting node report for unconfigured tier"
            );
            AllocationError::TierOutOfRange {
                tier,
                tier_count: self.config.tier_count,
            }
        })
    }
}
