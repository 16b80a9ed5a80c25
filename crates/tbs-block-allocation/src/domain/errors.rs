//! # Domain Errors
//!
//! Error types for the allocation subsystem.
//!
//! ## Design Principles
//!
//! - Every recoverable condition is a value the caller can match on
//! - An empty pool is not an error: allocation returns `Option<Block>`
//! - Only configuration faults stop a store from being constructed

use tbs_types::{IdentityError, NodeIdentity, StorageTier};
use thiserror::Error;

/// Errors returned by ingestion and registration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AllocationError {
    /// Explicit registration of an identity that is already a member.
    #[error("node already registered: {node}")]
    DuplicateRegistration { node: NodeIdentity },

    /// Reported tier index is outside `[0, tier_count)`.
    #[error("tier {tier} out of range (store has {tier_count} tiers)")]
    TierOutOfRange { tier: StorageTier, tier_count: u16 },

    /// Node attributes could not be resolved into an identity.
    #[error("malformed node identity: {0}")]
    MalformedIdentity(#[from] IdentityError),
}

/// Errors raised while building or loading an [`AllocatorConfig`].
///
/// [`AllocatorConfig`]: crate::domain::config::AllocatorConfig
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A store needs at least one tier.
    #[error("tier_count must be at least 1")]
    ZeroTiers,

    /// Selection policy string is not one of the known policies.
    #[error("unknown block selection policy: {0:?} (expected \"roundrobin\" or \"random\")")]
    UnknownSelectionPolicy(String),

    /// Config source could not be read or decoded.
    #[error("config parse error: {0}")]
    Parse(String),
}
