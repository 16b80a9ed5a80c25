//! # Allocator Configuration
//!
//! The one explicit context object a [`BlockStore`] is built from. There is no
//! process-wide configuration state: callers construct an [`AllocatorConfig`]
//! and pass it in.
//!
//! [`BlockStore`]: crate::service::BlockStore

use crate::domain::errors::ConfigError;
use std::fmt;
use std::str::FromStr;

/// Which start-index strategy every node pool in the store uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionPolicy {
    /// Shared counter; spreads load evenly over time.
    RoundRobin,
    /// Uniform random start; no shared state between callers.
    #[default]
    Random,
}

impl SelectionPolicy {
    /// Canonical config spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            SelectionPolicy::RoundRobin => "roundrobin",
            SelectionPolicy::Random => "random",
        }
    }
}

impl fmt::Display for SelectionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SelectionPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "roundrobin" | "round-robin" | "round_robin" => Ok(SelectionPolicy::RoundRobin),
            "random" => Ok(SelectionPolicy::Random),
            _ => Err(ConfigError::UnknownSelectionPolicy(s.to_string())),
        }
    }
}

/// Configuration for a block store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocatorConfig {
    /// Number of storage tiers (default: 1). Must be at least 1.
    pub tier_count: u16,

    /// Start-index strategy for node pools (default: random).
    pub selection_policy: SelectionPolicy,
}

impl Default for AllocatorConfig {
    fn default() -> Self {
        Self {
            tier_count: 1,
            selection_policy: SelectionPolicy::Random,
        }
    }
}

impl AllocatorConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of tiers.
    pub fn with_tier_count(mut self, tier_count: u16) -> Self {
        self.tier_count = tier_count;
        self
    }

    /// Set the selection policy.
    pub fn with_selection_policy(mut self, policy: SelectionPolicy) -> Self {
        self.selection_policy = policy;
        self
    }

    /// Check construction-time invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tier_count == 0 {
            return Err(ConfigError::ZeroTiers);
        }
        Ok(())
    }

    /// Deterministic two-tier round-robin config for tests.
    #[cfg(any(test, feature = "test-utils"))]
    pub fn for_testing() -> Self {
        Self {
            tier_count: 2,
            selection_policy: SelectionPolicy::RoundRobin,
        }
    }
}

// ============================================================================
// TOML loading (requires "config-file" feature)
// ============================================================================

#[cfg(feature = "config-file")]
mod toml_config {
    use super::*;
    use serde::Deserialize;
    use std::fs;
    use std::path::Path;

    #[derive(Debug, Deserialize, Default)]
    struct ConfigFile {
        #[serde(default)]
        allocation: AllocationSection,
    }

    #[derive(Debug, Deserialize, Default)]
    struct AllocationSection {
        tier_count: Option<u16>,
        selection_policy: Option<String>,
    }

    impl AllocatorConfig {
        /// Load from TOML text.
        ///
        /// # Format
        ///
        /// ```toml
        /// [allocation]
        /// tier_count = 3
        /// selection_policy = "roundrobin"
        /// ```
        ///
        /// Missing keys keep their defaults. The result is validated.
        pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
            let file: ConfigFile =
                toml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;

            let mut config = AllocatorConfig::default();
            if let Some(tier_count) = file.allocation.tier_count {
                config.tier_count = tier_count;
            }
            if let Some(policy) = file.allocation.selection_policy {
                config.selection_policy = policy.parse()?;
            }
            config.validate()?;
            Ok(config)
        }

        /// Load from a TOML file on disk.
        pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
            let path = path.as_ref();
            let text = fs::read_to_string(path)
                .map_err(|e| ConfigError::Parse(format!("{}: {}", path.display(), e)))?;
            Self::from_toml_str(&text)
        }
    }
}
