//! # Core Domain Entities
//!
//! ## Clusters
//!
//! - **Keys**: `StorageTier`, `AffinityId`, `StorageType`
//! - **Nodes**: `NodeIdentity`, `NodeDescriptor`
//! - **Blocks**: `Block`, `BlockLocation`, `BlockReport`

use crate::errors::IdentityError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};

// =============================================================================
// CLUSTER A: KEYS
// =============================================================================

/// Index of a configured storage tier (memory, NVMe, disk, ...).
///
/// Valid values are `[0, tier_count)` for the store they are used against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StorageTier(pub u16);

impl StorageTier {
    /// Position of this tier in a tier array.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for StorageTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Locality grouping hint. `AffinityId::ANY` (0) means "no preference".
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct AffinityId(pub u32);

impl AffinityId {
    /// No locality preference.
    pub const ANY: AffinityId = AffinityId(0);

    /// True for the "no preference" value.
    #[inline]
    pub fn is_any(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for AffinityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Backend kind a node reports under (opaque to the allocator).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct StorageType(pub u32);

impl fmt::Display for StorageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// CLUSTER B: NODES
// =============================================================================

/// Unique, validated identity of a storage node.
///
/// Two identities are equal only if every attribute matches, so the same
/// `address:port` declared under a different tier is a different node.
/// Immutable once built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct NodeIdentity {
    storage_type: StorageType,
    tier: StorageTier,
    affinity: AffinityId,
    endpoint: SocketAddr,
}

impl NodeIdentity {
    /// Build an identity from an already-resolved endpoint.
    ///
    /// Rejects the unspecified address and port 0.
    pub fn new(
        storage_type: StorageType,
        tier: StorageTier,
        affinity: AffinityId,
        endpoint: SocketAddr,
    ) -> Result<Self, IdentityError> {
        if endpoint.ip().is_unspecified() {
            return Err(IdentityError::UnspecifiedAddress(endpoint.ip()));
        }
        if endpoint.port() == 0 {
            return Err(IdentityError::InvalidPort(0));
        }
        Ok(Self {
            storage_type,
            tier,
            affinity,
            endpoint,
        })
    }

    /// Build an identity from a textual IP address.
    pub fn parse(
        storage_type: StorageType,
        tier: StorageTier,
        affinity: AffinityId,
        address: &str,
        port: u16,
    ) -> Result<Self, IdentityError> {
        let ip: IpAddr = address
            .trim()
            .parse()
            .map_err(|_| IdentityError::UnparsableAddress(address.to_string()))?;
        Self::new(storage_type, tier, affinity, SocketAddr::new(ip, port))
    }

    pub fn storage_type(&self) -> StorageType {
        self.storage_type
    }

    pub fn tier(&self) -> StorageTier {
        self.tier
    }

    pub fn affinity(&self) -> AffinityId {
        self.affinity
    }

    pub fn endpoint(&self) -> SocketAddr {
        self.endpoint
    }

    pub fn address(&self) -> IpAddr {
        self.endpoint.ip()
    }

    pub fn port(&self) -> u16 {
        self.endpoint.port()
    }
}

impl fmt::Display for NodeIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (type {}, tier {}, affinity {})",
            self.endpoint, self.storage_type, self.tier, self.affinity
        )
    }
}

/// Node attributes as declared by a reporting node, before validation.
///
/// `address` holds raw network-order octets, 4 for IPv4 or 16 for IPv6.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeDescriptor {
    pub storage_type: StorageType,
    pub tier: StorageTier,
    pub affinity: AffinityId,
    pub address: Vec<u8>,
    pub port: u16,
}

impl NodeDescriptor {
    /// Decode the raw address octets.
    pub fn ip(&self) -> Result<IpAddr, IdentityError> {
        match self.address.len() {
            4 => {
                let mut octets = [0u8; 4];
                octets.copy_from_slice(&self.address);
                Ok(IpAddr::V4(Ipv4Addr::from(octets)))
            }
            16 => {
                let mut octets = [0u8; 16];
                octets.copy_from_slice(&self.address);
                Ok(IpAddr::V6(Ipv6Addr::from(octets)))
            }
            len => Err(IdentityError::InvalidAddressLength { len }),
        }
    }
}

impl TryFrom<&NodeDescriptor> for NodeIdentity {
    type Error = IdentityError;

    fn try_from(desc: &NodeDescriptor) -> Result<Self, Self::Error> {
        let ip = desc.ip()?;
        NodeIdentity::new(
            desc.storage_type,
            desc.tier,
            desc.affinity,
            SocketAddr::new(ip, desc.port),
        )
    }
}

impl TryFrom<NodeDescriptor> for NodeIdentity {
    type Error = IdentityError;

    fn try_from(desc: NodeDescriptor) -> Result<Self, Self::Error> {
        NodeIdentity::try_from(&desc)
    }
}

impl From<&NodeIdentity> for NodeDescriptor {
    fn from(id: &NodeIdentity) -> Self {
        let address = match id.address() {
            IpAddr::V4(v4) => v4.octets().to_vec(),
            IpAddr::V6(v6) => v6.octets().to_vec(),
        };
        Self {
            storage_type: id.storage_type(),
            tier: id.tier(),
            affinity: id.affinity(),
            address,
            port: id.port(),
        }
    }
}

// =============================================================================
// CLUSTER C: BLOCKS
// =============================================================================

/// Where a free extent lives on its owning node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockLocation {
    /// Node-local address of the extent.
    pub address: u64,
    /// Extent length in bytes.
    pub length: u32,
    /// Transport access key handed back to clients.
    pub access_key: u32,
}

impl BlockLocation {
    pub fn new(address: u64, length: u32, access_key: u32) -> Self {
        Self {
            address,
            length,
            access_key,
        }
    }
}

/// A free storage extent offered by one node.
///
/// Tier and affinity are copied from the owner at creation. Not `Clone`:
/// a block moves from a node's free queue to exactly one caller.
#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct Block {
    owner: NodeIdentity,
    location: BlockLocation,
}

impl Block {
    pub fn new(owner: NodeIdentity, location: BlockLocation) -> Self {
        Self { owner, location }
    }

    pub fn owner(&self) -> &NodeIdentity {
        &self.owner
    }

    pub fn tier(&self) -> StorageTier {
        self.owner.tier()
    }

    pub fn affinity(&self) -> AffinityId {
        self.owner.affinity()
    }

    pub fn location(&self) -> BlockLocation {
        self.location
    }
}

/// A block report as it arrives from a storage node, before validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockReport {
    pub owner: NodeDescriptor,
    pub location: BlockLocation,
}

impl TryFrom<BlockReport> for Block {
    type Error = IdentityError;

    fn try_from(report: BlockReport) -> Result<Self, Self::Error> {
        let owner = NodeIdentity::try_from(&report.owner)?;
        Ok(Block::new(owner, report.location))
    }
}
