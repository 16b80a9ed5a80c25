//! Fixtures for tests in this crate and in downstream test suites.

use crate::domain::errors::AllocationError;
use crate::ports::inbound::BlockAllocationApi;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use tbs_types::{AffinityId, Block, BlockLocation, NodeIdentity, StorageTier, StorageType};

/// Default port storage nodes listen on in fixtures.
pub const TEST_PORT: u16 = 4420;

/// Extent size used for fixture blocks.
pub const TEST_BLOCK_LEN: u32 = 1 << 20;

/// Identity for host `10.0.<tier>.<host>:4420`.
pub fn make_identity(tier: u16, affinity: u32, host: u8) -> NodeIdentity {
    let ip = IpAddr::V4(Ipv4Addr::new(10, 0, tier as u8, host));
    NodeIdentity::new(
        StorageType(0),
        StorageTier(tier),
        AffinityId(affinity),
        SocketAddr::new(ip, TEST_PORT),
    )
    .expect("fixture identities are well-formed")
}

/// Block at `address` on `owner`.
pub fn make_block(owner: &NodeIdentity, address: u64) -> Block {
    Block::new(*owner, BlockLocation::new(address, TEST_BLOCK_LEN, 0))
}

/// Report `count` blocks for `owner`, at addresses `first..first + count`.
pub fn fill_node<A: BlockAllocationApi + ?Sized>(
    api: &A,
    owner: &NodeIdentity,
    first: u64,
    count: u64,
) -> Result<(), AllocationError> {
    for address in first..first + count {
        api.add_block(make_block(owner, address))?;
    }
    Ok(())
}

/// Identity of a handed-out block: owning node plus address.
pub fn block_key(block: &Block) -> (NodeIdentity, u64) {
    (*block.owner(), block.location().address)
}
