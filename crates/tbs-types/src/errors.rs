//! # Error Types
//!
//! Identity resolution failures.

use thiserror::Error;

/// Reasons a node's declared attributes cannot be turned into a [`NodeIdentity`].
///
/// [`NodeIdentity`]: crate::NodeIdentity
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    /// Raw address is neither 4 (IPv4) nor 16 (IPv6) octets.
    #[error("invalid address length: {len} octets (expected 4 or 16)")]
    InvalidAddressLength { len: usize },

    /// Address is the unspecified wildcard (`0.0.0.0` / `::`).
    #[error("unspecified address {0} cannot identify a storage node")]
    UnspecifiedAddress(std::net::IpAddr),

    /// Port zero is not a reachable endpoint.
    #[error("invalid port: {0}")]
    InvalidPort(u16),

    /// Textual address could not be parsed.
    #[error("unparsable address: {0:?}")]
    UnparsableAddress(String),
}
