//! # Ports Layer
//!
//! - `inbound` - API the allocation core offers to the transport adapters
//!   that carry block reports, registrations and allocation requests.

pub mod inbound;

pub use inbound::BlockAllocationApi;
