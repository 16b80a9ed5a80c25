//! # Shared Types Crate
//!
//! Identity and key types shared across the Tiered Block Store workspace.
//!
//! ## Design Principles
//!
//! - **Validated identities**: a [`NodeIdentity`] can only be built from
//!   attributes that resolve to a concrete, routable `address:port`. Raw input
//!   arrives as a [`NodeDescriptor`] and is converted with `TryFrom`.
//! - **Inherited placement**: a [`Block`] takes its tier and affinity from the
//!   node that reported it and never changes afterwards.
//! - **Move-only blocks**: [`Block`] is not `Clone`. Handing a block out
//!   moves it to the caller.

pub mod entities;
pub mod errors;

pub use entities::*;
pub use errors::*;
