//! # Domain Layer
//!
//! Allocation logic for the Tiered Block Store. No I/O: everything here is
//! in-memory and synchronous.
//!
//! ## Modules
//!
//! - `config` - AllocatorConfig and SelectionPolicy
//! - `errors` - AllocationError and ConfigError
//! - `selection` - Round-robin and random scan start strategies
//! - `node_record` - Node identity plus FIFO free-block queue
//! - `node_pool` - Ordered node group with a bounded scan
//! - `tier_registry` - Per-tier membership and allocation routing

pub mod config;
pub mod errors;
pub mod node_pool;
pub mod node_record;
pub mod selection;
pub mod tier_registry;
