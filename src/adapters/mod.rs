//! Adapter implementations of the port traits.
//!
//! - `live`: system clock, `tokio::fs` with atomic writes, random UUIDs.
//! - `memory`: fixed clock, sequential IDs, map-backed filesystem.

pub mod live;
pub mod memory;
