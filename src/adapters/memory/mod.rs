//! In-process adapters: deterministic clock and IDs, map-backed filesystem.

pub mod clock;
pub mod filesystem;
pub mod id_gen;
