//! Execution memory: short-term and long-term records of agent activity.

pub mod model;
pub mod recorder;
pub mod retention;
pub mod store;

pub use model::{Importance, MemoryEntry, MemoryEntryInput, Scope};
pub use recorder::record_tool_result;
pub use store::{AppendOptions, ListOptions, MemoryStore, PruneOptions};
