//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the stores and the outside
//! world (time, disk, identifiers). Implementations live in `src/adapters/`.

pub mod clock;
pub mod filesystem;
pub mod id_gen;

pub use clock::Clock;
pub use filesystem::{FileSystem, FsFuture};
pub use id_gen::IdGenerator;
