//! ID generator port for task and memory entry identifiers.

/// Generates unique identifiers.
///
/// Task IDs must look like hyphenated UUIDs: batch dependency resolution
/// treats UUID-shaped tokens as IDs and everything else as task names.
pub trait IdGenerator: Send + Sync {
    /// Generates a new unique identifier string.
    fn generate_id(&self) -> String;
}
