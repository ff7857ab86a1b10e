//! Service context bundling all port trait objects.

use crate::adapters::live::clock::LiveClock;
use crate::adapters::live::filesystem::LiveFileSystem;
use crate::adapters::live::id_gen::LiveIdGenerator;
use crate::adapters::memory::clock::FixedClock;
use crate::adapters::memory::filesystem::MemoryFileSystem;
use crate::adapters::memory::id_gen::SequenceIdGenerator;
use crate::ports::clock::Clock;
use crate::ports::filesystem::FileSystem;
use crate::ports::id_gen::IdGenerator;

/// Bundles all port trait objects into a single context.
///
/// Stores borrow a context instead of reaching for process-wide state, so
/// two stores over different data directories can live side by side.
pub struct ServiceContext {
    /// Clock for obtaining the current time.
    pub clock: Box<dyn Clock>,
    /// Filesystem for document I/O.
    pub fs: Box<dyn FileSystem>,
    /// ID generator for task and memory entry IDs.
    pub id_gen: Box<dyn IdGenerator>,
}

impl ServiceContext {
    /// Creates a live context: system clock, real disk, random UUIDs.
    #[must_use]
    pub fn live() -> Self {
        Self {
            clock: Box::new(LiveClock),
            fs: Box::new(LiveFileSystem),
            id_gen: Box::new(LiveIdGenerator),
        }
    }

    /// Creates a context that never touches disk.
    ///
    /// Uses the system clock and random UUIDs with a map-backed filesystem.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            clock: Box::new(LiveClock),
            fs: Box::new(MemoryFileSystem::new()),
            id_gen: Box::new(LiveIdGenerator),
        }
    }

    /// Creates a fully deterministic in-memory context.
    ///
    /// Time stands still at `now` and IDs count up from
    /// `00000000-0000-4000-8000-000000000001`.
    #[must_use]
    pub fn deterministic(now: chrono::DateTime<chrono::Utc>) -> Self {
        Self {
            clock: Box::new(FixedClock::new(now)),
            fs: Box::new(MemoryFileSystem::new()),
            id_gen: Box::new(SequenceIdGenerator::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use std::path::Path;

    #[tokio::test]
    async fn in_memory_context_does_not_touch_disk() {
        let ctx = ServiceContext::in_memory();
        let path = Path::new("/definitely/not/on/disk/tasks.json");
        ctx.fs.write(path, "{}").await.unwrap();

        assert_eq!(ctx.fs.read_to_string(path).await.unwrap(), "{}");
        assert!(!path.exists());
    }

    #[test]
    fn deterministic_context_pins_clock_and_ids() {
        let now = Utc.with_ymd_and_hms(2024, 6, 15, 10, 30, 0).unwrap();
        let ctx = ServiceContext::deterministic(now);

        assert_eq!(ctx.clock.now(), now);
        let first = ctx.id_gen.generate_id();
        let second = ctx.id_gen.generate_id();
        assert_eq!(first, "00000000-0000-4000-8000-000000000001");
        assert_eq!(second, "00000000-0000-4000-8000-000000000002");
    }
}
