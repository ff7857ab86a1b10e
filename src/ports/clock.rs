//! Clock port for obtaining the current time.

use chrono::{DateTime, Utc};

/// Provides the current time.
///
/// Every store timestamp (`createdAt`, `updatedAt`, `completedAt`, memory
/// entry times, backup file names) is taken from this port so tests can pin
/// or step the clock.
pub trait Clock: Send + Sync {
    /// Returns the current UTC time.
    fn now(&self) -> DateTime<Utc>;
}
