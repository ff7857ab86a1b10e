//! Memory entries: timestamped records of what an agent did.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::timestamp;

/// How much an entry matters for retention and promotion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Importance {
    /// Evicted first.
    Normal,
    /// Survives eviction where possible; promoted to long-term by default.
    High,
}

impl Importance {
    /// Wire spelling, as stored in entry files.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::High => "high",
        }
    }
}

impl fmt::Display for Importance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Memory partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Scope {
    /// Bounded by the short-term limit.
    #[default]
    ShortTerm,
    /// Unbounded promotion target.
    LongTerm,
}

impl Scope {
    /// Directory name under the memory base directory.
    #[must_use]
    pub fn dir_name(self) -> &'static str {
        match self {
            Self::ShortTerm => "short-term",
            Self::LongTerm => "long-term",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// A stored memory record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryEntry {
    /// Unique identifier.
    pub id: String,
    /// When the event happened.
    #[serde(
        serialize_with = "timestamp::serialize",
        deserialize_with = "timestamp::deserialize"
    )]
    pub created_at: DateTime<Utc>,
    /// Retention priority.
    pub importance: Importance,
    /// Trimmed summary text.
    pub summary: String,
    /// Weak reference to a task; never checked against the task store.
    #[serde(default)]
    pub task_id: Option<String>,
    /// Tool that produced the entry.
    pub tool_name: String,
    /// De-duplicated tags in first-seen order.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Arbitrary JSON payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

/// Caller-supplied fields for [`MemoryStore::append`](super::MemoryStore::append).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryEntryInput {
    /// Summary; trimmed on append.
    pub summary: String,
    /// Tool that produced the entry.
    pub tool_name: String,
    /// Related task.
    pub task_id: Option<String>,
    /// Tags; empty strings are dropped and duplicates removed.
    pub tags: Vec<String>,
    /// Explicit importance. When absent, `high` iff a tag starts with `milestone`.
    pub importance: Option<Importance>,
    /// Explicit timestamp. Defaults to the clock's now.
    pub created_at: Option<DateTime<Utc>>,
    /// Arbitrary JSON payload.
    pub metadata: Option<serde_json::Value>,
}

impl MemoryEntryInput {
    /// Creates an input with a summary and tool name.
    #[must_use]
    pub fn new(tool_name: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
            tool_name: tool_name.into(),
            ..Self::default()
        }
    }

    /// Attaches `value` as metadata, or drops the metadata when it cannot be
    /// represented as JSON.
    #[must_use]
    pub fn with_metadata<T: Serialize + ?Sized>(mut self, value: &T) -> Self {
        self.metadata = match serde_json::to_value(value) {
            Ok(json) => Some(json),
            Err(err) => {
                debug!(error = %err, "dropping unserializable memory metadata");
                None
            }
        };
        self
    }

    /// Tags with empty strings removed and duplicates collapsed, first occurrence wins.
    #[must_use]
    pub fn normalized_tags(&self) -> Vec<String> {
        let mut tags: Vec<String> = Vec::with_capacity(self.tags.len());
        for tag in &self.tags {
            if !tag.is_empty() && !tags.contains(tag) {
                tags.push(tag.clone());
            }
        }
        tags
    }

    /// Importance after applying the `milestone` tag rule.
    #[must_use]
    pub fn resolved_importance(&self) -> Importance {
        self.importance.unwrap_or_else(|| {
            if self.tags.iter().any(|t| t.starts_with("milestone")) {
                Importance::High
            } else {
                Importance::Normal
            }
        })
    }
}
