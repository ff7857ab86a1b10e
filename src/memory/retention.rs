//! Short-term retention policy and entry ordering.

use std::collections::HashMap;

use super::model::{Importance, MemoryEntry};

/// Sorts entries newest first. Equal timestamps keep their relative order.
pub fn sort_newest_first(entries: &mut [MemoryEntry]) {
    entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

/// Collapses entries sharing an ID. The survivor sits where the ID first
/// appeared and carries the last value seen for it.
#[must_use]
pub fn dedupe_by_id(entries: Vec<MemoryEntry>) -> Vec<MemoryEntry> {
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut out: Vec<MemoryEntry> = Vec::with_capacity(entries.len());
    for entry in entries {
        match positions.get(&entry.id) {
            Some(&index) => out[index] = entry,
            None => {
                positions.insert(entry.id.clone(), out.len());
                out.push(entry);
            }
        }
    }
    out
}

/// Bounds a short-term entry set to `limit`.
///
/// The `limit` newest entries are kept. Each older high-importance entry
/// then replaces the first normal entry still in the kept set, if any; an
/// older entry with no normal entry left to replace is dropped. Because of
/// that swap an old high entry can displace a newer normal one.
///
/// Sets already within the limit are returned untouched.
#[must_use]
pub fn apply_short_term_limit(entries: Vec<MemoryEntry>, limit: usize) -> Vec<MemoryEntry> {
    if entries.len() <= limit {
        return entries;
    }

    let mut sorted = entries;
    sort_newest_first(&mut sorted);

    let mut retained: Vec<MemoryEntry> = Vec::with_capacity(limit);
    for entry in sorted {
        if retained.len() < limit {
            retained.push(entry);
            continue;
        }
        if entry.importance == Importance::High {
            let first_normal = retained
                .iter()
                .position(|e| e.importance == Importance::Normal);
            if let Some(index) = first_normal {
                retained.remove(index);
                retained.push(entry);
            }
        }
    }

    sort_newest_first(&mut retained);
    retained
}
