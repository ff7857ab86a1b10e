//! `taskmind memory` commands.

use std::fmt::Write as _;

use crate::memory::{ListOptions, MemoryEntry, MemoryStore, PruneOptions};
use crate::timestamp;

/// Execute `memory list`.
///
/// # Errors
///
/// Returns an error string if the scope file cannot be read.
pub async fn list(store: &MemoryStore<'_>, options: &ListOptions) -> Result<(), String> {
    let entries = store
        .list_recent(options)
        .await
        .map_err(|err| err.to_string())?;
    print!("{}", render(&entries));
    Ok(())
}

/// Execute `memory prune`.
///
/// # Errors
///
/// Returns an error string if short-term memory cannot be read or written.
pub async fn prune(store: &MemoryStore<'_>, max: Option<usize>) -> Result<(), String> {
    let options = PruneOptions {
        max_short_term: max,
    };
    store.prune(options).await.map_err(|err| err.to_string())?;
    println!("Short-term memory pruned.");
    Ok(())
}

/// Renders entries newest first, one block each.
#[must_use]
pub fn render(entries: &[MemoryEntry]) -> String {
    if entries.is_empty() {
        return "No matching memory entries.\n".to_string();
    }
    let mut out = String::new();
    for (i, entry) in entries.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let _ = writeln!(
            out,
            "### {}. {} · {}",
            i + 1,
            entry.tool_name,
            timestamp::format(&entry.created_at)
        );
        if let Some(task_id) = &entry.task_id {
            let _ = writeln!(out, "Task: {task_id}");
        }
        if !entry.tags.is_empty() {
            let _ = writeln!(out, "Tags: {}", entry.tags.join(", "));
        }
        let _ = writeln!(out, "Importance: {}", entry.importance);
        let _ = writeln!(out, "\n{}", entry.summary);
    }
    out
}
