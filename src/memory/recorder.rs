//! Turns structured tool results into memory entries.
//!
//! A tool result looks like `{ "kind": "taskManager.<what>", "payload": {...} }`.
//! Only planning, analysis, reflection, execution, verification and thought
//! results are remembered; everything else is ignored.

use serde_json::{json, Map, Value};
use tracing::warn;

use super::model::{Importance, MemoryEntry, MemoryEntryInput};
use super::store::{AppendOptions, MemoryStore};

/// Longest summary kept, in characters, including the trailing ellipsis.
pub const MAX_SUMMARY_CHARS: usize = 600;

/// Derives a memory input from a structured tool result.
///
/// Returns `None` for unknown kinds, a missing payload, or an empty summary.
#[must_use]
pub fn derive_entry(tool_name: &str, structured: &Value) -> Option<MemoryEntryInput> {
    let kind = structured
        .get("kind")
        .and_then(Value::as_str)
        .unwrap_or_default();
    let payload = structured.get("payload").and_then(Value::as_object)?;

    let text = |key: &str| payload.get(key).and_then(Value::as_str);
    let markdown = text("markdown").unwrap_or_default();
    let payload_summary = text("summary").unwrap_or_default();
    let first_non_empty = |a: &str, b: &str| {
        if a.is_empty() {
            b.to_string()
        } else {
            a.to_string()
        }
    };

    let mut importance = Importance::Normal;
    let (summary, mut tags) = match kind {
        "taskManager.plan" => {
            importance = Importance::High;
            let summary = first_non_empty(markdown, payload_summary);
            (summary, vec!["planning".to_string()])
        }
        "taskManager.analyze" => {
            importance = Importance::High;
            let summary = first_non_empty(payload_summary, markdown);
            (summary, vec!["analysis".to_string()])
        }
        "taskManager.reflect" => {
            importance = Importance::High;
            let summary = first_non_empty(payload_summary, markdown);
            (summary, vec!["retro".to_string()])
        }
        "taskManager.execute" => {
            let mut tags = vec!["execution".to_string()];
            if let Some(status) = text("statusAfter") {
                tags.push(format!("status:{status}"));
            }
            (markdown.to_string(), tags)
        }
        "taskManager.verify" => {
            importance = Importance::High;
            let summary = match payload.get("score").and_then(Value::as_f64) {
                Some(score) if markdown.is_empty() => format!("Verification score {score}"),
                _ => markdown.to_string(),
            };
            (summary, vec!["verification".to_string()])
        }
        "taskManager.thought" => {
            let mut tags = vec!["thought".to_string()];
            tags.extend(string_tags(payload).map(|tag| format!("tag:{tag}")));
            if let Some(stage) = text("stage") {
                tags.push(format!("stage:{stage}"));
            }
            (markdown.to_string(), tags)
        }
        _ => return None,
    };

    let summary = truncate_summary(&summary);
    if summary.is_empty() {
        return None;
    }
    let task_id = text("taskId").map(String::from);
    tags.retain(|tag| !tag.trim().is_empty());

    Some(MemoryEntryInput {
        summary,
        tool_name: tool_name.to_string(),
        task_id,
        tags,
        importance: Some(importance),
        created_at: None,
        metadata: Some(json!({ "kind": kind, "tool": tool_name })),
    })
}

fn string_tags(payload: &Map<String, Value>) -> impl Iterator<Item = &str> {
    payload
        .get("tags")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(Value::as_str)
}

fn truncate_summary(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.chars().count() <= MAX_SUMMARY_CHARS {
        return trimmed.to_string();
    }
    let mut out: String = trimmed.chars().take(MAX_SUMMARY_CHARS - 1).collect();
    out.push('…');
    out
}

/// Records a tool result in short-term memory, promoting high-importance
/// results to long-term.
///
/// Failures are logged and swallowed; recording never interrupts the caller.
/// Returns the stored entry, if one was written.
pub async fn record_tool_result(
    store: &MemoryStore<'_>,
    tool_name: &str,
    structured: &Value,
) -> Option<MemoryEntry> {
    let input = derive_entry(tool_name, structured)?;
    let promote = input.importance == Some(Importance::High);
    let options = AppendOptions {
        promote: Some(promote),
        ..AppendOptions::default()
    };
    match store.append(input, options).await {
        Ok(entry) => Some(entry),
        Err(err) => {
            warn!(tool = tool_name, error = %err, "failed to record tool result in memory");
            None
        }
    }
}
