//! `taskmind verify` command.

use serde_json::json;

use crate::memory::{record_tool_result, MemoryStore};
use crate::task::{TaskStatus, TaskStore};

/// Lowest score that completes a task.
pub const PASSING_SCORE: u8 = 80;

/// Execute the `verify` command.
///
/// Only in-progress tasks can be verified. A score of at least
/// [`PASSING_SCORE`] records `summary` as the completion summary and
/// completes the task; a lower score leaves it in progress, with `summary`
/// describing what is still missing. Either way the verdict is recorded in
/// execution memory.
///
/// # Errors
///
/// Returns an error string if the task does not exist, is not in progress,
/// or the store cannot be read or written.
pub async fn run(
    store: &TaskStore<'_>,
    memory: &MemoryStore<'_>,
    id: &str,
    score: u8,
    summary: &str,
) -> Result<(), String> {
    let task = store
        .get(id)
        .await
        .map_err(|err| err.to_string())?
        .ok_or_else(|| format!("Task not found: {id}"))?;
    if task.status != TaskStatus::InProgress {
        return Err(format!(
            "Task \"{}\" (ID: {id}) is {}; only in-progress tasks can be verified",
            task.name, task.status
        ));
    }

    let (status_after, markdown) = if score >= PASSING_SCORE {
        store
            .update_summary(id, summary)
            .await
            .map_err(|err| err.to_string())?
            .ok_or_else(|| format!("Task not found: {id}"))?;
        let done = store
            .update_status(id, TaskStatus::Completed)
            .await
            .map_err(|err| err.to_string())?
            .ok_or_else(|| format!("Task not found: {id}"))?;
        let markdown = format!(
            "Task \"{}\" passed verification with score {score} and is completed.\n\n{summary}",
            done.name
        );
        (done.status, markdown)
    } else {
        let markdown = format!(
            "Task \"{}\" scored {score} and stays in progress.\n\n{summary}",
            task.name
        );
        (task.status, markdown)
    };
    println!("{markdown}");

    let result = json!({
        "kind": "taskManager.verify",
        "payload": {
            "markdown": markdown,
            "taskId": id,
            "score": score,
            "statusAfter": status_after,
            "statusChanged": status_after != task.status,
        }
    });
    record_tool_result(memory, "verify_task", &result).await;
    Ok(())
}
