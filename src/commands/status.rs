//! `taskmind status` command.

use super::execute::ensure_executable;
use crate::task::{TaskStatus, TaskStore};

/// Execute the `status` command.
///
/// Moves the task to `status` and, when given, records `summary`. A task
/// only moves to `in_progress` or `completed` once all of its dependencies
/// are completed. A completed task only accepts a new summary.
///
/// # Errors
///
/// Returns an error string if the task does not exist, is blocked by
/// unfinished dependencies, refuses the change, or the store cannot be read
/// or written.
pub async fn run(
    store: &TaskStore<'_>,
    id: &str,
    status: TaskStatus,
    summary: Option<&str>,
) -> Result<(), String> {
    let current = store
        .get(id)
        .await
        .map_err(|err| err.to_string())?
        .ok_or_else(|| format!("Task not found: {id}"))?;

    let task = if current.is_completed() && status == TaskStatus::Completed {
        current
    } else {
        if !current.is_completed()
            && matches!(status, TaskStatus::InProgress | TaskStatus::Completed)
        {
            ensure_executable(store, &current).await?;
        }
        store
            .update_status(id, status)
            .await
            .map_err(|err| err.to_string())?
            .ok_or_else(|| format!("Completed task \"{}\" cannot change status", current.name))?
    };

    let task = match summary {
        Some(text) => store
            .update_summary(id, text)
            .await
            .map_err(|err| err.to_string())?
            .ok_or_else(|| format!("Task not found: {id}"))?,
        None => task,
    };

    println!("Task \"{}\" is now {}.", task.name, task.status);
    Ok(())
}
