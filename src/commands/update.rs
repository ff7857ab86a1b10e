//! `taskmind update` command.

use crate::task::{TaskContentUpdate, TaskStore};

/// Execute the `update` command.
///
/// Edits the content of a task that is not yet completed. Fields left out
/// of `update` keep their stored values.
///
/// # Errors
///
/// Returns an error string if the task does not exist, is completed, or the
/// store cannot be read or written.
pub async fn run(store: &TaskStore<'_>, id: &str, update: TaskContentUpdate) -> Result<(), String> {
    let outcome = store
        .update_content(id, update)
        .await
        .map_err(|err| err.to_string())?;
    if !outcome.success {
        return Err(format!("{} (ID: {id})", outcome.message));
    }
    match outcome.task {
        Some(task) => println!("{}: \"{}\" (ID: {id})", outcome.message, task.name),
        None => println!("{}", outcome.message),
    }
    Ok(())
}
