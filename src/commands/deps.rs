//! `taskmind deps` command.

use crate::task::TaskStore;

/// Execute the `deps` command.
///
/// Prints whether the task can start and, if not, which dependencies
/// block it.
///
/// # Errors
///
/// Returns an error string if the task does not exist or cannot be read.
pub async fn run(store: &TaskStore<'_>, id: &str) -> Result<(), String> {
    let tasks = store.all().await.map_err(|err| err.to_string())?;
    let Some(task) = tasks.iter().find(|t| t.id == id) else {
        return Err(format!("Task not found: {id}"));
    };
    if task.is_completed() {
        println!("Task \"{}\" is already completed.", task.name);
        return Ok(());
    }

    let check = store.can_execute(id).await.map_err(|err| err.to_string())?;
    if check.can_execute {
        println!(
            "Task \"{}\" can execute: all dependencies are completed.",
            task.name
        );
        return Ok(());
    }

    println!("Task \"{}\" is blocked by:", task.name);
    for blocker in check.blocked_by.unwrap_or_default() {
        match tasks.iter().find(|t| t.id == blocker) {
            Some(dep) => println!("  - {blocker} \"{}\" ({})", dep.name, dep.status),
            None => println!("  - {blocker} (missing)"),
        }
    }
    Ok(())
}
