//! `taskmind import` command.

use std::path::Path;

use crate::context::ServiceContext;
use crate::task::{TaskInput, TaskStore, UpdateMode};

/// Execute the `import` command.
///
/// Reads a JSON array of task inputs and merges it into the store.
///
/// # Errors
///
/// Returns an error string if the file cannot be read or parsed, or the
/// store cannot be written.
pub async fn run(
    ctx: &ServiceContext,
    store: &TaskStore<'_>,
    file: &Path,
    mode: UpdateMode,
    analysis: Option<&str>,
) -> Result<(), String> {
    let raw = ctx
        .fs
        .read_to_string(file)
        .await
        .map_err(|err| format!("failed to read {}: {err}", file.display()))?;
    let inputs: Vec<TaskInput> = serde_json::from_str(&raw)
        .map_err(|err| format!("failed to parse {}: {err}", file.display()))?;

    let affected = store
        .batch_create_or_update(&inputs, mode, analysis)
        .await
        .map_err(|err| err.to_string())?;

    println!("Imported {} task(s):", affected.len());
    for task in &affected {
        println!("  {}  {}", task.id, task.name);
    }
    Ok(())
}
