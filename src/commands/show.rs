//! `taskmind show` command.

use std::fmt::Write as _;

use crate::task::{Task, TaskStore};
use crate::timestamp;

/// Execute the `show` command.
///
/// # Errors
///
/// Returns an error string if the task does not exist or cannot be read.
pub async fn run(store: &TaskStore<'_>, id: &str) -> Result<(), String> {
    let task = store
        .get(id)
        .await
        .map_err(|err| err.to_string())?
        .ok_or_else(|| format!("Task not found: {id}"))?;
    print!("{}", render(&task));
    Ok(())
}

/// Renders every populated field of a task.
#[must_use]
pub fn render(task: &Task) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Task: {}", task.name);
    let _ = writeln!(out, "ID: {}", task.id);
    let _ = writeln!(out, "Status: {}", task.status);
    let _ = writeln!(out, "Created: {}", timestamp::format(&task.created_at));
    let _ = writeln!(out, "Updated: {}", timestamp::format(&task.updated_at));
    if let Some(done) = &task.completed_at {
        let _ = writeln!(out, "Completed: {}", timestamp::format(done));
    }
    if let Some(agent) = &task.agent {
        let _ = writeln!(out, "Agent: {agent}");
    }

    let _ = writeln!(out, "\nDescription:\n{}", task.description);
    if let Some(notes) = &task.notes {
        let _ = writeln!(out, "\nNotes:\n{notes}");
    }

    if !task.dependencies.is_empty() {
        let _ = writeln!(out, "\nDependencies:");
        for dep in &task.dependencies {
            let _ = writeln!(out, "  - {}", dep.task_id);
        }
    }

    if let Some(files) = task.related_files.as_deref().filter(|f| !f.is_empty()) {
        let _ = writeln!(out, "\nRelated files:");
        for file in files {
            let lines = match (file.line_start, file.line_end) {
                (Some(start), Some(end)) => format!(" (lines {start}-{end})"),
                (Some(start), None) => format!(" (from line {start})"),
                _ => String::new(),
            };
            let _ = write!(out, "  - [{:?}] {}{lines}", file.file_type, file.path);
            match &file.description {
                Some(desc) => {
                    let _ = writeln!(out, ": {desc}");
                }
                None => out.push('\n'),
            }
        }
    }

    for (label, value) in [
        ("Implementation guide", &task.implementation_guide),
        ("Verification criteria", &task.verification_criteria),
        ("Analysis", &task.analysis_result),
        ("Summary", &task.summary),
    ] {
        if let Some(text) = value {
            let _ = writeln!(out, "\n{label}:\n{text}");
        }
    }
    out
}
