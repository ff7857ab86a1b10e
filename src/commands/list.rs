//! `taskmind list` command.

use std::fmt::Write as _;

use crate::task::{Task, TaskStatus, TaskStore};

/// Execute the `list` command.
///
/// # Errors
///
/// Returns an error string if the task collection cannot be read.
pub async fn run(store: &TaskStore<'_>, status: Option<TaskStatus>) -> Result<(), String> {
    let tasks: Vec<Task> = store
        .all()
        .await
        .map_err(|err| err.to_string())?
        .into_iter()
        .filter(|t| status.is_none_or(|s| t.status == s))
        .collect();
    print!("{}", render(&tasks));
    Ok(())
}

/// Renders tasks as an aligned table.
#[must_use]
pub fn render(tasks: &[Task]) -> String {
    if tasks.is_empty() {
        return "No tasks found.\n".to_string();
    }

    let id_width = tasks.iter().map(|t| t.id.len()).max().unwrap_or(2).max(2);
    let status_width = tasks
        .iter()
        .map(|t| t.status.as_str().len())
        .max()
        .unwrap_or(6)
        .max(6);

    let mut out = format!("{:<id_width$}  {:<status_width$}  NAME\n", "ID", "STATUS");
    let _ = writeln!(out, "{:-<id_width$}  {:-<status_width$}  ----", "", "");
    for task in tasks {
        let _ = writeln!(
            out,
            "{:<id_width$}  {:<status_width$}  {}",
            task.id,
            task.status.as_str(),
            task.name
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ServiceContext;
    use crate::task::NewTask;
    use chrono::{TimeZone, Utc};
    use std::path::Path;

    #[test]
    fn empty_list() {
        assert_eq!(render(&[]), "No tasks found.\n");
    }

    #[tokio::test]
    async fn table_has_header_and_rows() {
        let ctx = ServiceContext::deterministic(Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap());
        let store = TaskStore::new(&ctx, Path::new("/data"));
        let new_task = NewTask {
            name: "Write docs".into(),
            ..NewTask::default()
        };
        let task = store.create(new_task).await.unwrap();

        let table = render(&store.all().await.unwrap());
        let lines: Vec<&str> = table.lines().collect();
        assert!(lines[0].starts_with("ID"));
        assert!(lines[0].ends_with("NAME"));
        assert!(lines[2].starts_with(&task.id));
        assert!(lines[2].contains("pending"));
        assert!(lines[2].ends_with("Write docs"));
    }
}
