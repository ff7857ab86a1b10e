//! `taskmind execute` command.

use serde_json::json;

use super::complexity;
use crate::memory::{record_tool_result, MemoryStore};
use crate::task::{Task, TaskStatus, TaskStore};

/// Execute the `execute` command.
///
/// Starts a task whose dependencies are all completed, prints its
/// complexity assessment and records the start in execution memory.
///
/// # Errors
///
/// Returns an error string if the task does not exist, is completed, is
/// blocked by unfinished dependencies, or the store cannot be read or
/// written.
pub async fn run(store: &TaskStore<'_>, memory: &MemoryStore<'_>, id: &str) -> Result<(), String> {
    let task = store
        .get(id)
        .await
        .map_err(|err| err.to_string())?
        .ok_or_else(|| format!("Task not found: {id}"))?;
    if task.is_completed() {
        return Err(format!(
            "Task \"{}\" (ID: {id}) is already completed; delete and recreate it to run it again",
            task.name
        ));
    }
    if task.status == TaskStatus::InProgress {
        println!("Task \"{}\" (ID: {id}) is already in progress.", task.name);
        return Ok(());
    }
    ensure_executable(store, &task).await?;

    let started = store
        .update_status(id, TaskStatus::InProgress)
        .await
        .map_err(|err| err.to_string())?
        .ok_or_else(|| format!("Task not found: {id}"))?;
    let assessment = store
        .assess_complexity(id)
        .await
        .map_err(|err| err.to_string())?
        .ok_or_else(|| format!("Task not found: {id}"))?;

    let markdown = format!("Started task \"{}\" (ID: {id}).", started.name);
    println!("{markdown}\n");
    print!("{}", complexity::render(&assessment));

    let result = json!({
        "kind": "taskManager.execute",
        "payload": {
            "markdown": markdown,
            "taskId": id,
            "statusAfter": started.status,
        }
    });
    record_tool_result(memory, "execute_task", &result).await;
    Ok(())
}

/// Fails unless every dependency of `task` is completed.
///
/// # Errors
///
/// Returns an error string naming the blocking dependency IDs, or if the
/// store cannot be read.
pub async fn ensure_executable(store: &TaskStore<'_>, task: &Task) -> Result<(), String> {
    let check = store
        .can_execute(&task.id)
        .await
        .map_err(|err| err.to_string())?;
    if check.can_execute {
        return Ok(());
    }
    let reason = match check.blocked_by {
        Some(ids) if !ids.is_empty() => {
            format!("blocked by unfinished dependencies: {}", ids.join(", "))
        }
        _ => "the blocking reason could not be determined".to_string(),
    };
    Err(format!(
        "Task \"{}\" (ID: {}) cannot execute yet; {reason}",
        task.name, task.id
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ServiceContext;
    use crate::memory::{ListOptions, Scope};
    use crate::task::NewTask;
    use chrono::{TimeZone, Utc};
    use std::path::Path;

    fn ctx() -> ServiceContext {
        ServiceContext::deterministic(Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap())
    }

    fn named(name: &str, dependencies: Vec<String>) -> NewTask {
        NewTask {
            name: name.into(),
            dependencies,
            ..NewTask::default()
        }
    }

    #[tokio::test]
    async fn blocked_task_is_not_started() {
        let ctx = ctx();
        let store = TaskStore::new(&ctx, Path::new("/data"));
        let memory = MemoryStore::new(&ctx, Path::new("/data/memory"), 5);
        let a = store.create(named("A", Vec::new())).await.unwrap();
        let b = store.create(named("B", vec![a.id.clone()])).await.unwrap();

        let err = run(&store, &memory, &b.id).await.unwrap_err();
        assert!(err.contains(&a.id));
        assert_eq!(
            store.get(&b.id).await.unwrap().unwrap().status,
            TaskStatus::Pending
        );
    }

    #[tokio::test]
    async fn ready_task_moves_to_in_progress_and_is_remembered() {
        let ctx = ctx();
        let store = TaskStore::new(&ctx, Path::new("/data"));
        let memory = MemoryStore::new(&ctx, Path::new("/data/memory"), 5);
        let a = store.create(named("A", Vec::new())).await.unwrap();
        store
            .update_status(&a.id, TaskStatus::Completed)
            .await
            .unwrap();
        let b = store.create(named("B", vec![a.id.clone()])).await.unwrap();

        run(&store, &memory, &b.id).await.unwrap();

        assert_eq!(
            store.get(&b.id).await.unwrap().unwrap().status,
            TaskStatus::InProgress
        );
        let entries = memory
            .list_recent(&ListOptions {
                scope: Scope::ShortTerm,
                ..ListOptions::default()
            })
            .await
            .unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].task_id.as_deref(), Some(b.id.as_str()));
        assert!(entries[0].tags.contains(&"status:in_progress".to_string()));

        run(&store, &memory, &b.id).await.unwrap();
        assert!(run(&store, &memory, &a.id).await.is_err());
        assert!(run(&store, &memory, "missing").await.is_err());
    }
}
