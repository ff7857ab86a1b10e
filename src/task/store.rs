//! Task store: persistence and lifecycle rules for the task collection.
//!
//! Layout under the data directory:
//!
//! ```text
//! <data_dir>/
//!   ├── tasks.json                         { "tasks": [...] }
//!   └── memory/
//!         └── tasks_memory_<timestamp>.json   backups written by clear_all
//! ```

use std::path::{Path, PathBuf};

use chrono::Local;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::batch;
use super::complexity::{self, ComplexityAssessment};
use super::model::{
    NewTask, RelatedFile, Task, TaskContentUpdate, TaskDependency, TaskDocument, TaskInput,
    TaskPatch, TaskStatus, UpdateMode,
};
use super::search::{self, SearchOptions, SearchPage};
use crate::context::ServiceContext;
use crate::error::{StoreError, StoreResult};
use crate::store::JsonDocument;
use crate::timestamp;

/// File name of the live task collection.
pub const TASKS_FILE: &str = "tasks.json";
/// Directory (under the data dir) that receives backups.
pub const MEMORY_DIR: &str = "memory";
const BACKUP_PREFIX: &str = "tasks_memory_";
const MAX_BACKUPS_SEARCHED: usize = 10;
const REQUIRED_TIMESTAMPS: &[&str] = &["createdAt", "updatedAt"];

/// Whether a task may start now.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionCheck {
    /// `true` when every dependency is completed.
    pub can_execute: bool,
    /// Dependency IDs that are missing or not completed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocked_by: Option<Vec<String>>,
}

/// Result of a guarded delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeleteOutcome {
    /// Whether the task was removed.
    pub success: bool,
    /// Human-readable explanation.
    pub message: String,
}

impl DeleteOutcome {
    fn refused(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Result of a content edit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpdateOutcome {
    /// Whether the edit was applied (or there was nothing to apply).
    pub success: bool,
    /// Human-readable explanation.
    pub message: String,
    /// The task after the edit, when it exists and is editable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task: Option<Task>,
}

impl ExecutionCheck {
    fn refused(blocked_by: Option<Vec<String>>) -> Self {
        Self {
            can_execute: false,
            blocked_by,
        }
    }
}

impl UpdateOutcome {
    fn failed(message: &str) -> Self {
        Self {
            success: false,
            message: message.to_string(),
            task: None,
        }
    }
}

/// Result of clearing the whole collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClearOutcome {
    /// Always `true` when no I/O error occurred.
    pub success: bool,
    /// Human-readable explanation.
    pub message: String,
    /// File name of the backup, when one was written.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backup_file: Option<String>,
}

/// Persistence layer for tasks.
///
/// Every mutating call reads the whole collection, changes it and writes it
/// back while holding the store's write lock, so concurrent callers sharing
/// one store never lose each other's updates. Separate processes (or
/// separate store instances on the same directory) are not coordinated.
pub struct TaskStore<'a> {
    ctx: &'a ServiceContext,
    tasks_file: PathBuf,
    memory_dir: PathBuf,
    write_lock: Mutex<()>,
}

impl<'a> TaskStore<'a> {
    /// Creates a store over `<data_dir>/tasks.json`.
    #[must_use]
    pub fn new(ctx: &'a ServiceContext, data_dir: &Path) -> Self {
        Self {
            ctx,
            tasks_file: data_dir.join(TASKS_FILE),
            memory_dir: data_dir.join(MEMORY_DIR),
            write_lock: Mutex::new(()),
        }
    }

    /// Directory that receives backups from [`clear_all`](Self::clear_all).
    #[must_use]
    pub fn memory_dir(&self) -> &Path {
        &self.memory_dir
    }

    /// Loads a `{ "tasks": [...] }` document, stamping missing or unreadable
    /// creation and update times with the clock's now.
    async fn load_document(&self, path: &Path) -> StoreResult<Option<TaskDocument>> {
        let raw: Option<Value> = JsonDocument::new(self.ctx.fs.as_ref(), path).load().await?;
        let Some(mut raw) = raw else {
            return Ok(None);
        };
        if let Some(tasks) = raw.get_mut("tasks").and_then(Value::as_array_mut) {
            let now = self.ctx.clock.now();
            for task in tasks {
                timestamp::fill_missing(task, REQUIRED_TIMESTAMPS, &now);
            }
        }
        serde_json::from_value(raw)
            .map(Some)
            .map_err(|source| StoreError::Parse {
                path: path.to_path_buf(),
                source,
            })
    }

    async fn read_tasks(&self) -> StoreResult<Vec<Task>> {
        let doc = self.load_document(&self.tasks_file).await?;
        Ok(doc.map(|d| d.tasks).unwrap_or_default())
    }

    async fn write_tasks(&self, tasks: Vec<Task>) -> StoreResult<()> {
        debug!(count = tasks.len(), "writing task collection");
        JsonDocument::new(self.ctx.fs.as_ref(), &self.tasks_file)
            .save(&TaskDocument { tasks })
            .await
    }

    /// Returns every stored task in stored order.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be read or parsed.
    pub async fn all(&self) -> StoreResult<Vec<Task>> {
        self.read_tasks().await
    }

    /// Looks up a task by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be read or parsed.
    pub async fn get(&self, task_id: &str) -> StoreResult<Option<Task>> {
        let tasks = self.read_tasks().await?;
        Ok(tasks.into_iter().find(|t| t.id == task_id))
    }

    /// Creates a pending task.
    ///
    /// Dependency IDs are stored as given; nothing checks that they exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be read or written.
    pub async fn create(&self, new: NewTask) -> StoreResult<Task> {
        let _guard = self.write_lock.lock().await;
        let mut tasks = self.read_tasks().await?;
        let now = self.ctx.clock.now();
        let task = Task {
            id: self.ctx.id_gen.generate_id(),
            name: new.name,
            description: new.description,
            notes: new.notes,
            status: TaskStatus::Pending,
            dependencies: new
                .dependencies
                .into_iter()
                .map(TaskDependency::from)
                .collect(),
            created_at: now,
            updated_at: now,
            completed_at: None,
            summary: None,
            related_files: new.related_files,
            analysis_result: None,
            agent: new.agent,
            implementation_guide: None,
            verification_criteria: None,
        };
        tasks.push(task.clone());
        self.write_tasks(tasks).await?;
        debug!(task_id = %task.id, name = %task.name, "task created");
        Ok(task)
    }

    /// Applies a partial update.
    ///
    /// Returns `None` when the task does not exist, or when it is completed
    /// and the patch carries anything besides `summary` / `related_files`.
    /// A rejected patch changes nothing.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be read or written.
    pub async fn update(&self, task_id: &str, patch: TaskPatch) -> StoreResult<Option<Task>> {
        let _guard = self.write_lock.lock().await;
        let mut tasks = self.read_tasks().await?;
        let Some(task) = tasks.iter_mut().find(|t| t.id == task_id) else {
            return Ok(None);
        };
        if task.is_completed() && !patch.allowed_after_completion() {
            debug!(task_id, "rejecting update to completed task");
            return Ok(None);
        }
        patch.apply_to(task);
        task.updated_at = self.ctx.clock.now();
        let updated = task.clone();
        self.write_tasks(tasks).await?;
        Ok(Some(updated))
    }

    /// Moves a task to `status`, stamping `completed_at` on completion.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be read or written.
    pub async fn update_status(
        &self,
        task_id: &str,
        status: TaskStatus,
    ) -> StoreResult<Option<Task>> {
        let completed_at = (status == TaskStatus::Completed).then(|| self.ctx.clock.now());
        let patch = TaskPatch {
            status: Some(status),
            completed_at,
            ..TaskPatch::default()
        };
        self.update(task_id, patch).await
    }

    /// Sets the completion summary. Allowed on completed tasks.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be read or written.
    pub async fn update_summary(&self, task_id: &str, summary: &str) -> StoreResult<Option<Task>> {
        let patch = TaskPatch {
            summary: Some(summary.to_string()),
            ..TaskPatch::default()
        };
        self.update(task_id, patch).await
    }

    /// Edits the content of a task that is not yet completed.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be read or written.
    pub async fn update_content(
        &self,
        task_id: &str,
        update: TaskContentUpdate,
    ) -> StoreResult<UpdateOutcome> {
        let Some(task) = self.get(task_id).await? else {
            return Ok(UpdateOutcome::failed("Task not found"));
        };
        if task.is_completed() {
            return Ok(UpdateOutcome::failed("Cannot update a completed task"));
        }
        let patch = TaskPatch::from(update);
        if patch.is_empty() {
            return Ok(UpdateOutcome {
                success: true,
                message: "No content provided to update".to_string(),
                task: Some(task),
            });
        }
        Ok(match self.update(task_id, patch).await? {
            Some(task) => UpdateOutcome {
                success: true,
                message: "Task content updated".to_string(),
                task: Some(task),
            },
            None => UpdateOutcome::failed("Task could not be updated"),
        })
    }

    /// Replaces the related files of a task that is not yet completed.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be read or written.
    pub async fn update_related_files(
        &self,
        task_id: &str,
        files: Vec<RelatedFile>,
    ) -> StoreResult<UpdateOutcome> {
        let Some(task) = self.get(task_id).await? else {
            return Ok(UpdateOutcome::failed("Task not found"));
        };
        if task.is_completed() {
            return Ok(UpdateOutcome::failed("Cannot update a completed task"));
        }
        let count = files.len();
        let patch = TaskPatch {
            related_files: Some(files),
            ..TaskPatch::default()
        };
        Ok(match self.update(task_id, patch).await? {
            Some(task) => UpdateOutcome {
                success: true,
                message: format!("Updated related files ({count} file(s))"),
                task: Some(task),
            },
            None => UpdateOutcome::failed("Related files could not be updated"),
        })
    }

    /// Checks whether every dependency of a task is completed.
    ///
    /// Missing and completed tasks can never execute (no `blocked_by`).
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be read or parsed.
    pub async fn can_execute(&self, task_id: &str) -> StoreResult<ExecutionCheck> {
        let tasks = self.read_tasks().await?;
        let Some(task) = tasks.iter().find(|t| t.id == task_id) else {
            return Ok(ExecutionCheck::refused(None));
        };
        if task.is_completed() {
            return Ok(ExecutionCheck::refused(None));
        }
        let is_done = |id: &str| tasks.iter().any(|t| t.id == id && t.is_completed());
        let blocked_by: Vec<String> = task
            .dependencies
            .iter()
            .filter(|dep| !is_done(&dep.task_id))
            .map(|dep| dep.task_id.clone())
            .collect();
        Ok(if blocked_by.is_empty() {
            ExecutionCheck {
                can_execute: true,
                blocked_by: None,
            }
        } else {
            ExecutionCheck::refused(Some(blocked_by))
        })
    }

    /// Deletes a task unless it is completed or another task depends on it.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be read or written.
    pub async fn delete(&self, task_id: &str) -> StoreResult<DeleteOutcome> {
        let _guard = self.write_lock.lock().await;
        let mut tasks = self.read_tasks().await?;
        let Some(index) = tasks.iter().position(|t| t.id == task_id) else {
            return Ok(DeleteOutcome::refused("Task not found"));
        };
        if tasks[index].is_completed() {
            return Ok(DeleteOutcome::refused("Cannot delete a completed task"));
        }
        let dependents: Vec<String> = tasks
            .iter()
            .filter(|t| t.id != task_id && t.depends_on(task_id))
            .map(|t| format!("\"{}\" (ID: {})", t.name, t.id))
            .collect();
        if !dependents.is_empty() {
            return Ok(DeleteOutcome::refused(format!(
                "Cannot delete this task because the following tasks depend on it: {}",
                dependents.join(", ")
            )));
        }
        let removed = tasks.remove(index);
        self.write_tasks(tasks).await?;
        debug!(task_id, name = %removed.name, "task deleted");
        Ok(DeleteOutcome {
            success: true,
            message: "Task deleted".to_string(),
        })
    }

    /// Creates or updates a batch of tasks; see [`batch::merge`] for the rules.
    ///
    /// Returns the tasks the batch created or updated, in input order.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be read or written.
    pub async fn batch_create_or_update(
        &self,
        inputs: &[TaskInput],
        mode: UpdateMode,
        global_analysis_result: Option<&str>,
    ) -> StoreResult<Vec<Task>> {
        let _guard = self.write_lock.lock().await;
        let existing = self.read_tasks().await?;
        let merged = batch::merge(
            existing,
            inputs,
            mode,
            global_analysis_result,
            self.ctx.clock.now(),
            self.ctx.id_gen.as_ref(),
        );
        info!(?mode, affected = merged.affected.len(), total = merged.all.len(), "batch applied");
        self.write_tasks(merged.all).await?;
        Ok(merged.affected)
    }

    /// Assesses a task's complexity; `None` when the task does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be read or parsed.
    pub async fn assess_complexity(
        &self,
        task_id: &str,
    ) -> StoreResult<Option<ComplexityAssessment>> {
        Ok(self.get(task_id).await?.as_ref().map(complexity::assess))
    }

    /// Removes every task after backing up the completed ones.
    ///
    /// The backup `memory/tasks_memory_<YYYY-MM-DDTHH-MM-SS>.json` (local
    /// time) holds `{ "tasks": [completed tasks] }`. Pending and in-progress
    /// tasks are not backed up.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection or backup cannot be read or written.
    pub async fn clear_all(&self) -> StoreResult<ClearOutcome> {
        let _guard = self.write_lock.lock().await;
        let tasks = self.read_tasks().await?;
        if tasks.is_empty() {
            return Ok(ClearOutcome {
                success: true,
                message: "No tasks to clear".to_string(),
                backup_file: None,
            });
        }

        let total = tasks.len();
        let completed: Vec<Task> = tasks.into_iter().filter(Task::is_completed).collect();
        let backed_up = completed.len();
        let now = self.ctx.clock.now();
        let stamp = now.with_timezone(&Local).format("%Y-%m-%dT%H-%M-%S");
        let backup_file = format!("{BACKUP_PREFIX}{stamp}.json");
        JsonDocument::new(self.ctx.fs.as_ref(), &self.memory_dir.join(&backup_file))
            .save(&TaskDocument { tasks: completed })
            .await?;
        self.write_tasks(Vec::new()).await?;
        info!(removed = total, backed_up, backup = %backup_file, "task collection cleared");

        Ok(ClearOutcome {
            success: true,
            message: format!(
                "Cleared {total} task(s); {backed_up} completed task(s) backed up to memory"
            ),
            backup_file: Some(backup_file),
        })
    }

    /// Searches live tasks and cleared-task backups.
    ///
    /// Backups are scanned in-process; only the ten newest backup files that
    /// contain a match contribute results. Unreadable backups are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the live collection cannot be read, or the memory
    /// directory exists but cannot be listed.
    pub async fn search(&self, query: &str, options: SearchOptions) -> StoreResult<SearchPage> {
        let live: Vec<Task> = self
            .read_tasks()
            .await?
            .into_iter()
            .filter(|t| search::matches(t, query, options.by_id))
            .collect();

        let mut archived = Vec::new();
        let mut files_used = 0;
        for name in self.backup_files().await?.iter().rev() {
            if files_used == MAX_BACKUPS_SEARCHED {
                break;
            }
            let path = self.memory_dir.join(name);
            let doc = match self.load_document(&path).await {
                Ok(Some(doc)) => doc,
                Ok(None) => continue,
                Err(err) => {
                    warn!(error = %err, "skipping unreadable backup");
                    continue;
                }
            };
            let hits: Vec<Task> = doc
                .tasks
                .into_iter()
                .filter(|t| search::matches(t, query, options.by_id))
                .collect();
            if !hits.is_empty() {
                files_used += 1;
                archived.extend(hits);
            }
        }

        Ok(search::paginate(live, archived, options))
    }

    async fn backup_files(&self) -> StoreResult<Vec<String>> {
        let fs = self.ctx.fs.as_ref();
        let list_error = |source| StoreError::List {
            path: self.memory_dir.clone(),
            source,
        };
        if !fs.exists(&self.memory_dir).await.map_err(list_error)? {
            return Ok(Vec::new());
        }
        let names = fs.list_dir(&self.memory_dir).await.map_err(list_error)?;
        let mut backups: Vec<String> = names
            .into_iter()
            .filter(|name| name.starts_with(BACKUP_PREFIX) && name.ends_with(".json"))
            .collect();
        // Timestamped names sort chronologically.
        backups.sort();
        Ok(backups)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::clock::FixedClock;
    use crate::adapters::memory::filesystem::MemoryFileSystem;
    use crate::adapters::memory::id_gen::SequenceIdGenerator;
    use crate::task::model::RelatedFileType;
    use chrono::{Duration, TimeZone, Utc};

    fn ctx() -> ServiceContext {
        ServiceContext::deterministic(Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap())
    }

    fn new_task(name: &str, deps: &[&str]) -> NewTask {
        NewTask {
            name: name.into(),
            description: format!("{name} description"),
            dependencies: deps.iter().map(|d| (*d).to_string()).collect(),
            ..NewTask::default()
        }
    }

    fn input(name: &str, deps: &[&str]) -> TaskInput {
        TaskInput {
            name: name.into(),
            description: format!("{name} work"),
            dependencies: deps.iter().map(|d| (*d).to_string()).collect(),
            ..TaskInput::default()
        }
    }

    fn names(tasks: Vec<Task>) -> Vec<String> {
        tasks.into_iter().map(|t| t.name).collect()
    }

    async fn completed(store: &TaskStore<'_>, name: &str) -> Task {
        let task = store.create(new_task(name, &[])).await.unwrap();
        store
            .update_status(&task.id, TaskStatus::Completed)
            .await
            .unwrap()
            .unwrap()
    }

    #[tokio::test]
    async fn create_persists_pending_task() {
        let ctx = ctx();
        let store = TaskStore::new(&ctx, Path::new("/data"));

        let task = store.create(new_task("A", &["unchecked"])).await.unwrap();

        assert_eq!(task.status, TaskStatus::Pending);
        assert_eq!(
            task.dependencies,
            vec![TaskDependency {
                task_id: "unchecked".into(),
            }]
        );
        assert_eq!(store.all().await.unwrap(), vec![task.clone()]);
        assert_eq!(store.get(&task.id).await.unwrap(), Some(task));
        assert_eq!(store.get("missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn completed_task_rejects_content_changes() {
        let ctx = ctx();
        let store = TaskStore::new(&ctx, Path::new("/data"));
        let done = completed(&store, "Done").await;

        let patch = TaskPatch {
            description: Some("x".into()),
            ..TaskPatch::default()
        };
        let rejected = store.update(&done.id, patch).await.unwrap();
        assert!(rejected.is_none());
        assert_eq!(
            store.get(&done.id).await.unwrap().unwrap().description,
            done.description
        );

        let accepted = store.update_summary(&done.id, "x").await.unwrap();
        assert_eq!(accepted.unwrap().summary.as_deref(), Some("x"));
    }

    #[tokio::test]
    async fn mixed_patch_on_completed_task_is_rejected_whole() {
        let ctx = ctx();
        let store = TaskStore::new(&ctx, Path::new("/data"));
        let done = completed(&store, "Done").await;

        let patch = TaskPatch {
            summary: Some("s".into()),
            name: Some("renamed".into()),
            ..TaskPatch::default()
        };
        assert!(store.update(&done.id, patch).await.unwrap().is_none());
        let stored = store.get(&done.id).await.unwrap().unwrap();
        assert!(stored.summary.is_none());
        assert_eq!(stored.name, "Done");
    }

    #[tokio::test]
    async fn update_status_stamps_completion() {
        let fixed = FixedClock::new(Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap());
        fixed.advance(Duration::minutes(5));
        let ctx = ServiceContext {
            clock: Box::new(fixed),
            fs: Box::new(MemoryFileSystem::new()),
            id_gen: Box::new(SequenceIdGenerator::new()),
        };
        let store = TaskStore::new(&ctx, Path::new("/data"));
        let task = store.create(new_task("A", &[])).await.unwrap();

        let running = store
            .update_status(&task.id, TaskStatus::InProgress)
            .await
            .unwrap();
        assert!(running.unwrap().completed_at.is_none());

        let done = store
            .update_status(&task.id, TaskStatus::Completed)
            .await
            .unwrap();
        assert_eq!(done.unwrap().completed_at, Some(ctx.clock.now()));

        let missing = store
            .update_status("missing", TaskStatus::Completed)
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn can_execute_reports_blockers() {
        let ctx = ctx();
        let store = TaskStore::new(&ctx, Path::new("/data"));
        let a = store.create(new_task("A", &[])).await.unwrap();
        let b = store.create(new_task("B", &[&a.id, "x"])).await.unwrap();

        let check = store.can_execute(&b.id).await.unwrap();
        assert!(!check.can_execute);
        assert_eq!(check.blocked_by, Some(vec![a.id.clone(), "x".to_string()]));

        let ready = ExecutionCheck {
            can_execute: true,
            blocked_by: None,
        };
        assert_eq!(store.can_execute(&a.id).await.unwrap(), ready);

        store
            .update_status(&a.id, TaskStatus::Completed)
            .await
            .unwrap();
        let check = store.can_execute(&b.id).await.unwrap();
        assert_eq!(check.blocked_by, Some(vec!["x".to_string()]));

        let finished = store.can_execute(&a.id).await.unwrap();
        assert_eq!(finished, ExecutionCheck::refused(None));
        assert!(!store.can_execute("missing").await.unwrap().can_execute);
    }

    #[tokio::test]
    async fn delete_is_guarded_by_dependents() {
        let ctx = ctx();
        let store = TaskStore::new(&ctx, Path::new("/data"));
        let a = store.create(new_task("A", &[])).await.unwrap();
        let b = store.create(new_task("B", &[&a.id])).await.unwrap();

        let blocked = store.delete(&a.id).await.unwrap();
        assert!(!blocked.success);
        assert!(blocked.message.contains("\"B\""));
        assert!(blocked.message.contains(&b.id));

        assert!(store.delete(&b.id).await.unwrap().success);
        assert!(store.delete(&a.id).await.unwrap().success);
        assert!(store.all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_refuses_completed_and_missing() {
        let ctx = ctx();
        let store = TaskStore::new(&ctx, Path::new("/data"));
        let done = completed(&store, "Done").await;

        let outcome = store.delete(&done.id).await.unwrap();
        assert!(!outcome.success);
        assert_eq!(outcome.message, "Cannot delete a completed task");
        let missing = store.delete("missing").await.unwrap();
        assert_eq!(missing.message, "Task not found");
    }

    #[tokio::test]
    async fn batch_resolves_names_and_persists() {
        let ctx = ctx();
        let store = TaskStore::new(&ctx, Path::new("/data"));

        let created = store
            .batch_create_or_update(
                &[input("A", &[]), input("B", &["A", "Nope"])],
                UpdateMode::Append,
                Some("analysis"),
            )
            .await
            .unwrap();

        assert_eq!(created[1].dependencies.len(), 1);
        assert_eq!(created[1].dependencies[0].task_id, created[0].id);
        assert_eq!(created[0].analysis_result.as_deref(), Some("analysis"));
        assert_eq!(store.all().await.unwrap(), created);
    }

    #[tokio::test]
    async fn batch_modes_against_stored_tasks() {
        let ctx = ctx();
        let store = TaskStore::new(&ctx, Path::new("/data"));
        let x = store.create(new_task("X", &[])).await.unwrap();
        let y = completed(&store, "Y").await;

        store
            .batch_create_or_update(&[input("N", &[])], UpdateMode::Append, None)
            .await
            .unwrap();
        assert_eq!(names(store.all().await.unwrap()), vec!["X", "Y", "N"]);

        store
            .batch_create_or_update(&[input("M", &[])], UpdateMode::Overwrite, None)
            .await
            .unwrap();
        let all = store.all().await.unwrap();
        assert!(all.iter().all(|t| t.id != x.id));
        assert!(all.contains(&y));

        store
            .batch_create_or_update(
                &[input("1", &[]), input("2", &[]), input("3", &[])],
                UpdateMode::ClearAllTasks,
                None,
            )
            .await
            .unwrap();
        assert_eq!(store.all().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn selective_batch_updates_in_place() {
        let ctx = ctx();
        let store = TaskStore::new(&ctx, Path::new("/data"));
        let refactor = store.create(new_task("Refactor", &[])).await.unwrap();
        let docs = store.create(new_task("Docs", &[])).await.unwrap();

        let mut incoming = input("Refactor", &[]);
        incoming.description = "new".into();
        let affected = store
            .batch_create_or_update(&[incoming], UpdateMode::Selective, None)
            .await
            .unwrap();

        assert_eq!(affected[0].id, refactor.id);
        assert_eq!(affected[0].created_at, refactor.created_at);
        assert_eq!(affected[0].description, "new");
        assert_eq!(store.get(&docs.id).await.unwrap(), Some(docs));
    }

    #[tokio::test]
    async fn content_and_related_file_updates() {
        let ctx = ctx();
        let store = TaskStore::new(&ctx, Path::new("/data"));
        let task = store.create(new_task("A", &[])).await.unwrap();
        let done = completed(&store, "Done").await;

        let empty = store
            .update_content(&task.id, TaskContentUpdate::default())
            .await
            .unwrap();
        assert!(empty.success);
        assert_eq!(empty.task, Some(task.clone()));

        let update = TaskContentUpdate {
            notes: Some("watch out".into()),
            dependencies: Some(vec![done.id.clone()]),
            ..TaskContentUpdate::default()
        };
        let edited = store.update_content(&task.id, update).await.unwrap();
        let edited_task = edited.task.unwrap();
        assert_eq!(edited_task.notes.as_deref(), Some("watch out"));
        assert_eq!(edited_task.dependencies[0].task_id, done.id);

        let refused = store
            .update_content(&done.id, TaskContentUpdate::default())
            .await
            .unwrap();
        assert!(!refused.success);

        let files = vec![RelatedFile {
            path: "src/lib.rs".into(),
            file_type: RelatedFileType::Reference,
            description: None,
            line_start: None,
            line_end: None,
        }];
        let outcome = store
            .update_related_files(&task.id, files.clone())
            .await
            .unwrap();
        assert!(outcome.success);
        assert_eq!(outcome.task.unwrap().related_files, Some(files));

        let missing = store
            .update_related_files("missing", Vec::new())
            .await
            .unwrap();
        assert!(!missing.success);
    }

    #[tokio::test]
    async fn clear_all_backs_up_completed_only() {
        let ctx = ctx();
        let store = TaskStore::new(&ctx, Path::new("/data"));

        let nothing = store.clear_all().await.unwrap();
        assert!(nothing.success);
        assert!(nothing.backup_file.is_none());

        store.create(new_task("Pending", &[])).await.unwrap();
        let done = completed(&store, "Done").await;

        let outcome = store.clear_all().await.unwrap();
        let backup = outcome.backup_file.unwrap();
        assert!(backup.starts_with("tasks_memory_"));
        assert!(backup.ends_with(".json"));
        assert!(!backup.contains(':'));
        assert_eq!(backup.len(), "tasks_memory_2025-06-01T12-00-00.json".len());
        assert!(store.all().await.unwrap().is_empty());

        let backup_path = Path::new("/data/memory").join(&backup);
        let raw = ctx.fs.read_to_string(&backup_path).await.unwrap();
        let doc: TaskDocument = serde_json::from_str(&raw).unwrap();
        assert_eq!(doc.tasks, vec![done]);
    }

    #[tokio::test]
    async fn search_covers_live_and_backups() {
        let ctx = ctx();
        let store = TaskStore::new(&ctx, Path::new("/data"));
        let archived = completed(&store, "Parser archive").await;
        store.clear_all().await.unwrap();
        let live = store.create(new_task("Parser live", &[])).await.unwrap();
        store.create(new_task("Unrelated", &[])).await.unwrap();

        let page = store
            .search("parser", SearchOptions::default())
            .await
            .unwrap();
        let ids: Vec<&str> = page.tasks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec![archived.id.as_str(), live.id.as_str()]);

        let options = SearchOptions {
            by_id: true,
            ..SearchOptions::default()
        };
        let by_id = store.search(&archived.id, options).await.unwrap();
        assert_eq!(by_id.pagination.total_results, 1);
    }

    #[tokio::test]
    async fn corrupted_collection_is_an_error() {
        let ctx = ctx();
        let path = Path::new("/data/tasks.json");
        ctx.fs.write(path, "{\"tasks\": [").await.unwrap();
        let store = TaskStore::new(&ctx, Path::new("/data"));

        assert!(matches!(store.all().await, Err(StoreError::Parse { .. })));
    }

    #[tokio::test]
    async fn missing_timestamps_come_from_the_clock() {
        let ctx = ctx();
        let raw = r#"{"tasks": [{
            "id": "t-1",
            "name": "Legacy",
            "description": "imported by hand",
            "status": "pending",
            "updatedAt": "not a time"
        }]}"#;
        let path = Path::new("/data/tasks.json");
        ctx.fs.write(path, raw).await.unwrap();
        let store = TaskStore::new(&ctx, Path::new("/data"));

        let task = store.get("t-1").await.unwrap().unwrap();

        let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        assert_eq!(task.created_at, now);
        assert_eq!(task.updated_at, now);
        assert!(task.completed_at.is_none());
    }

    #[tokio::test]
    async fn concurrent_creates_do_not_lose_updates() {
        let ctx = ctx();
        let store = TaskStore::new(&ctx, Path::new("/data"));

        let (a, b, c) = tokio::join!(
            store.create(new_task("A", &[])),
            store.create(new_task("B", &[])),
            store.create(new_task("C", &[])),
        );
        a.unwrap();
        b.unwrap();
        c.unwrap();
        assert_eq!(store.all().await.unwrap().len(), 3);
    }
}
