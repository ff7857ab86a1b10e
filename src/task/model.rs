//! Task entity and the inputs that create or change it.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timestamp;

/// Where a task sits in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Created but not started.
    Pending,
    /// Currently being worked on.
    InProgress,
    /// Done and verified. Only `summary` and `related_files` may change afterwards.
    Completed,
    /// Advisory: waiting on dependencies. Never set by the store itself.
    Blocked,
}

impl TaskStatus {
    /// The wire spelling (`pending`, `in_progress`, ...).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Blocked => "blocked",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reference to a task that must be completed first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDependency {
    /// ID of the prerequisite task.
    pub task_id: String,
}

impl From<String> for TaskDependency {
    fn from(task_id: String) -> Self {
        Self { task_id }
    }
}

/// How a related file relates to its task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RelatedFileType {
    /// File the task will modify.
    ToModify,
    /// Reference material.
    Reference,
    /// File the task will create.
    Create,
    /// Component or library the task depends on.
    Dependency,
    /// Anything else.
    Other,
}

/// A file associated with a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelatedFile {
    /// Path, relative to the project root or absolute.
    pub path: String,
    /// Relationship to the task.
    #[serde(rename = "type")]
    pub file_type: RelatedFileType,
    /// What the file is for in this task.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// First line of the relevant block.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_start: Option<u32>,
    /// Last line of the relevant block.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_end: Option<u32>,
}

/// A unit of work with status, dependencies and descriptive payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique, immutable identifier.
    pub id: String,
    /// Short label.
    pub name: String,
    /// Free-text description.
    pub description: String,
    /// Supplementary notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Lifecycle status.
    pub status: TaskStatus,
    /// Prerequisites, in declaration order.
    #[serde(default)]
    pub dependencies: Vec<TaskDependency>,
    /// Creation time.
    #[serde(
        serialize_with = "timestamp::serialize",
        deserialize_with = "timestamp::deserialize"
    )]
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    #[serde(
        serialize_with = "timestamp::serialize",
        deserialize_with = "timestamp::deserialize"
    )]
    pub updated_at: DateTime<Utc>,
    /// When the task reached `completed`.
    #[serde(
        with = "timestamp::option",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub completed_at: Option<DateTime<Utc>>,
    /// Completion summary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Files touched or consulted by the task.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_files: Option<Vec<RelatedFile>>,
    /// Full analysis output from the planning stage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis_result: Option<String>,
    /// Agent best suited to the task.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent: Option<String>,
    /// Concrete implementation steps.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub implementation_guide: Option<String>,
    /// Acceptance and verification criteria.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verification_criteria: Option<String>,
}

impl Task {
    /// Returns `true` once the task is completed.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }

    /// Returns `true` if this task lists `task_id` as a dependency.
    #[must_use]
    pub fn depends_on(&self, task_id: &str) -> bool {
        self.dependencies.iter().any(|dep| dep.task_id == task_id)
    }
}

/// On-disk layout of the task collection: `{ "tasks": [...] }`.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct TaskDocument {
    /// Every stored task.
    #[serde(default)]
    pub tasks: Vec<Task>,
}

/// Input to [`TaskStore::create`](crate::task::TaskStore::create).
#[derive(Debug, Clone, Default)]
pub struct NewTask {
    /// Short label.
    pub name: String,
    /// Free-text description.
    pub description: String,
    /// Supplementary notes.
    pub notes: Option<String>,
    /// Dependency task IDs, stored as given.
    pub dependencies: Vec<String>,
    /// Related files.
    pub related_files: Option<Vec<RelatedFile>>,
    /// Assigned agent.
    pub agent: Option<String>,
}

/// One incoming task in a batch create/update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskInput {
    /// Short label; also the merge key in selective mode.
    pub name: String,
    /// Free-text description.
    pub description: String,
    /// Supplementary notes.
    #[serde(default)]
    pub notes: Option<String>,
    /// Dependency tokens: task IDs or task names.
    #[serde(default)]
    pub dependencies: Vec<String>,
    /// Related files.
    #[serde(default)]
    pub related_files: Option<Vec<RelatedFile>>,
    /// Implementation steps.
    #[serde(default)]
    pub implementation_guide: Option<String>,
    /// Verification criteria.
    #[serde(default)]
    pub verification_criteria: Option<String>,
    /// Assigned agent.
    #[serde(default)]
    pub agent: Option<String>,
}

/// Partial update for [`TaskStore::update`](crate::task::TaskStore::update).
///
/// A field is "present" when it is `Some`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskPatch {
    /// New name.
    pub name: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New notes.
    pub notes: Option<String>,
    /// New status.
    pub status: Option<TaskStatus>,
    /// Replacement dependency list.
    pub dependencies: Option<Vec<TaskDependency>>,
    /// Completion time.
    pub completed_at: Option<DateTime<Utc>>,
    /// Completion summary.
    pub summary: Option<String>,
    /// Replacement related files.
    pub related_files: Option<Vec<RelatedFile>>,
    /// Analysis output.
    pub analysis_result: Option<String>,
    /// Assigned agent.
    pub agent: Option<String>,
    /// Implementation steps.
    pub implementation_guide: Option<String>,
    /// Verification criteria.
    pub verification_criteria: Option<String>,
}

impl TaskPatch {
    /// Returns `true` if the patch only carries fields a completed task still accepts.
    #[must_use]
    pub fn allowed_after_completion(&self) -> bool {
        let Self {
            name,
            description,
            notes,
            status,
            dependencies,
            completed_at,
            summary: _,
            related_files: _,
            analysis_result,
            agent,
            implementation_guide,
            verification_criteria,
        } = self;
        name.is_none()
            && description.is_none()
            && notes.is_none()
            && status.is_none()
            && dependencies.is_none()
            && completed_at.is_none()
            && analysis_result.is_none()
            && agent.is_none()
            && implementation_guide.is_none()
            && verification_criteria.is_none()
    }

    /// Returns `true` if no field is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.allowed_after_completion() && self.summary.is_none() && self.related_files.is_none()
    }

    /// Copies every present field onto `task`.
    pub fn apply_to(self, task: &mut Task) {
        if let Some(name) = self.name {
            task.name = name;
        }
        if let Some(description) = self.description {
            task.description = description;
        }
        if let Some(status) = self.status {
            task.status = status;
        }
        if let Some(dependencies) = self.dependencies {
            task.dependencies = dependencies;
        }
        task.notes = self.notes.or(task.notes.take());
        task.completed_at = self.completed_at.or(task.completed_at);
        task.summary = self.summary.or(task.summary.take());
        task.related_files = self.related_files.or(task.related_files.take());
        task.analysis_result = self.analysis_result.or(task.analysis_result.take());
        task.agent = self.agent.or(task.agent.take());
        let guide = task.implementation_guide.take();
        task.implementation_guide = self.implementation_guide.or(guide);
        let criteria = task.verification_criteria.take();
        task.verification_criteria = self.verification_criteria.or(criteria);
    }
}

/// Content edit for a not-yet-completed task.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskContentUpdate {
    /// New name.
    #[serde(default)]
    pub name: Option<String>,
    /// New description.
    #[serde(default)]
    pub description: Option<String>,
    /// New notes.
    #[serde(default)]
    pub notes: Option<String>,
    /// Replacement related files.
    #[serde(default)]
    pub related_files: Option<Vec<RelatedFile>>,
    /// Replacement dependency IDs, stored as given.
    #[serde(default)]
    pub dependencies: Option<Vec<String>>,
    /// Implementation steps.
    #[serde(default)]
    pub implementation_guide: Option<String>,
    /// Verification criteria.
    #[serde(default)]
    pub verification_criteria: Option<String>,
    /// Assigned agent.
    #[serde(default)]
    pub agent: Option<String>,
}

impl From<TaskContentUpdate> for TaskPatch {
    fn from(update: TaskContentUpdate) -> Self {
        Self {
            name: update.name,
            description: update.description,
            notes: update.notes,
            related_files: update.related_files,
            dependencies: update
                .dependencies
                .map(|ids| ids.into_iter().map(TaskDependency::from).collect()),
            implementation_guide: update.implementation_guide,
            verification_criteria: update.verification_criteria,
            agent: update.agent,
            ..Self::default()
        }
    }
}

/// How a batch merges with the tasks already stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UpdateMode {
    /// Keep every existing task.
    Append,
    /// Keep only completed tasks.
    Overwrite,
    /// Keep tasks not named in the batch; update same-named pending ones in place.
    Selective,
    /// Keep nothing.
    ClearAllTasks,
}
