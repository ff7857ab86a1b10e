//! Batch create/update: merging incoming tasks into the stored set.
//!
//! The merge runs in two passes. The first decides which stored tasks are
//! retained and gives every incoming task an ID (new or reused). The second
//! resolves dependency tokens, so a task may depend on another task from
//! the same batch by name even though neither existed before the call.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use tracing::debug;

use super::model::{Task, TaskDependency, TaskInput, TaskStatus, UpdateMode};
use crate::ports::IdGenerator;

/// Outcome of [`merge`].
#[derive(Debug, Clone, PartialEq)]
pub struct MergeResult {
    /// The full collection to persist: retained tasks followed by batch tasks.
    pub all: Vec<Task>,
    /// Tasks created or updated by the batch, in input order.
    pub affected: Vec<Task>,
}

/// Returns `true` for hyphenated UUID strings (8-4-4-4-12 hex digits).
#[must_use]
pub fn looks_like_uuid(token: &str) -> bool {
    let bytes = token.as_bytes();
    bytes.len() == 36
        && bytes.iter().enumerate().all(|(i, b)| match i {
            8 | 13 | 18 | 23 => *b == b'-',
            _ => b.is_ascii_hexdigit(),
        })
}

/// Merges `inputs` into `existing` according to `mode`.
///
/// Retention per mode:
///
/// | mode            | stored tasks kept                                   |
/// |-----------------|-----------------------------------------------------|
/// | `Append`        | all                                                 |
/// | `Overwrite`     | completed only                                      |
/// | `Selective`     | those not named in the batch, plus all completed    |
/// | `ClearAllTasks` | none                                                |
///
/// In selective mode an input whose name matches a stored non-completed
/// task updates that task in place (same ID and `created_at`). Every other
/// input becomes a new pending task, including one whose name only matches
/// a completed task.
///
/// Dependency tokens shaped like a UUID must match the ID of a retained or
/// batch task; other tokens are looked up by name. Unresolvable tokens are
/// dropped. An input with no dependency tokens leaves an updated task's
/// existing dependencies alone.
#[must_use]
pub fn merge(
    existing: Vec<Task>,
    inputs: &[TaskInput],
    mode: UpdateMode,
    global_analysis_result: Option<&str>,
    now: DateTime<Utc>,
    id_gen: &dyn IdGenerator,
) -> MergeResult {
    let incoming_names: HashSet<&str> = inputs.iter().map(|t| t.name.as_str()).collect();

    let (retained, replaceable): (Vec<Task>, Vec<Task>) = match mode {
        UpdateMode::Append => (existing, Vec::new()),
        UpdateMode::Overwrite => {
            let completed: Vec<Task> = existing.into_iter().filter(Task::is_completed).collect();
            (completed, Vec::new())
        }
        UpdateMode::Selective => existing
            .into_iter()
            .partition(|t| t.is_completed() || !incoming_names.contains(t.name.as_str())),
        UpdateMode::ClearAllTasks => (Vec::new(), Vec::new()),
    };

    let mut name_to_id: HashMap<String, String> = HashMap::new();
    for task in &retained {
        name_to_id.insert(task.name.clone(), task.id.clone());
    }

    let mut affected: Vec<Task> = Vec::with_capacity(inputs.len());
    let mut claimed: HashSet<&str> = HashSet::new();
    for input in inputs {
        let in_place = replaceable
            .iter()
            .rev()
            .find(|t| t.name == input.name && !claimed.contains(t.id.as_str()));
        if let Some(current) = in_place {
            claimed.insert(current.id.as_str());
        }

        let task = match in_place {
            Some(current) => {
                let mut updated = current.clone();
                updated.name.clone_from(&input.name);
                updated.description.clone_from(&input.description);
                updated.notes.clone_from(&input.notes);
                updated.updated_at = now;
                updated
                    .implementation_guide
                    .clone_from(&input.implementation_guide);
                updated
                    .verification_criteria
                    .clone_from(&input.verification_criteria);
                updated.analysis_result = global_analysis_result.map(String::from);
                updated.agent.clone_from(&input.agent);
                if input.related_files.is_some() {
                    updated.related_files.clone_from(&input.related_files);
                }
                updated
            }
            None => Task {
                id: id_gen.generate_id(),
                name: input.name.clone(),
                description: input.description.clone(),
                notes: input.notes.clone(),
                status: TaskStatus::Pending,
                dependencies: Vec::new(),
                created_at: now,
                updated_at: now,
                completed_at: None,
                summary: None,
                related_files: input.related_files.clone(),
                analysis_result: global_analysis_result.map(String::from),
                agent: input.agent.clone(),
                implementation_guide: input.implementation_guide.clone(),
                verification_criteria: input.verification_criteria.clone(),
            },
        };
        name_to_id.insert(task.name.clone(), task.id.clone());
        affected.push(task);
    }

    let known_ids: HashSet<&str> = retained
        .iter()
        .chain(affected.iter())
        .map(|t| t.id.as_str())
        .collect();
    let resolved: Vec<Option<Vec<TaskDependency>>> = inputs
        .iter()
        .map(|input| {
            if input.dependencies.is_empty() {
                return None;
            }
            let deps = input
                .dependencies
                .iter()
                .filter_map(|token| resolve_token(token, &known_ids, &name_to_id))
                .map(TaskDependency::from)
                .collect();
            Some(deps)
        })
        .collect();

    for (task, deps) in affected.iter_mut().zip(resolved) {
        if let Some(deps) = deps {
            task.dependencies = deps;
        }
    }

    let mut all = retained;
    all.extend(affected.iter().cloned());
    MergeResult { all, affected }
}

fn resolve_token(
    token: &str,
    known_ids: &HashSet<&str>,
    name_to_id: &HashMap<String, String>,
) -> Option<String> {
    let resolved = if looks_like_uuid(token) {
        known_ids.contains(token).then(|| token.to_string())
    } else {
        name_to_id.get(token).cloned()
    };
    if resolved.is_none() {
        debug!(token, "dropping unresolved dependency");
    }
    resolved
}
