//! Complexity assessment derived from a task's description, dependencies and notes.

use std::fmt;

use serde::Serialize;

use super::model::Task;

/// Qualitative complexity, ordered from least to most complex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComplexityLevel {
    /// Simple and direct.
    Low,
    /// Some complexity, still manageable.
    Medium,
    /// Complex and time-consuming.
    High,
    /// Should be split.
    VeryHigh,
}

impl fmt::Display for ComplexityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Low => "Low Complexity",
            Self::Medium => "Medium Complexity",
            Self::High => "High Complexity",
            Self::VeryHigh => "Very High Complexity",
        })
    }
}

/// Inclusive lower bounds for MEDIUM, HIGH and VERY_HIGH.
#[derive(Debug, Clone, Copy)]
pub struct Thresholds {
    /// Lower bound for [`ComplexityLevel::Medium`].
    pub medium: usize,
    /// Lower bound for [`ComplexityLevel::High`].
    pub high: usize,
    /// Lower bound for [`ComplexityLevel::VeryHigh`].
    pub very_high: usize,
}

impl Thresholds {
    /// Level implied by a single metric value.
    #[must_use]
    pub fn level_for(&self, value: usize) -> ComplexityLevel {
        if value >= self.very_high {
            ComplexityLevel::VeryHigh
        } else if value >= self.high {
            ComplexityLevel::High
        } else if value >= self.medium {
            ComplexityLevel::Medium
        } else {
            ComplexityLevel::Low
        }
    }
}

/// Description length, in characters.
pub const DESCRIPTION_LENGTH: Thresholds = Thresholds {
    medium: 500,
    high: 1000,
    very_high: 2000,
};
/// Number of dependencies.
pub const DEPENDENCIES_COUNT: Thresholds = Thresholds {
    medium: 2,
    high: 5,
    very_high: 10,
};
/// Notes length, in characters.
pub const NOTES_LENGTH: Thresholds = Thresholds {
    medium: 200,
    high: 500,
    very_high: 1000,
};

/// Raw measurements behind an assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplexityMetrics {
    /// Description length in characters.
    pub description_length: usize,
    /// Number of dependencies.
    pub dependencies_count: usize,
    /// Notes length in characters (0 when absent).
    pub notes_length: usize,
    /// Whether the task has non-empty notes.
    pub has_notes: bool,
}

/// Result of [`assess`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComplexityAssessment {
    /// Highest level implied by any single metric.
    pub level: ComplexityLevel,
    /// Measurements used.
    pub metrics: ComplexityMetrics,
    /// Level-specific guidance.
    pub recommendations: Vec<String>,
}

/// Assesses a task's complexity.
#[must_use]
pub fn assess(task: &Task) -> ComplexityAssessment {
    let notes = task.notes.as_deref().unwrap_or_default();
    let metrics = ComplexityMetrics {
        description_length: task.description.chars().count(),
        dependencies_count: task.dependencies.len(),
        notes_length: notes.chars().count(),
        has_notes: !notes.is_empty(),
    };

    let level = DESCRIPTION_LENGTH
        .level_for(metrics.description_length)
        .max(DEPENDENCIES_COUNT.level_for(metrics.dependencies_count))
        .max(NOTES_LENGTH.level_for(metrics.notes_length));

    ComplexityAssessment {
        level,
        metrics,
        recommendations: recommendations(level, &metrics),
    }
}

fn recommendations(level: ComplexityLevel, metrics: &ComplexityMetrics) -> Vec<String> {
    let mut out: Vec<&str> = Vec::new();
    match level {
        ComplexityLevel::Low => {
            out.push("This task has low complexity and can be executed directly.");
            out.push("Set clear completion criteria so acceptance has an unambiguous basis.");
        }
        ComplexityLevel::Medium => {
            out.push("This task has some complexity; plan the execution steps in detail.");
            out.push("Execute in stages and check progress regularly against the criteria.");
            if metrics.dependencies_count > 0 {
                out.push("Check the completion status and output quality of every dependency.");
            }
        }
        ComplexityLevel::High => {
            out.push("This task is highly complex; analyse and plan before starting.");
            out.push("Consider splitting it into smaller, independently executable subtasks.");
            out.push("Define clear milestones and checkpoints to track progress and quality.");
            if metrics.dependencies_count > DEPENDENCIES_COUNT.medium {
                out.push("There are many dependencies; graph them to confirm execution order.");
            }
        }
        ComplexityLevel::VeryHigh => {
            out.push("This task is extremely complex; split it into independent tasks.");
            out.push("Define each subtask's scope and interfaces before execution.");
            out.push("Assess risks, identify likely blockers and prepare mitigations.");
            out.push("Write concrete verification criteria for every subtask's output.");
            if metrics.description_length >= DESCRIPTION_LENGTH.very_high {
                out.push("The description is very long; distil it into a checklist.");
            }
            if metrics.dependencies_count >= DEPENDENCIES_COUNT.high {
                out.push("There are too many dependencies; re-evaluate the task boundary.");
            }
        }
    }
    out.into_iter().map(String::from).collect()
}
