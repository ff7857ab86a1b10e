//! `taskmind complexity` command.

use std::fmt::Write as _;

use crate::task::{ComplexityAssessment, TaskStore};

/// Execute the `complexity` command.
///
/// # Errors
///
/// Returns an error string if the task does not exist or cannot be read.
pub async fn run(store: &TaskStore<'_>, id: &str) -> Result<(), String> {
    let assessment = store
        .assess_complexity(id)
        .await
        .map_err(|err| err.to_string())?
        .ok_or_else(|| format!("Task not found: {id}"))?;
    print!("{}", render(&assessment));
    Ok(())
}

/// Renders an assessment with its metrics and recommendations.
#[must_use]
pub fn render(assessment: &ComplexityAssessment) -> String {
    let m = &assessment.metrics;
    let mut out = format!("Level: {}\n", assessment.level);
    let _ = writeln!(out, "Description length: {}", m.description_length);
    let _ = writeln!(out, "Dependencies: {}", m.dependencies_count);
    let _ = writeln!(out, "Notes length: {}", m.notes_length);
    out.push_str("\nRecommendations:\n");
    for rec in &assessment.recommendations {
        let _ = writeln!(out, "  - {rec}");
    }
    out
}
