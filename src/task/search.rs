//! Keyword and ID search over live tasks and cleared-task backups.

use std::cmp::Ordering;
use std::collections::HashSet;

use serde::Serialize;

use super::model::Task;

/// Search parameters.
#[derive(Debug, Clone, Copy)]
pub struct SearchOptions {
    /// Treat the query as an exact task ID instead of keywords.
    pub by_id: bool,
    /// 1-based page number; clamped into range.
    pub page: usize,
    /// Results per page (at least 1).
    pub page_size: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            by_id: false,
            page: 1,
            page_size: 5,
        }
    }
}

/// Page bookkeeping for a [`SearchPage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// Page actually returned.
    pub current_page: usize,
    /// Total number of pages (at least 1).
    pub total_pages: usize,
    /// Number of matching tasks across all pages.
    pub total_results: usize,
    /// Whether pages follow this one.
    pub has_more: bool,
}

/// One page of search results.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchPage {
    /// Matching tasks on this page.
    pub tasks: Vec<Task>,
    /// Paging information.
    pub pagination: Pagination,
}

/// Returns `true` if `task` matches the query.
///
/// By ID the match is exact. Otherwise the query is split on whitespace and
/// every keyword must appear (case-insensitively) in the name, description,
/// notes, implementation guide or summary. An empty keyword query matches
/// everything.
#[must_use]
pub fn matches(task: &Task, query: &str, by_id: bool) -> bool {
    if by_id {
        return task.id == query;
    }
    let fields: Vec<String> = [
        Some(task.name.as_str()),
        Some(task.description.as_str()),
        task.notes.as_deref(),
        task.implementation_guide.as_deref(),
        task.summary.as_deref(),
    ]
    .into_iter()
    .flatten()
    .map(str::to_lowercase)
    .collect();

    query.split_whitespace().all(|keyword| {
        let keyword = keyword.to_lowercase();
        fields.iter().any(|field| field.contains(&keyword))
    })
}

/// Merges live and archived matches, sorts and paginates them.
///
/// Live tasks win ID collisions. Completed tasks come first, newest
/// completion first; the rest follow by most recent update.
#[must_use]
pub fn paginate(live: Vec<Task>, archived: Vec<Task>, options: SearchOptions) -> SearchPage {
    let mut seen: HashSet<String> = live.iter().map(|t| t.id.clone()).collect();
    let mut all = live;
    for task in archived {
        if seen.insert(task.id.clone()) {
            all.push(task);
        }
    }
    all.sort_by(compare_for_display);

    let page_size = options.page_size.max(1);
    let total_results = all.len();
    let total_pages = total_results.div_ceil(page_size).max(1);
    let current_page = options.page.clamp(1, total_pages);
    let tasks: Vec<Task> = all
        .into_iter()
        .skip((current_page - 1) * page_size)
        .take(page_size)
        .collect();

    SearchPage {
        tasks,
        pagination: Pagination {
            current_page,
            total_pages,
            total_results,
            has_more: current_page < total_pages,
        },
    }
}

fn compare_for_display(a: &Task, b: &Task) -> Ordering {
    match (a.completed_at, b.completed_at) {
        (Some(a_done), Some(b_done)) => b_done.cmp(&a_done),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => b.updated_at.cmp(&a.updated_at),
    }
}
