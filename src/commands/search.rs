//! `taskmind search` command.

use std::fmt::Write as _;

use crate::task::{SearchOptions, SearchPage, TaskStore};

/// Execute the `search` command.
///
/// # Errors
///
/// Returns an error string if the store or its backups cannot be read.
pub async fn run(store: &TaskStore<'_>, query: &str, options: SearchOptions) -> Result<(), String> {
    let page = store
        .search(query, options)
        .await
        .map_err(|err| err.to_string())?;
    print!("{}", render(&page));
    Ok(())
}

/// Renders one page of results.
#[must_use]
pub fn render(page: &SearchPage) -> String {
    let p = &page.pagination;
    if p.total_results == 0 {
        return "No matching tasks.\n".to_string();
    }
    let mut out = format!(
        "{} result(s), page {} of {}\n",
        p.total_results, p.current_page, p.total_pages
    );
    for task in &page.tasks {
        let _ = writeln!(out, "  {}  [{}]  {}", task.id, task.status, task.name);
    }
    if p.has_more {
        let _ = writeln!(out, "More results: --page {}", p.current_page + 1);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_page() {
        let page = crate::task::search::paginate(Vec::new(), Vec::new(), SearchOptions::default());
        assert_eq!(render(&page), "No matching tasks.\n");
    }
}
