//! File-backed memory store with short-term and long-term scopes.

use std::path::{Path, PathBuf};

use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use super::model::{Importance, MemoryEntry, MemoryEntryInput, Scope};
use super::retention::{apply_short_term_limit, dedupe_by_id, sort_newest_first};
use crate::context::ServiceContext;
use crate::error::{StoreError, StoreResult};
use crate::store::JsonDocument;
use crate::timestamp;

/// Default size of the short-term window.
pub const DEFAULT_SHORT_TERM_LIMIT: usize = 50;
/// Default number of entries returned by [`MemoryStore::list_recent`].
pub const DEFAULT_LIST_LIMIT: usize = 10;
const ENTRIES_FILE: &str = "entries.json";
const REQUIRED_TIMESTAMPS: &[&str] = &["createdAt"];

/// Options for [`MemoryStore::append`].
#[derive(Debug, Clone, Copy, Default)]
pub struct AppendOptions {
    /// Target scope.
    pub scope: Scope,
    /// Also copy the entry to long-term. Defaults to "importance is high".
    pub promote: Option<bool>,
}

/// Options for [`MemoryStore::list_recent`].
#[derive(Debug, Clone)]
pub struct ListOptions {
    /// Scope to read.
    pub scope: Scope,
    /// Maximum entries returned; values below 1 are treated as 1.
    pub limit: usize,
    /// Only entries for this task.
    pub task_id: Option<String>,
    /// Only entries carrying every one of these tags.
    pub tags: Vec<String>,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            scope: Scope::ShortTerm,
            limit: DEFAULT_LIST_LIMIT,
            task_id: None,
            tags: Vec::new(),
        }
    }
}

/// Options for [`MemoryStore::prune`].
#[derive(Debug, Clone, Copy, Default)]
pub struct PruneOptions {
    /// Upper bound for the short-term scope. Defaults to the store's limit.
    pub max_short_term: Option<usize>,
}

/// Persistent memory, one JSON array per scope:
/// `<base_dir>/short-term/entries.json` and `<base_dir>/long-term/entries.json`.
pub struct MemoryStore<'a> {
    ctx: &'a ServiceContext,
    base_dir: PathBuf,
    short_term_limit: usize,
    write_lock: Mutex<()>,
}

impl<'a> MemoryStore<'a> {
    /// Creates a store rooted at `base_dir`.
    #[must_use]
    pub fn new(ctx: &'a ServiceContext, base_dir: &Path, short_term_limit: usize) -> Self {
        Self {
            ctx,
            base_dir: base_dir.to_path_buf(),
            short_term_limit,
            write_lock: Mutex::new(()),
        }
    }

    fn entries_path(&self, scope: Scope) -> PathBuf {
        self.base_dir.join(scope.dir_name()).join(ENTRIES_FILE)
    }

    async fn load(&self, scope: Scope) -> StoreResult<Vec<MemoryEntry>> {
        let path = self.entries_path(scope);
        let raw: Option<Value> = JsonDocument::new(self.ctx.fs.as_ref(), &path).load().await?;
        match raw {
            Some(Value::Array(mut records)) => {
                let now = self.ctx.clock.now();
                for record in &mut records {
                    timestamp::fill_missing(record, REQUIRED_TIMESTAMPS, &now);
                }
                serde_json::from_value(Value::Array(records))
                    .map_err(|source| StoreError::Parse { path, source })
            }
            Some(_) => {
                warn!(path = %path.display(), "memory file is not an array, treating as empty");
                Ok(Vec::new())
            }
            None => Ok(Vec::new()),
        }
    }

    async fn save(&self, scope: Scope, mut entries: Vec<MemoryEntry>) -> StoreResult<()> {
        sort_newest_first(&mut entries);
        debug!(%scope, count = entries.len(), "writing memory scope");
        JsonDocument::new(self.ctx.fs.as_ref(), &self.entries_path(scope))
            .save(&entries)
            .await
    }

    /// Records a new entry.
    ///
    /// Short-term appends are bounded by the retention policy. Unless
    /// `promote` says otherwise, high-importance entries are also copied to
    /// long-term, which is never evicted.
    ///
    /// # Errors
    ///
    /// Returns an error if a scope file cannot be read, parsed or written.
    pub async fn append(
        &self,
        input: MemoryEntryInput,
        options: AppendOptions,
    ) -> StoreResult<MemoryEntry> {
        let entry = MemoryEntry {
            id: self.ctx.id_gen.generate_id(),
            created_at: input.created_at.unwrap_or_else(|| self.ctx.clock.now()),
            importance: input.resolved_importance(),
            summary: input.summary.trim().to_string(),
            tags: input.normalized_tags(),
            task_id: input.task_id,
            tool_name: input.tool_name,
            metadata: input.metadata,
        };

        let _guard = self.write_lock.lock().await;
        let mut current = self.load(options.scope).await?;
        current.push(entry.clone());
        let mut entries = dedupe_by_id(current);
        if options.scope == Scope::ShortTerm {
            entries = apply_short_term_limit(entries, self.short_term_limit);
        }
        self.save(options.scope, entries).await?;

        let high = entry.importance == Importance::High;
        let promote = options.promote.unwrap_or(high);
        if promote && options.scope != Scope::LongTerm {
            let mut long_term = self.load(Scope::LongTerm).await?;
            long_term.push(entry.clone());
            self.save(Scope::LongTerm, dedupe_by_id(long_term)).await?;
            debug!(entry_id = %entry.id, "memory entry promoted");
        }

        Ok(entry)
    }

    /// Returns the newest matching entries of a scope.
    ///
    /// # Errors
    ///
    /// Returns an error if the scope file cannot be read or parsed.
    pub async fn list_recent(&self, options: &ListOptions) -> StoreResult<Vec<MemoryEntry>> {
        let mut entries: Vec<MemoryEntry> = self
            .load(options.scope)
            .await?
            .into_iter()
            .filter(|e| match &options.task_id {
                Some(id) => e.task_id.as_ref() == Some(id),
                None => true,
            })
            .filter(|e| options.tags.iter().all(|tag| e.tags.contains(tag)))
            .collect();
        sort_newest_first(&mut entries);
        entries.truncate(options.limit.max(1));
        Ok(entries)
    }

    /// Re-applies retention to short-term and truncates to `max_short_term`.
    ///
    /// Does nothing when the scope is already within bounds.
    ///
    /// # Errors
    ///
    /// Returns an error if the short-term file cannot be read, parsed or written.
    pub async fn prune(&self, options: PruneOptions) -> StoreResult<()> {
        let max = options.max_short_term.unwrap_or(self.short_term_limit);
        let _guard = self.write_lock.lock().await;
        let entries = self.load(Scope::ShortTerm).await?;
        if entries.len() <= max {
            return Ok(());
        }
        let before = entries.len();
        let mut kept = apply_short_term_limit(entries, self.short_term_limit);
        kept.truncate(max);
        debug!(before, after = kept.len(), "short-term memory pruned");
        self.save(Scope::ShortTerm, kept).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn base() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 7, 1, 9, 0, 0).unwrap()
    }

    fn ctx() -> ServiceContext {
        ServiceContext::deterministic(base())
    }

    fn input(summary: &str, offset_secs: i64) -> MemoryEntryInput {
        MemoryEntryInput {
            tags: vec!["thought".into()],
            created_at: Some(base() + Duration::seconds(offset_secs)),
            ..MemoryEntryInput::new("process_thought", summary)
        }
    }

    fn newest(limit: usize) -> ListOptions {
        ListOptions {
            limit,
            ..ListOptions::default()
        }
    }

    fn long_term() -> ListOptions {
        ListOptions {
            scope: Scope::LongTerm,
            ..ListOptions::default()
        }
    }

    async fn append_all(store: &MemoryStore<'_>, prefix: &str, range: std::ops::Range<i64>) {
        for i in range {
            let entry = input(&format!("{prefix}{i}"), i);
            store.append(entry, AppendOptions::default()).await.unwrap();
        }
    }

    #[tokio::test]
    async fn short_term_limit_keeps_most_recent() {
        let ctx = ctx();
        let store = MemoryStore::new(&ctx, Path::new("/mem"), 3);
        append_all(&store, "thought ", 0..5).await;

        let entries = store.list_recent(&newest(10)).await.unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].summary, "thought 4");
        assert_eq!(entries[2].summary, "thought 2");
    }

    #[tokio::test]
    async fn many_appends_stay_bounded() {
        let ctx = ctx();
        let store = MemoryStore::new(&ctx, Path::new("/mem"), DEFAULT_SHORT_TERM_LIMIT);
        append_all(&store, "e", 0..120).await;

        let all = store.list_recent(&newest(1000)).await.unwrap();
        assert_eq!(all.len(), 50);
        assert_eq!(all[0].summary, "e119");
        assert_eq!(all[49].summary, "e70");
    }

    #[tokio::test]
    async fn high_importance_entries_are_promoted() {
        let ctx = ctx();
        let store = MemoryStore::new(&ctx, Path::new("/mem"), 2);
        let milestone = MemoryEntryInput {
            tags: vec!["planning".into(), "milestone".into()],
            importance: Some(Importance::High),
            ..MemoryEntryInput::new("plan_task", "  key milestone  ")
        };
        let options = AppendOptions {
            promote: Some(true),
            ..AppendOptions::default()
        };
        let entry = store.append(milestone, options).await.unwrap();
        assert_eq!(entry.summary, "key milestone");

        append_all(&store, "noise ", 1..11).await;

        let long_term = store.list_recent(&long_term()).await.unwrap();
        assert_eq!(long_term.len(), 1);
        assert_eq!(long_term[0].id, entry.id);
        assert!(long_term[0].tags.contains(&"planning".to_string()));
    }

    #[tokio::test]
    async fn normal_entries_are_not_promoted_by_default() {
        let ctx = ctx();
        let store = MemoryStore::new(&ctx, Path::new("/mem"), 5);
        store
            .append(input("plain", 0), AppendOptions::default())
            .await
            .unwrap();

        let long_term = store.list_recent(&long_term()).await.unwrap();
        assert!(long_term.is_empty());
    }

    #[tokio::test]
    async fn list_filters_by_task_and_tags() {
        let ctx = ctx();
        let store = MemoryStore::new(&ctx, Path::new("/mem"), 10);
        let mut a = MemoryEntryInput::new("execute_task", "run A");
        a.task_id = Some("task-1".into());
        a.tags = vec!["execution".into()];
        let mut b = MemoryEntryInput::new("execute_task", "run B");
        b.task_id = Some("task-2".into());
        b.tags = vec!["execution".into(), "risk".into()];
        let mut c = MemoryEntryInput::new("execute_task", "run C");
        c.task_id = Some("task-2".into());
        c.tags = vec!["execution".into()];
        for item in [a, b, c] {
            store.append(item, AppendOptions::default()).await.unwrap();
        }

        let filtered = store
            .list_recent(&ListOptions {
                task_id: Some("task-2".into()),
                tags: vec!["execution".into(), "risk".into()],
                ..ListOptions::default()
            })
            .await
            .unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].summary, "run B");

        let clamped = store.list_recent(&newest(0)).await.unwrap();
        assert_eq!(clamped.len(), 1);
    }

    #[tokio::test]
    async fn prune_truncates_oversized_scope() {
        let ctx = ctx();
        let big = MemoryStore::new(&ctx, Path::new("/mem"), 100);
        append_all(&big, "e", 0..8).await;

        let store = MemoryStore::new(&ctx, Path::new("/mem"), 5);
        let options = PruneOptions {
            max_short_term: Some(4),
        };
        store.prune(options).await.unwrap();
        let left = store.list_recent(&newest(100)).await.unwrap();
        let summaries: Vec<&str> = left.iter().map(|e| e.summary.as_str()).collect();
        assert_eq!(summaries, vec!["e7", "e6", "e5", "e4"]);

        store.prune(PruneOptions::default()).await.unwrap();
        let unchanged = store.list_recent(&newest(100)).await.unwrap();
        assert_eq!(unchanged.len(), 4);
    }

    #[tokio::test]
    async fn non_array_file_reads_as_empty() {
        let ctx = ctx();
        let path = Path::new("/mem/short-term/entries.json");
        ctx.fs.write(path, "{\"entries\": []}").await.unwrap();
        let store = MemoryStore::new(&ctx, Path::new("/mem"), 5);

        let entries = store.list_recent(&ListOptions::default()).await.unwrap();
        assert!(entries.is_empty());
    }

    #[tokio::test]
    async fn malformed_file_is_an_error() {
        let ctx = ctx();
        let path = Path::new("/mem/short-term/entries.json");
        ctx.fs.write(path, "[{").await.unwrap();
        let store = MemoryStore::new(&ctx, Path::new("/mem"), 5);

        assert!(store.list_recent(&ListOptions::default()).await.is_err());
    }

    #[tokio::test]
    async fn missing_created_at_comes_from_the_clock() {
        let ctx = ctx();
        let path = Path::new("/mem/long-term/entries.json");
        let raw = r#"[{"id": "m1", "importance": "high", "summary": "s", "toolName": "t"}]"#;
        ctx.fs.write(path, raw).await.unwrap();
        let store = MemoryStore::new(&ctx, Path::new("/mem"), 5);

        let entries = store.list_recent(&long_term()).await.unwrap();
        assert_eq!(entries[0].created_at, base());
        assert!(entries[0].task_id.is_none());
    }

    #[tokio::test]
    async fn scope_files_are_sorted_newest_first() {
        let ctx = ctx();
        let store = MemoryStore::new(&ctx, Path::new("/mem"), 10);
        store
            .append(input("late", 10), AppendOptions::default())
            .await
            .unwrap();
        store
            .append(input("early", 1), AppendOptions::default())
            .await
            .unwrap();

        let path = Path::new("/mem/short-term/entries.json");
        let raw = ctx.fs.read_to_string(path).await.unwrap();
        let on_disk: Vec<MemoryEntry> = serde_json::from_str(&raw).unwrap();
        assert_eq!(on_disk[0].summary, "late");
        assert_eq!(on_disk[1].summary, "early");
    }
}
