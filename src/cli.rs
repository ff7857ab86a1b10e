//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::memory::Scope;
use crate::task::{TaskStatus, UpdateMode};

/// Top-level CLI parser for `taskmind`.
#[derive(Debug, Parser)]
#[command(
    name = "taskmind",
    version,
    about = "Persist agent tasks and execution memory"
)]
pub struct Cli {
    /// Data directory; overrides `DATA_DIR`.
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List stored tasks.
    List {
        /// Only tasks with this status.
        #[arg(long, value_enum)]
        status: Option<StatusArg>,
    },
    /// Show every field of one task.
    Show {
        /// Task ID.
        id: String,
    },
    /// Check whether a task's dependencies are completed.
    Deps {
        /// Task ID.
        id: String,
    },
    /// Move a task to a new status.
    Status {
        /// Task ID.
        id: String,
        /// New status.
        #[arg(value_enum)]
        status: StatusArg,
        /// Completion summary to record alongside.
        #[arg(long)]
        summary: Option<String>,
    },
    /// Start a task whose dependencies are all completed.
    Execute {
        /// Task ID.
        id: String,
    },
    /// Score an in-progress task; 80 or more completes it.
    Verify {
        /// Task ID.
        id: String,
        /// Score from 0 to 100.
        #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
        score: u8,
        /// Completion summary, or what is still missing when the score is low.
        #[arg(long)]
        summary: String,
    },
    /// Edit the content of a task that is not yet completed.
    Update {
        /// Task ID.
        id: String,
        /// New name.
        #[arg(long)]
        name: Option<String>,
        /// New description.
        #[arg(long)]
        description: Option<String>,
        /// New notes.
        #[arg(long)]
        notes: Option<String>,
        /// Replacement dependency ID; repeatable.
        #[arg(long = "dependency", value_name = "ID")]
        dependencies: Option<Vec<String>>,
        /// New implementation guide.
        #[arg(long)]
        implementation_guide: Option<String>,
        /// New verification criteria.
        #[arg(long)]
        verification_criteria: Option<String>,
        /// New assigned agent.
        #[arg(long)]
        agent: Option<String>,
    },
    /// Create or update tasks from a JSON array of task inputs.
    Import {
        /// JSON file holding `[{"name": ..., "description": ..., ...}]`.
        file: PathBuf,
        /// How the batch merges with stored tasks.
        #[arg(long, value_enum, default_value_t = ModeArg::Append)]
        mode: ModeArg,
        /// Analysis text attached to every task in the batch.
        #[arg(long)]
        analysis: Option<String>,
    },
    /// Delete a task that nothing depends on.
    Delete {
        /// Task ID.
        id: String,
    },
    /// Remove every task, backing up completed ones.
    Clear {
        /// Confirm the clear.
        #[arg(long)]
        yes: bool,
    },
    /// Assess a task's complexity.
    Complexity {
        /// Task ID.
        id: String,
    },
    /// Search live tasks and cleared-task backups.
    Search {
        /// Keywords, or a task ID with `--id`.
        query: String,
        /// Match the query as an exact task ID.
        #[arg(long)]
        id: bool,
        /// 1-based page number.
        #[arg(long, default_value_t = 1)]
        page: usize,
        /// Results per page.
        #[arg(long, default_value_t = 5)]
        page_size: usize,
    },
    /// Inspect or prune execution memory.
    Memory {
        /// Memory subcommand.
        #[command(subcommand)]
        command: MemoryCommand,
    },
}

/// `memory` subcommands.
#[derive(Debug, Subcommand)]
pub enum MemoryCommand {
    /// Show the newest entries of a scope.
    List {
        /// Scope to read.
        #[arg(long, value_enum, default_value_t = ScopeArg::ShortTerm)]
        scope: ScopeArg,
        /// Maximum entries shown.
        #[arg(long, default_value_t = 10)]
        limit: usize,
        /// Only entries for this task.
        #[arg(long)]
        task_id: Option<String>,
        /// Only entries carrying this tag; repeatable.
        #[arg(long = "tag", value_name = "TAG")]
        tags: Vec<String>,
    },
    /// Re-apply retention to short-term memory.
    Prune {
        /// Upper bound for short-term entries.
        #[arg(long)]
        max: Option<usize>,
    },
}

/// Task status as spelled on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "snake_case")]
pub enum StatusArg {
    /// `pending`
    Pending,
    /// `in_progress`
    InProgress,
    /// `completed`
    Completed,
    /// `blocked`
    Blocked,
}

impl From<StatusArg> for TaskStatus {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::Pending => Self::Pending,
            StatusArg::InProgress => Self::InProgress,
            StatusArg::Completed => Self::Completed,
            StatusArg::Blocked => Self::Blocked,
        }
    }
}

/// Batch merge mode as spelled on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// Keep every stored task.
    Append,
    /// Keep only completed tasks.
    Overwrite,
    /// Update same-named tasks in place.
    Selective,
    /// Replace everything.
    ClearAll,
}

impl From<ModeArg> for UpdateMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Append => Self::Append,
            ModeArg::Overwrite => Self::Overwrite,
            ModeArg::Selective => Self::Selective,
            ModeArg::ClearAll => Self::ClearAllTasks,
        }
    }
}

/// Memory scope as spelled on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ScopeArg {
    /// `short-term`
    ShortTerm,
    /// `long-term`
    LongTerm,
}

impl From<ScopeArg> for Scope {
    fn from(arg: ScopeArg) -> Self {
        match arg {
            ScopeArg::ShortTerm => Self::ShortTerm,
            ScopeArg::LongTerm => Self::LongTerm,
        }
    }
}
