//! Command dispatch and handlers.

pub mod clear;
pub mod complexity;
pub mod delete;
pub mod deps;
pub mod execute;
pub mod import;
pub mod list;
pub mod memory;
pub mod search;
pub mod show;
pub mod status;
pub mod update;
pub mod verify;

use std::env;

use tracing::debug;

use crate::cli::{Cli, Command, MemoryCommand};
use crate::config::Config;
use crate::context::ServiceContext;
use crate::memory::{ListOptions, MemoryStore};
use crate::task::{SearchOptions, TaskContentUpdate, TaskStore};

/// Dispatch a parsed command line against the live context.
///
/// Configuration comes from the environment; `--data-dir` overrides
/// `DATA_DIR`.
///
/// # Errors
///
/// Returns an error string if configuration is invalid or the selected
/// command handler fails.
pub async fn dispatch(cli: &Cli) -> Result<(), String> {
    let mut config = Config::from_env().map_err(|err| err.to_string())?;
    if let Some(dir) = &cli.data_dir {
        let cwd = env::current_dir().map_err(|err| err.to_string())?;
        config = config.with_data_dir(dir, &cwd);
    }
    debug!(data_dir = %config.data_dir.display(), "configuration resolved");

    let ctx = ServiceContext::live();
    dispatch_with_context(&cli.command, &ctx, &config).await
}

/// Dispatch a command with the given service context and configuration.
///
/// # Errors
///
/// Returns an error string if the selected command handler fails.
pub async fn dispatch_with_context(
    command: &Command,
    ctx: &ServiceContext,
    config: &Config,
) -> Result<(), String> {
    let tasks = TaskStore::new(ctx, &config.data_dir);
    let memory_store = MemoryStore::new(ctx, &config.memory_dir(), config.short_term_limit);
    match command {
        Command::List { status } => list::run(&tasks, status.map(Into::into)).await,
        Command::Show { id } => show::run(&tasks, id).await,
        Command::Deps { id } => deps::run(&tasks, id).await,
        Command::Status {
            id,
            status,
            summary,
        } => status::run(&tasks, id, (*status).into(), summary.as_deref()).await,
        Command::Execute { id } => execute::run(&tasks, &memory_store, id).await,
        Command::Verify { id, score, summary } => {
            verify::run(&tasks, &memory_store, id, *score, summary).await
        }
        Command::Update {
            id,
            name,
            description,
            notes,
            dependencies,
            implementation_guide,
            verification_criteria,
            agent,
        } => {
            let update = TaskContentUpdate {
                name: name.clone(),
                description: description.clone(),
                notes: notes.clone(),
                related_files: None,
                dependencies: dependencies.clone(),
                implementation_guide: implementation_guide.clone(),
                verification_criteria: verification_criteria.clone(),
                agent: agent.clone(),
            };
            update::run(&tasks, id, update).await
        }
        Command::Import {
            file,
            mode,
            analysis,
        } => import::run(ctx, &tasks, file, (*mode).into(), analysis.as_deref()).await,
        Command::Delete { id } => delete::run(&tasks, id).await,
        Command::Clear { yes } => clear::run(&tasks, *yes).await,
        Command::Complexity { id } => complexity::run(&tasks, id).await,
        Command::Search {
            query,
            id,
            page,
            page_size,
        } => {
            let options = SearchOptions {
                by_id: *id,
                page: *page,
                page_size: *page_size,
            };
            search::run(&tasks, query, options).await
        }
        Command::Memory { command } => match command {
            MemoryCommand::List {
                scope,
                limit,
                task_id,
                tags,
            } => {
                let options = ListOptions {
                    scope: (*scope).into(),
                    limit: *limit,
                    task_id: task_id.clone(),
                    tags: tags.clone(),
                };
                memory::list(&memory_store, &options).await
            }
            MemoryCommand::Prune { max } => memory::prune(&memory_store, *max).await,
        },
    }
}
