//! Task persistence, dependency resolution and execution memory for coding
//! agents, plus the `taskmind` CLI over them.
//!
//! The library side is [`task::TaskStore`] and [`memory::MemoryStore`], both
//! built from an explicit [`context::ServiceContext`] and base directory.

pub mod adapters;
pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod error;
pub mod memory;
pub mod ports;
pub mod store;
pub mod task;
pub mod timestamp;

use clap::Parser;

/// Run the CLI with the provided arguments.
///
/// # Errors
///
/// Returns an error string when argument parsing fails or command execution fails.
pub fn run<I, T>(args: I) -> Result<(), String>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = cli::Cli::try_parse_from(args).map_err(|err| err.to_string())?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|err| format!("failed to start async runtime: {err}"))?;
    runtime.block_on(commands::dispatch(&cli))
}
